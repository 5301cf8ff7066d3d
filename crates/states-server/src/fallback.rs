//! Content-negotiated 404 for unmatched routes.
//!
//! Preference order is HTML, then JSON, then plain text. A request with no
//! `Accept` header gets HTML.

use axum::{
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Json, Response},
};
use serde_json::json;

/// The representation chosen for a 404 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundBody {
  Html,
  Json,
  Text,
}

/// One `type/subtype;q=...` entry of an `Accept` header.
struct MediaRange<'a> {
  kind:    &'a str,
  subtype: &'a str,
  q:       f32,
}

impl<'a> MediaRange<'a> {
  fn parse(item: &'a str) -> Option<Self> {
    let mut params = item.split(';').map(str::trim);
    let (kind, subtype) = params.next()?.split_once('/')?;
    let q = params
      .filter_map(|p| p.strip_prefix("q="))
      .last()
      .and_then(|q| q.trim().parse().ok())
      .unwrap_or(1.0);
    Some(Self { kind: kind.trim(), subtype: subtype.trim(), q })
  }

  /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`.
  fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
    match (self.kind, self.subtype) {
      ("*", "*") => Some(0),
      (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
      (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => Some(2),
      _ => None,
    }
  }
}

/// Whether `kind/subtype` is acceptable: the most specific matching range
/// decides, and `q=0` rules it out.
fn accepts(ranges: &[MediaRange<'_>], kind: &str, subtype: &str) -> bool {
  ranges
    .iter()
    .filter_map(|r| r.specificity(kind, subtype).map(|s| (s, r.q)))
    .max_by_key(|(s, _)| *s)
    .is_some_and(|(_, q)| q > 0.0)
}

/// Pick the 404 representation for an `Accept` header value.
pub fn negotiate(accept: Option<&str>) -> NotFoundBody {
  let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
    return NotFoundBody::Html;
  };
  let ranges: Vec<_> = accept.split(',').filter_map(MediaRange::parse).collect();

  if accepts(&ranges, "text", "html") {
    NotFoundBody::Html
  } else if accepts(&ranges, "application", "json") {
    NotFoundBody::Json
  } else {
    NotFoundBody::Text
  }
}

/// Router fallback.
pub async fn not_found(headers: HeaderMap) -> Response {
  let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
  match negotiate(accept) {
    NotFoundBody::Html => (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response(),
    NotFoundBody::Json => {
      (StatusCode::NOT_FOUND, Json(json!({ "error": "404 Not Found" }))).into_response()
    }
    NotFoundBody::Text => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
  }
}
