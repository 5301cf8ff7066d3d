//! Request body extractor accepting JSON or URL-encoded forms.

use axum::{
  Form, Json,
  body::Bytes,
  extract::{FromRequest, Request},
  http::{HeaderMap, header},
};
use serde::{
  Deserialize, Deserializer,
  de::{self, DeserializeOwned},
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Decodes the body as `application/x-www-form-urlencoded` when the request
/// says so, and as JSON otherwise. An empty body decodes like `{}`, leaving
/// required-field checks to the handler. Any other decoding failure is a
/// [`ApiError::BadRequest`] with a JSON error body.
#[derive(Debug)]
pub struct Payload<T>(pub T);

/// How a body type reads from URL-encoded pairs.
pub trait FormFields {
  /// Keys that always decode as arrays, even when sent once without `[]`.
  const LISTS: &'static [&'static str] = &[];
}

enum BodyKind {
  Form,
  Json,
  Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
  let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
    return BodyKind::Other;
  };
  if ct.starts_with("application/x-www-form-urlencoded") {
    BodyKind::Form
  } else if ct.starts_with("application/json") || ct.contains("+json") {
    BodyKind::Json
  } else {
    BodyKind::Other
  }
}

impl<T, S> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned + FormFields + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let kind = body_kind(req.headers());

    if let BodyKind::Form = kind {
      let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      return from_value(form_object(pairs, T::LISTS));
    }

    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return from_value(Value::Object(Map::new()));
    }
    if let BodyKind::Other = kind {
      return Err(ApiError::BadRequest(
        "Expected request with `Content-Type: application/json`".into(),
      ));
    }

    let Json(value) =
      Json::<T>::from_bytes(&bytes).map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(value))
  }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<Payload<T>, ApiError> {
  serde_json::from_value(value)
    .map(Payload)
    .map_err(|e| ApiError::BadRequest(format!("Failed to deserialize body: {e}")))
}

/// Fold form pairs into a JSON object.
///
/// `key[]=v` and repeated keys collect into an array in body order, as do the
/// keys named in `lists`. Everything else stays a string.
fn form_object(pairs: Vec<(String, String)>, lists: &[&str]) -> Value {
  let mut map = Map::new();
  for (key, value) in pairs {
    let (key, bracketed) = match key.strip_suffix("[]") {
      Some(stripped) => (stripped.to_owned(), true),
      None => (key, false),
    };
    let value = Value::String(value);

    match map.get_mut(&key) {
      Some(Value::Array(items)) => items.push(value),
      Some(existing) => {
        let first = existing.take();
        *existing = Value::Array(vec![first, value]);
      }
      None if bracketed || lists.contains(&key.as_str()) => {
        map.insert(key, Value::Array(vec![value]));
      }
      None => {
        map.insert(key, value);
      }
    }
  }
  Value::Object(map)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
  Int(i64),
  Text(String),
}

/// Deserialize an optional integer given either as a number or as decimal
/// text. Blank text counts as absent.
pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<LooseInt>::deserialize(deserializer)? {
    None => Ok(None),
    Some(LooseInt::Int(n)) => Ok(Some(n)),
    Some(LooseInt::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(LooseInt::Text(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| de::Error::custom(format!("expected an integer, got {s:?}"))),
  }
}
