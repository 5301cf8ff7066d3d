//! Router tests against a small inline dataset and an in-memory store.

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use states_core::reference::StaticSource;
use states_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, states_router};

const DATASET: &str = r#"[
  { "state": "Alabama", "code": "AL", "nickname": "Yellowhammer State",
    "capital_city": "Montgomery", "population": 5024279, "admission_date": "1819-12-14" },
  { "state": "Alaska", "code": "AK", "nickname": "The Last Frontier",
    "capital_city": "Juneau", "population": 733391, "admission_date": "1959-01-03" },
  { "state": "California", "code": "CA", "nickname": "Golden State",
    "capital_city": "Sacramento", "population": 39538223, "admission_date": "1850-09-09" },
  { "state": "Hawaii", "code": "HI", "nickname": "Aloha State",
    "capital_city": "Honolulu", "population": 1455271, "admission_date": "1959-08-21" },
  { "state": "Kansas", "code": "KS", "nickname": "Sunflower State",
    "capital_city": "Topeka", "population": 2937880, "admission_date": "1861-01-29",
    "funfacts": ["own one", "own two"], "slug": "kansas" }
]"#;

async fn app() -> Router { app_with(SqliteStore::open_in_memory().await.unwrap()) }

fn app_with(store: SqliteStore) -> Router {
  let source = StaticSource::from_json(DATASET).unwrap();
  Router::new().nest("/states", states_router(AppState::new(store, source)))
}

async fn send_raw(
  app: &Router,
  method: &str,
  uri: &str,
  content_type: Option<&str>,
  body: &str,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(ct) = content_type {
    builder = builder.header(header::CONTENT_TYPE, ct);
  }
  let resp = app.clone().oneshot(builder.body(Body::from(body.to_owned())).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

const FORM: Option<&str> = Some("application/x-www-form-urlencoded");

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) { send(app, "GET", uri, None).await }

fn codes(body: &Value) -> Vec<&str> {
  body["states"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["code"].as_str().unwrap())
    .collect()
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_without_filter() {
  let app = app().await;
  let (status, body) = get(&app, "/states").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(codes(&body), ["AL", "AK", "CA", "HI", "KS"]);
  assert_eq!(body["states"][0]["funfacts"], json!([]));
  assert_eq!(body["states"][4]["slug"], "kansas");
}

#[tokio::test]
async fn list_contiguous_filter() {
  let app = app().await;
  let (_, body) = get(&app, "/states?contig=true").await;
  assert_eq!(codes(&body), ["AL", "CA", "KS"]);

  let (_, body) = get(&app, "/states?contig=false").await;
  assert_eq!(codes(&body), ["AK", "HI"]);
}

#[tokio::test]
async fn list_rejects_bad_contig_value() {
  let app = app().await;
  let (status, body) = get(&app, "/states?contig=maybe").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("contig"));
}

#[tokio::test]
async fn list_merges_own_then_stored_facts() {
  let app = app().await;
  send(&app, "POST", "/states/ks/funfact", Some(json!({ "funfacts": ["s1", "s2"] }))).await;

  let (_, body) = get(&app, "/states").await;
  let kansas = &body["states"][4];
  assert_eq!(kansas["funfacts"], json!(["own one", "own two", "s1", "s2"]));
}

// ── Get one / scalar fields ──────────────────────────────────────────────────

#[tokio::test]
async fn get_one_is_case_insensitive_and_unmerged() {
  let app = app().await;
  send(&app, "POST", "/states/KS/funfact", Some(json!({ "funfacts": ["stored"] }))).await;

  let (status, body) = get(&app, "/states/kS").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["state"], "Kansas");
  assert_eq!(body["funfacts"], json!(["own one", "own two"]));
}

#[tokio::test]
async fn get_one_without_own_facts_omits_funfacts() {
  let app = app().await;
  let (_, body) = get(&app, "/states/ca").await;
  assert!(body.get("funfacts").is_none());
}

#[tokio::test]
async fn unknown_or_malformed_code_is_404() {
  let app = app().await;
  for uri in ["/states/zz", "/states/kansas", "/states/zz/capital", "/states/1x/nickname"] {
    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert_eq!(body["error"], "State not found");
  }
}

#[tokio::test]
async fn scalar_field_endpoints() {
  let app = app().await;
  assert_eq!(
    get(&app, "/states/ks/capital").await.1,
    json!({ "state": "Kansas", "capital": "Topeka" })
  );
  assert_eq!(
    get(&app, "/states/ks/nickname").await.1,
    json!({ "state": "Kansas", "nickname": "Sunflower State" })
  );
  assert_eq!(
    get(&app, "/states/ks/population").await.1,
    json!({ "state": "Kansas", "population": 2937880 })
  );
  assert_eq!(
    get(&app, "/states/ks/admission").await.1,
    json!({ "state": "Kansas", "admitted": "1861-01-29" })
  );
}

// ── Random fact ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn random_fact_unknown_state_is_404() {
  let app = app().await;
  let (status, body) = get(&app, "/states/zz/funfact").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "State not found");
}

#[tokio::test]
async fn random_fact_with_no_facts_is_404() {
  let app = app().await;
  let (status, body) = get(&app, "/states/ca/funfact").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "No fun facts found for this state");
}

#[tokio::test]
async fn random_fact_draws_from_stored_facts() {
  let app = app().await;
  send(&app, "POST", "/states/ca/funfact", Some(json!({ "funfacts": ["only one"] }))).await;
  let (status, body) = get(&app, "/states/CA/funfact").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "funfact": "only one" }));
}

#[tokio::test]
async fn random_fact_draws_from_both_sources() {
  let app = app().await;
  send(&app, "POST", "/states/ks/funfact", Some(json!({ "funfacts": ["stored"] }))).await;
  let pool = ["own one", "own two", "stored"];
  for _ in 0..20 {
    let (_, body) = get(&app, "/states/ks/funfact").await;
    assert!(pool.contains(&body["funfact"].as_str().unwrap()));
  }
}

// ── Append ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_returns_entry_and_accumulates() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["f1", "f2"] }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "stateCode": "AL", "funfacts": ["f1", "f2"] }));

  let (_, body) = send(&app, "POST", "/states/AL/funfact", Some(json!({ "funfacts": ["f3"] }))).await;
  assert_eq!(body["funfacts"], json!(["f1", "f2", "f3"]));
}

#[tokio::test]
async fn append_requires_funfacts_array() {
  let app = app().await;
  let (status, _) = send(&app, "POST", "/states/al/funfact", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) =
    send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": "not a list" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

// ── Overwrite ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn overwrite_replaces_fact() {
  let app = app().await;
  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a", "b"] }))).await;

  let (status, body) =
    send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": 1, "funfact": "X" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["funfacts"], json!(["X", "b"]));
}

#[tokio::test]
async fn overwrite_errors() {
  let app = app().await;

  let (status, body) = send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": 1 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index and funfact are required");

  let (status, _) =
    send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": 1, "funfact": "" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) =
    send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": 1, "funfact": "X" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "State not found");

  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a", "b"] }))).await;
  for index in [3, -1] {
    let (status, body) =
      send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": index, "funfact": "X" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "index {index}");
    assert_eq!(body["error"], "Invalid index");
  }
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_and_reindexes() {
  let app = app().await;
  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a", "b", "c"] }))).await;

  let (status, body) = send(&app, "DELETE", "/states/al/funfact", Some(json!({ "index": 1 }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["funfacts"], json!(["b", "c"]));
}

#[tokio::test]
async fn delete_errors() {
  let app = app().await;

  let (status, body) = send(&app, "DELETE", "/states/al/funfact", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index is required");

  let (status, _) = send(&app, "DELETE", "/states/al/funfact", Some(json!({ "index": 1 }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a"] }))).await;
  let (status, _) = send(&app, "DELETE", "/states/al/funfact", Some(json!({ "index": 2 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_zero_counts_as_missing() {
  let app = app().await;

  let (status, body) =
    send(&app, "PATCH", "/states/al/funfact", Some(json!({ "index": 0, "funfact": "X" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index and funfact are required");

  let (status, body) = send(&app, "DELETE", "/states/al/funfact", Some(json!({ "index": 0 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index is required");
}

#[tokio::test]
async fn empty_body_reports_required_fields() {
  let app = app().await;

  let (status, body) = send_raw(&app, "DELETE", "/states/al/funfact", None, "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index is required");

  let (status, body) = send_raw(&app, "PATCH", "/states/al/funfact", None, "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Index and funfact are required");

  let (status, body) = send_raw(&app, "POST", "/states/al/funfact", None, "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "funfacts array is required");
}

#[tokio::test]
async fn non_json_body_without_form_type_is_400() {
  let app = app().await;
  let (status, body) =
    send_raw(&app, "DELETE", "/states/al/funfact", Some("text/plain"), "index=1").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("application/json"));
}

#[tokio::test]
async fn append_accepts_form_body() {
  let app = app().await;

  let (status, body) =
    send_raw(&app, "POST", "/states/ks/funfact", FORM, "funfacts[]=a&funfacts[]=b").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "stateCode": "KS", "funfacts": ["a", "b"] }));

  let (_, body) = send_raw(&app, "POST", "/states/ks/funfact", FORM, "funfacts=c").await;
  assert_eq!(body["funfacts"], json!(["a", "b", "c"]));

  let (_, body) =
    send_raw(&app, "POST", "/states/ks/funfact", FORM, "funfacts%5B%5D=d&funfacts%5B%5D=e").await;
  assert_eq!(body["funfacts"], json!(["a", "b", "c", "d", "e"]));

  let (status, body) = send_raw(&app, "POST", "/states/ks/funfact", FORM, "other=x").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "funfacts array is required");
}

#[tokio::test]
async fn overwrite_accepts_form_body() {
  let app = app().await;
  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a", "b"] }))).await;

  let (status, body) =
    send_raw(&app, "PATCH", "/states/al/funfact", FORM, "index=2&funfact=Two%20words").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["funfacts"], json!(["a", "Two words"]));

  let (status, _) = send_raw(&app, "PATCH", "/states/al/funfact", FORM, "index=two&funfact=x").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_accepts_form_body() {
  let app = app().await;
  send(&app, "POST", "/states/al/funfact", Some(json!({ "funfacts": ["a", "b"] }))).await;

  let req = Request::builder()
    .method("DELETE")
    .uri("/states/al/funfact")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("index=2"))
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["funfacts"], json!(["a"]));
}

// ── Round trip ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn posted_facts_appear_once_in_order() {
  let app = app().await;
  send(&app, "POST", "/states/hi/funfact", Some(json!({ "funfacts": ["p1", "p2", "p3"] }))).await;

  let (_, body) = get(&app, "/states?contig=false").await;
  let hawaii = body["states"]
    .as_array()
    .unwrap()
    .iter()
    .find(|s| s["code"] == "HI")
    .unwrap();
  assert_eq!(hawaii["funfacts"], json!(["p1", "p2", "p3"]));
}

// ── Store failure ────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_failure_is_500_with_generic_body() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("facts.db");
  let app = app_with(SqliteStore::open(&path).await.unwrap());
  send(&app, "POST", "/states/ks/funfact", Some(json!({ "funfacts": ["fine"] }))).await;

  rusqlite::Connection::open(&path)
    .unwrap()
    .execute("UPDATE funfact_entries SET funfacts = 'not json'", [])
    .unwrap();

  for uri in ["/states", "/states/ks/funfact"] {
    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
  }
}
