//! Handlers for `/states` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/` | Optional `?contig=true\|false`; merged store facts |
//! | `GET`    | `/:state` | Raw reference record, no store facts |
//! | `GET`    | `/:state/funfact` | One random fact from both sources |
//! | `GET`    | `/:state/{capital,nickname,population,admission}` | `{state, <field>}` |
//! | `POST`   | `/:state/funfact` | Body: `{"funfacts":[...]}` |
//! | `PATCH`  | `/:state/funfact` | Body: `{"index":1,"funfact":"..."}` |
//! | `DELETE` | `/:state/funfact` | Body: `{"index":1}` |

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use rand::seq::SliceRandom as _;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use states_core::{
  StateCode,
  fact::FunFactEntry,
  record::{MergedStateView, StateRecord},
  reference::StateSource,
  store::FunFactStore,
};

use crate::{
  AppState,
  body::{FormFields, Payload, optional_int},
  error::{ApiError, store_error},
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Parse a path segment into a code. Malformed codes name no state.
fn parse_code(raw: &str) -> Result<StateCode, ApiError> {
  StateCode::parse(raw).map_err(|_| ApiError::state_not_found())
}

async fn resolve<S, R>(app: &AppState<S, R>, raw: &str) -> Result<StateRecord, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let code = parse_code(raw)?;
  app
    .states
    .find_state(&code)
    .await?
    .ok_or_else(ApiError::state_not_found)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// `true` keeps the 48 contiguous states, `false` keeps only AK and HI.
  pub contig: Option<String>,
}

impl ListParams {
  fn contiguous(&self) -> Result<Option<bool>, ApiError> {
    match self.contig.as_deref() {
      None => Ok(None),
      Some("true") => Ok(Some(true)),
      Some("false") => Ok(Some(false)),
      Some(other) => Err(ApiError::BadRequest(format!(
        "contig must be true or false, got {other:?}"
      ))),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct StateList {
  pub states: Vec<MergedStateView>,
}

/// `GET /states[?contig=true|false]`
pub async fn list<S, R>(
  State(app): State<AppState<S, R>>,
  Query(params): Query<ListParams>,
) -> Result<Json<StateList>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let contiguous = params.contiguous()?;
  let records = app.states.load_states().await?;

  let entries: HashMap<StateCode, FunFactEntry> = app
    .store
    .list()
    .await
    .map_err(store_error)?
    .into_iter()
    .map(|e| (e.state_code.clone(), e))
    .collect();

  let states = records
    .into_iter()
    .filter(|r| contiguous.is_none_or(|c| r.code.is_contiguous() == c))
    .map(|r| {
      let entry = entries.get(&r.code);
      r.merge(entry)
    })
    .collect();

  Ok(Json(StateList { states }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /states/:state` — the reference record only; store facts are not
/// merged here.
pub async fn get_one<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<StateRecord>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  Ok(Json(resolve(&app, &state).await?))
}

// ─── Scalar fields ────────────────────────────────────────────────────────────

/// `GET /states/:state/capital`
pub async fn capital<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let record = resolve(&app, &state).await?;
  Ok(Json(json!({ "state": record.state, "capital": record.capital_city })))
}

/// `GET /states/:state/nickname`
pub async fn nickname<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let record = resolve(&app, &state).await?;
  Ok(Json(json!({ "state": record.state, "nickname": record.nickname })))
}

/// `GET /states/:state/population`
pub async fn population<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let record = resolve(&app, &state).await?;
  Ok(Json(json!({ "state": record.state, "population": record.population })))
}

/// `GET /states/:state/admission`
pub async fn admission<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let record = resolve(&app, &state).await?;
  Ok(Json(json!({ "state": record.state, "admitted": record.admission_date })))
}

// ─── Random fact ──────────────────────────────────────────────────────────────

/// `GET /states/:state/funfact` — uniform pick over the record's own facts
/// followed by the stored ones.
pub async fn random_fact<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let record = resolve(&app, &state).await?;
  let stored = app.store.get(&record.code).await.map_err(store_error)?;
  let code = record.code.clone();
  let merged = record.merge(stored.as_ref());

  let funfact = merged
    .funfacts
    .choose(&mut rand::thread_rng())
    .cloned()
    .ok_or(ApiError::NoFactsAvailable(code))?;

  Ok(Json(json!({ "funfact": funfact })))
}

// ─── Append ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AppendBody {
  pub funfacts: Option<Vec<String>>,
}

impl FormFields for AppendBody {
  const LISTS: &'static [&'static str] = &["funfacts"];
}

/// `POST /states/:state/funfact` — body: `{"funfacts":["..."]}`
pub async fn append<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
  Payload(body): Payload<AppendBody>,
) -> Result<Json<FunFactEntry>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let code = parse_code(&state)?;
  let funfacts = body
    .funfacts
    .ok_or_else(|| ApiError::BadRequest("funfacts array is required".into()))?;

  let entry = app.store.append(code, funfacts).await.map_err(store_error)?;
  Ok(Json(entry))
}

// ─── Overwrite ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OverwriteBody {
  /// 1-based position.
  #[serde(default, deserialize_with = "optional_int")]
  pub index:   Option<i64>,
  pub funfact: Option<String>,
}

impl FormFields for OverwriteBody {}

/// `PATCH /states/:state/funfact` — body: `{"index":1,"funfact":"..."}`
pub async fn overwrite<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
  Payload(body): Payload<OverwriteBody>,
) -> Result<Json<FunFactEntry>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  // Index 0 and an empty fact count as missing.
  let index = body.index.filter(|&i| i != 0);
  let (Some(index), Some(funfact)) = (index, body.funfact.filter(|f| !f.is_empty())) else {
    return Err(ApiError::BadRequest("Index and funfact are required".into()));
  };
  let code = parse_code(&state)?;

  let entry = app
    .store
    .overwrite(code, index, funfact)
    .await
    .map_err(store_error)?;
  Ok(Json(entry))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RemoveBody {
  /// 1-based position.
  #[serde(default, deserialize_with = "optional_int")]
  pub index: Option<i64>,
}

impl FormFields for RemoveBody {}

/// `DELETE /states/:state/funfact` — body: `{"index":1}`
pub async fn remove<S, R>(
  State(app): State<AppState<S, R>>,
  Path(state): Path<String>,
  Payload(body): Payload<RemoveBody>,
) -> Result<Json<FunFactEntry>, ApiError>
where
  S: FunFactStore,
  R: StateSource,
{
  let index = body
    .index
    .filter(|&i| i != 0)
    .ok_or_else(|| ApiError::BadRequest("Index is required".into()))?;
  let code = parse_code(&state)?;

  let entry = app.store.remove(code, index).await.map_err(store_error)?;
  Ok(Json(entry))
}
