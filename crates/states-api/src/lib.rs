//! JSON REST API for U.S. state reference data and fun facts.
//!
//! Exposes an axum [`Router`] backed by any
//! [`states_core::store::FunFactStore`] plus any
//! [`states_core::reference::StateSource`]. Transport and process concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/states", states_api::states_router(state))
//! ```

pub mod body;
pub mod error;
pub mod states;

use std::sync::Arc;

use axum::{Router, routing::get};
use states_core::{reference::StateSource, store::FunFactStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S, R> {
  pub store:  Arc<S>,
  pub states: Arc<R>,
}

impl<S, R> AppState<S, R> {
  pub fn new(store: S, states: R) -> Self {
    Self { store: Arc::new(store), states: Arc::new(states) }
  }
}

impl<S, R> Clone for AppState<S, R> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), states: Arc::clone(&self.states) }
  }
}

/// Build the `/states` router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn states_router<S, R>(state: AppState<S, R>) -> Router<()>
where
  S: FunFactStore + 'static,
  R: StateSource + 'static,
{
  Router::new()
    .route("/", get(states::list::<S, R>))
    .route("/{state}", get(states::get_one::<S, R>))
    .route(
      "/{state}/funfact",
      get(states::random_fact::<S, R>)
        .post(states::append::<S, R>)
        .patch(states::overwrite::<S, R>)
        .delete(states::remove::<S, R>),
    )
    .route("/{state}/capital", get(states::capital::<S, R>))
    .route("/{state}/nickname", get(states::nickname::<S, R>))
    .route("/{state}/population", get(states::population::<S, R>))
    .route("/{state}/admission", get(states::admission::<S, R>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
