//! JSON REST API for Tend.
//!
//! Exposes an axum [`Router`] backed by any [`tend_core::store::HabitStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tend_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod goals;
pub mod habits;
pub mod report;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tend_core::store::HabitStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: HabitStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Habits — derived views
    .route("/habits/today", get(habits::today::<S>))
    .route("/habits/stats", get(habits::stats::<S>))
    .route("/habits/calendar", get(habits::calendar::<S>))
    // Habits — CRUD
    .route("/habits", get(habits::list::<S>).post(habits::create::<S>))
    .route(
      "/habits/{id}",
      put(habits::update_one::<S>).delete(habits::delete_one::<S>),
    )
    .route("/habits/{id}/complete", post(habits::complete::<S>))
    // Goals
    .route("/goals", get(goals::list::<S>).post(goals::create::<S>))
    .route(
      "/goals/{id}",
      get(goals::get_one::<S>)
        .put(goals::update_one::<S>)
        .delete(goals::delete_one::<S>),
    )
    .route("/goals/{id}/subtasks", post(goals::create_sub_task::<S>))
    .route(
      "/goals/{id}/subtasks/{task_id}",
      put(goals::update_sub_task_one::<S>)
        .delete(goals::delete_sub_task_one::<S>),
    )
    // Progress report payload
    .route("/report", get(report::handler::<S>))
    .with_state(store)
}
