//! Handler for `GET /report`.
//!
//! Returns the [`ProgressReport`] payload — the numbers behind a shareable
//! progress summary. Rendering (HTML email, etc.) is left to clients.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use tend_core::{
  report::{ProgressReport, build_progress_report},
  store::{GoalQuery, HabitQuery, HabitStore},
};

use crate::error::ApiError;

/// `GET /report` — derive a progress report over non-archived habits and
/// goals.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<ProgressReport>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let habits = store
    .list_habits(HabitQuery::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let goals = store
    .list_goals(GoalQuery::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let report = build_progress_report(&habits, &goals, Utc::now().date_naive());
  Ok(Json(report))
}
