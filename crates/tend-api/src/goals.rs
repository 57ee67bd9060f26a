//! Handlers for `/goals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/goals` | Optional `archived`, `status`, `category` filters |
//! | `POST` | `/goals` | Body: [`tend_core::goal::NewGoal`]; returns 201 |
//! | `GET`  | `/goals/:id` | Single goal |
//! | `PUT`  | `/goals/:id` | Body: [`tend_core::goal::UpdateGoal`] |
//! | `DELETE` | `/goals/:id` | |
//! | `POST` | `/goals/:id/subtasks` | Body: [`tend_core::goal::NewSubTask`] |
//! | `PUT`  | `/goals/:id/subtasks/:task_id` | Body: [`tend_core::goal::SubTaskPatch`] |
//! | `DELETE` | `/goals/:id/subtasks/:task_id` | |
//!
//! Every mutation below runs the progress deriver inside the store before
//! persisting — progress is never accepted as authoritative from a client.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tend_core::{
  goal::{Goal, GoalCategory, GoalStatus, NewGoal, NewSubTask, SubTaskPatch, UpdateGoal},
  store::{GoalQuery, HabitStore},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub archived: bool,
  pub status:   Option<GoalStatus>,
  pub category: Option<GoalCategory>,
}

/// `GET /goals[?archived=true][&status=<status>][&category=<category>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Goal>>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goals = store
    .list_goals(GoalQuery {
      archived: params.archived,
      status:   params.status,
      category: params.category,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(goals))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /goals` — returns 201 + the stored [`Goal`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewGoal>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("goal title is required".to_owned()));
  }
  let goal = store
    .add_goal(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(goal)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /goals/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Goal>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = require_goal(store.as_ref(), id).await?;
  Ok(Json(goal))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /goals/:id`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateGoal>,
) -> Result<Json<Goal>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_goal(store.as_ref(), id).await?;
  let goal = store
    .update_goal(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(goal))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /goals/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_goal(store.as_ref(), id).await?;
  store
    .delete_goal(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Sub-tasks ────────────────────────────────────────────────────────────────

/// `POST /goals/:id/subtasks` — returns the goal with derived progress.
pub async fn create_sub_task<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewSubTask>,
) -> Result<Json<Goal>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_goal(store.as_ref(), id).await?;
  let goal = store
    .add_sub_task(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(goal))
}

/// `PUT /goals/:id/subtasks/:task_id`
pub async fn update_sub_task_one<S>(
  State(store): State<Arc<S>>,
  Path((id, task_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<SubTaskPatch>,
) -> Result<Json<Goal>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_sub_task(store.as_ref(), id, task_id).await?;
  let goal = store
    .update_sub_task(id, task_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(goal))
}

/// `DELETE /goals/:id/subtasks/:task_id`
pub async fn delete_sub_task_one<S>(
  State(store): State<Arc<S>>,
  Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Goal>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_sub_task(store.as_ref(), id, task_id).await?;
  let goal = store
    .delete_sub_task(id, task_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(goal))
}

// ─── Shared ───────────────────────────────────────────────────────────────────

/// 404 unless the goal exists.
async fn require_goal<S>(store: &S, id: Uuid) -> Result<Goal, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_goal(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("goal {id} not found")))
}

/// 404 unless both the goal and the sub-task exist.
async fn require_sub_task<S>(
  store: &S,
  goal_id: Uuid,
  task_id: Uuid,
) -> Result<(), ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = require_goal(store, goal_id).await?;
  if !goal.sub_tasks.iter().any(|t| t.id == task_id) {
    return Err(ApiError::NotFound(format!("sub-task {task_id} not found")));
  }
  Ok(())
}
