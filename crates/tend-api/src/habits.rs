//! Handlers for `/habits` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/habits` | Optional `archived`, `category` filters |
//! | `POST` | `/habits` | Body: [`tend_core::habit::NewHabit`]; returns 201 |
//! | `PUT`  | `/habits/:id` | Body: [`tend_core::habit::UpdateHabit`] |
//! | `DELETE` | `/habits/:id` | |
//! | `POST` | `/habits/:id/complete` | Toggle a date's completion (default today) |
//! | `GET`  | `/habits/today` | Habits scheduled today with completion flags |
//! | `GET`  | `/habits/stats` | Trailing 30-day summary |
//! | `GET`  | `/habits/calendar` | `?year=&month=` month aggregate (default current) |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tend_core::{
  calendar::{self, CalendarDay},
  habit::{Category, Completion, Habit, NewHabit, UpdateHabit},
  stats::{self, DASHBOARD_WINDOW_DAYS, StatsSummary},
  store::{HabitQuery, HabitStore},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub archived: bool,
  pub category: Option<Category>,
}

/// `GET /habits[?archived=true][&category=<category>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Habit>>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let habits = store
    .list_habits(HabitQuery {
      archived: params.archived,
      category: params.category,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(habits))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /habits` — returns 201 + the stored [`Habit`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewHabit>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("habit name is required".to_owned()));
  }
  let habit = store
    .add_habit(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(habit)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /habits/:id`
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateHabit>,
) -> Result<Json<Habit>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_habit(store.as_ref(), id).await?;
  let habit = store
    .update_habit(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(habit))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /habits/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_habit(store.as_ref(), id).await?;
  store
    .delete_habit(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Complete ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CompleteBody {
  /// Defaults to today (server clock).
  pub date:  Option<NaiveDate>,
  #[serde(default)]
  pub note:  String,
  pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
  pub habit:        Habit,
  /// Whether the date is now completed (`false` means the toggle removed an
  /// existing record).
  pub is_completed: bool,
}

/// `POST /habits/:id/complete` — toggle one date's completion record.
pub async fn complete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CompleteBody>,
) -> Result<Json<CompleteResponse>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_habit(store.as_ref(), id).await?;
  let (habit, is_completed) = store
    .toggle_completion(id, body.date, body.note, body.value.unwrap_or(1.0))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(CompleteResponse { habit, is_completed }))
}

// ─── Today ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TodayHabit {
  #[serde(flatten)]
  pub habit:              Habit,
  pub is_completed_today: bool,
  pub today_completion:   Option<Completion>,
  /// Trailing 30-day completion percentage.
  pub completion_rate:    u8,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
  pub date:   NaiveDate,
  pub habits: Vec<TodayHabit>,
}

/// `GET /habits/today` — non-archived habits scheduled today.
pub async fn today<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<TodayResponse>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let date = Utc::now().date_naive();
  let habits = store
    .list_habits(HabitQuery::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let habits = habits
    .into_iter()
    .filter(|h| h.is_scheduled_on(date))
    .map(|habit| {
      let today_completion = habit.completion_on(date).cloned();
      TodayHabit {
        is_completed_today: today_completion.is_some(),
        today_completion,
        completion_rate: habit.completion_rate(date),
        habit,
      }
    })
    .collect();

  Ok(Json(TodayResponse { date, habits }))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /habits/stats` — trailing 30-day summary over non-archived habits.
pub async fn stats<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<StatsSummary>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let habits = store
    .list_habits(HabitQuery::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let today = Utc::now().date_naive();
  let summary = stats::build_trailing_stats(&habits, DASHBOARD_WINDOW_DAYS, today);
  Ok(Json(summary))
}

// ─── Calendar ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
  pub year:  Option<i32>,
  /// 1–12; defaults to the current month.
  pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
  pub year:  i32,
  pub month: u32,
  pub data:  BTreeMap<NaiveDate, CalendarDay>,
}

/// `GET /habits/calendar[?year=<y>&month=<m>]`
pub async fn calendar<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarResponse>, ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let now = Utc::now().date_naive();
  let year = params.year.unwrap_or_else(|| now.year());
  let month = params.month.unwrap_or_else(|| now.month());
  if !(1..=12).contains(&month) {
    return Err(ApiError::BadRequest(format!("invalid month: {month}")));
  }

  let habits = store
    .list_habits(HabitQuery::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let data = calendar::build_calendar(&habits, year, month);
  Ok(Json(CalendarResponse { year, month, data }))
}

// ─── Shared ───────────────────────────────────────────────────────────────────

/// 404 unless the habit exists.
async fn require_habit<S>(store: &S, id: Uuid) -> Result<(), ApiError>
where
  S: HabitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_habit(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| ApiError::NotFound(format!("habit {id} not found")))
}
