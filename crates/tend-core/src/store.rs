//! The `HabitStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tend-store-sqlite`).
//! Higher layers (`tend-api`, `tend-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Derived caches (`Habit::streak`, `Goal::progress`/`status`) are the
//! implementor's responsibility: every write path must recompute them from
//! the source collections before persisting.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  goal::{Goal, GoalCategory, GoalStatus, NewGoal, NewSubTask, SubTaskPatch, UpdateGoal},
  habit::{Category, Habit, NewHabit, UpdateHabit},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filter for [`HabitStore::list_habits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HabitQuery {
  /// Return archived habits instead of active ones.
  pub archived: bool,
  pub category: Option<Category>,
}

/// Filter for [`HabitStore::list_goals`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalQuery {
  pub archived: bool,
  pub status:   Option<GoalStatus>,
  pub category: Option<GoalCategory>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Tend storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait HabitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Habits ────────────────────────────────────────────────────────────

  /// Create and persist a new habit. Id and timestamps are assigned here.
  fn add_habit(
    &self,
    input: NewHabit,
  ) -> impl Future<Output = Result<Habit, Self::Error>> + Send + '_;

  /// Retrieve a habit by id. Returns `None` if not found.
  fn get_habit(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// List habits matching `query`, ordered by manual sort order then
  /// newest-first.
  fn list_habits(
    &self,
    query: HabitQuery,
  ) -> impl Future<Output = Result<Vec<Habit>, Self::Error>> + Send + '_;

  /// Apply a partial update and persist. The streak cache is recomputed on
  /// the way out. Errors if the habit does not exist.
  fn update_habit(
    &self,
    id: Uuid,
    patch: UpdateHabit,
  ) -> impl Future<Output = Result<Habit, Self::Error>> + Send + '_;

  /// Delete a habit and its embedded completion log.
  fn delete_habit(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Toggle the completion record for `date` (default: today). Removing and
  /// re-adding the same date restores the habit to its prior state exactly.
  ///
  /// Returns the updated habit and whether the date is now completed.
  fn toggle_completion(
    &self,
    id: Uuid,
    date: Option<NaiveDate>,
    note: String,
    value: f64,
  ) -> impl Future<Output = Result<(Habit, bool), Self::Error>> + Send + '_;

  // ── Goals ─────────────────────────────────────────────────────────────

  /// Create and persist a new goal; progress is derived before the first
  /// write.
  fn add_goal(
    &self,
    input: NewGoal,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;

  /// Retrieve a goal by id. Returns `None` if not found.
  fn get_goal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Goal>, Self::Error>> + Send + '_;

  /// List goals matching `query`, newest first.
  fn list_goals(
    &self,
    query: GoalQuery,
  ) -> impl Future<Output = Result<Vec<Goal>, Self::Error>> + Send + '_;

  /// Apply a partial update, re-derive progress, persist.
  fn update_goal(
    &self,
    id: Uuid,
    patch: UpdateGoal,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;

  /// Delete a goal and its embedded sub-tasks.
  fn delete_goal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sub-tasks ─────────────────────────────────────────────────────────

  /// Append a sub-task to a goal; progress is re-derived.
  fn add_sub_task(
    &self,
    goal_id: Uuid,
    input: NewSubTask,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;

  /// Patch one sub-task; progress is re-derived.
  fn update_sub_task(
    &self,
    goal_id: Uuid,
    task_id: Uuid,
    patch: SubTaskPatch,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;

  /// Remove one sub-task; progress is re-derived.
  fn delete_sub_task(
    &self,
    goal_id: Uuid,
    task_id: Uuid,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;
}
