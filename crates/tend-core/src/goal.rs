//! Goal types and the progress deriver.
//!
//! A goal's `progress` and its `in_progress → completed` transition are
//! derived from the sub-task list on every save. Status changes in any other
//! direction are only ever explicit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
  Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
  Career,
  Health,
  Finance,
  #[default]
  Personal,
  Education,
  Relationship,
  Other,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
  Low,
  #[default]
  Medium,
  High,
  Critical,
}

/// Sub-task priority scale. Deliberately narrower than [`GoalPriority`]:
/// sub-tasks cap out at `high`, there is no `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubTaskPriority {
  Low,
  #[default]
  Medium,
  High,
}

// Out-of-range values (including the goal-level "critical") coerce to medium
// instead of rejecting the whole payload.
impl<'de> Deserialize<'de> for SubTaskPriority {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Ok(match raw.as_str() {
      "low" => Self::Low,
      "high" => Self::High,
      _ => Self::Medium,
    })
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
  #[default]
  NotStarted,
  InProgress,
  OnHold,
  Completed,
  Cancelled,
}

// ─── SubTask ─────────────────────────────────────────────────────────────────

/// An atomic checklist item; the completion ratio of a goal's sub-tasks
/// drives its derived progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
  pub id:           Uuid,
  pub title:        String,
  #[serde(default)]
  pub is_completed: bool,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub due_date:     Option<NaiveDate>,
  #[serde(default)]
  pub priority:     SubTaskPriority,
  #[serde(default)]
  pub order:        i64,
}

impl SubTask {
  pub fn new(input: NewSubTask) -> Self {
    Self {
      id:           Uuid::new_v4(),
      title:        input.title,
      is_completed: false,
      completed_at: None,
      due_date:     input.due_date,
      priority:     input.priority,
      order:        input.order,
    }
  }
}

/// Input to [`crate::store::HabitStore::add_sub_task`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubTask {
  pub title:    String,
  #[serde(default)]
  pub due_date: Option<NaiveDate>,
  #[serde(default)]
  pub priority: SubTaskPriority,
  #[serde(default)]
  pub order:    i64,
}

/// Partial sub-task update. When `is_completed` is present it wins: the
/// completion flag and timestamp are set and other fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubTaskPatch {
  pub is_completed: Option<bool>,
  pub title:        Option<String>,
  pub priority:     Option<SubTaskPriority>,
  pub due_date:     Option<NaiveDate>,
}

// ─── Milestone ───────────────────────────────────────────────────────────────

/// A dated checkpoint on the way to a goal. Informational only — milestones
/// do not feed the progress derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
  pub title:        String,
  pub target_date:  NaiveDate,
  #[serde(default)]
  pub is_completed: bool,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub description:  String,
}

// ─── Goal ────────────────────────────────────────────────────────────────────

/// A longer-term goal with sub-tasks and cached derived `progress`/`status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
  pub id:           Uuid,
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  pub icon:         String,
  pub color:        String,
  #[serde(default)]
  pub category:     GoalCategory,
  #[serde(default)]
  pub priority:     GoalPriority,
  #[serde(default)]
  pub status:       GoalStatus,
  /// Derived from `sub_tasks` when any exist; otherwise holds the last
  /// explicitly-set value.
  #[serde(default)]
  pub progress:     u8,
  pub start_date:   NaiveDate,
  pub target_date:  NaiveDate,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub sub_tasks:    Vec<SubTask>,
  #[serde(default)]
  pub milestones:   Vec<Milestone>,
  #[serde(default)]
  pub notes:        String,
  #[serde(default)]
  pub is_archived:  bool,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Goal {
  pub fn new(input: NewGoal, now: DateTime<Utc>) -> Self {
    Self {
      id:           Uuid::new_v4(),
      title:        input.title,
      description:  input.description,
      icon:         input.icon,
      color:        input.color,
      category:     input.category,
      priority:     input.priority,
      status:       input.status,
      progress:     0,
      start_date:   input.start_date,
      target_date:  input.target_date,
      completed_at: None,
      sub_tasks:    input.sub_tasks.into_iter().map(SubTask::new).collect(),
      milestones:   input.milestones,
      notes:        input.notes,
      is_archived:  false,
      created_at:   now,
      updated_at:   now,
    }
  }

  /// Recompute `progress` from the sub-task list and apply the single
  /// allowed automatic status transition.
  ///
  /// With no sub-tasks, `progress` keeps its last explicit value. Reaching
  /// 100 while `in_progress` flips the goal to `completed` and stamps
  /// `completed_at`; a goal on hold (or in any other state) never auto-flips.
  pub fn derive_progress(&mut self, now: DateTime<Utc>) {
    if !self.sub_tasks.is_empty() {
      let done = self.sub_tasks.iter().filter(|t| t.is_completed).count();
      let total = self.sub_tasks.len();
      self.progress = ((done as f64 / total as f64) * 100.0).round() as u8;
    }
    if self.progress == 100 && self.status == GoalStatus::InProgress {
      self.status = GoalStatus::Completed;
      self.completed_at = Some(now);
    }
  }

  /// Append a sub-task and re-derive progress.
  pub fn push_sub_task(&mut self, input: NewSubTask, now: DateTime<Utc>) {
    self.sub_tasks.push(SubTask::new(input));
    self.derive_progress(now);
  }

  /// Patch one sub-task by id and re-derive progress.
  pub fn update_sub_task(
    &mut self,
    task_id: Uuid,
    patch: SubTaskPatch,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let task = self
      .sub_tasks
      .iter_mut()
      .find(|t| t.id == task_id)
      .ok_or(Error::SubTaskNotFound(task_id))?;

    if let Some(is_completed) = patch.is_completed {
      task.is_completed = is_completed;
      task.completed_at = is_completed.then_some(now);
    } else {
      if let Some(title) = patch.title {
        task.title = title;
      }
      if let Some(priority) = patch.priority {
        task.priority = priority;
      }
      if let Some(due_date) = patch.due_date {
        task.due_date = Some(due_date);
      }
    }

    self.derive_progress(now);
    Ok(())
  }

  /// Remove one sub-task by id and re-derive progress.
  pub fn remove_sub_task(&mut self, task_id: Uuid, now: DateTime<Utc>) -> Result<()> {
    let before = self.sub_tasks.len();
    self.sub_tasks.retain(|t| t.id != task_id);
    if self.sub_tasks.len() == before {
      return Err(Error::SubTaskNotFound(task_id));
    }
    self.derive_progress(now);
    Ok(())
  }

  /// Apply a partial update. Progress and status may be set explicitly here;
  /// the deriver still runs afterwards on every save.
  pub fn apply(&mut self, patch: UpdateGoal) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(icon) = patch.icon {
      self.icon = icon;
    }
    if let Some(color) = patch.color {
      self.color = color;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
    if let Some(priority) = patch.priority {
      self.priority = priority;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(progress) = patch.progress {
      self.progress = progress.min(100);
    }
    if let Some(start_date) = patch.start_date {
      self.start_date = start_date;
    }
    if let Some(target_date) = patch.target_date {
      self.target_date = target_date;
    }
    if let Some(sub_tasks) = patch.sub_tasks {
      self.sub_tasks = sub_tasks;
    }
    if let Some(milestones) = patch.milestones {
      self.milestones = milestones;
    }
    if let Some(notes) = patch.notes {
      self.notes = notes;
    }
    if let Some(is_archived) = patch.is_archived {
      self.is_archived = is_archived;
    }
  }
}

// ─── NewGoal / UpdateGoal ────────────────────────────────────────────────────

/// Input to [`crate::store::HabitStore::add_goal`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  #[serde(default = "default_goal_icon")]
  pub icon:        String,
  #[serde(default = "default_goal_color")]
  pub color:       String,
  #[serde(default)]
  pub category:    GoalCategory,
  #[serde(default)]
  pub priority:    GoalPriority,
  #[serde(default)]
  pub status:      GoalStatus,
  pub start_date:  NaiveDate,
  pub target_date: NaiveDate,
  #[serde(default)]
  pub sub_tasks:   Vec<NewSubTask>,
  #[serde(default)]
  pub milestones:  Vec<Milestone>,
  #[serde(default)]
  pub notes:       String,
}

fn default_goal_icon() -> String { "🎯".to_owned() }

fn default_goal_color() -> String { "#10b981".to_owned() }

/// Partial update accepted by [`crate::store::HabitStore::update_goal`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoal {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub icon:        Option<String>,
  pub color:       Option<String>,
  pub category:    Option<GoalCategory>,
  pub priority:    Option<GoalPriority>,
  pub status:      Option<GoalStatus>,
  pub progress:    Option<u8>,
  pub start_date:  Option<NaiveDate>,
  pub target_date: Option<NaiveDate>,
  pub sub_tasks:   Option<Vec<SubTask>>,
  pub milestones:  Option<Vec<Milestone>>,
  pub notes:       Option<String>,
  pub is_archived: Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn goal_with_tasks(titles: &[&str]) -> Goal {
    let now = Utc::now();
    let date = now.date_naive();
    Goal::new(
      NewGoal {
        title:       "Ship it".to_owned(),
        description: String::new(),
        icon:        default_goal_icon(),
        color:       default_goal_color(),
        category:    GoalCategory::Personal,
        priority:    GoalPriority::Medium,
        status:      GoalStatus::InProgress,
        start_date:  date,
        target_date: date,
        sub_tasks:   titles
          .iter()
          .map(|t| NewSubTask {
            title:    (*t).to_owned(),
            due_date: None,
            priority: SubTaskPriority::Medium,
            order:    0,
          })
          .collect(),
        milestones:  Vec::new(),
        notes:       String::new(),
      },
      now,
    )
  }

  fn complete(goal: &mut Goal, index: usize) {
    let id = goal.sub_tasks[index].id;
    goal
      .update_sub_task(
        id,
        SubTaskPatch { is_completed: Some(true), ..Default::default() },
        Utc::now(),
      )
      .unwrap();
  }

  #[test]
  fn half_done_sub_tasks_yield_fifty_percent() {
    let mut g = goal_with_tasks(&["a", "b", "c", "d"]);
    complete(&mut g, 0);
    complete(&mut g, 1);
    assert_eq!(g.progress, 50);
    assert_eq!(g.status, GoalStatus::InProgress);
  }

  #[test]
  fn three_of_four_stays_in_progress() {
    let mut g = goal_with_tasks(&["a", "b", "c", "d"]);
    for i in 0..3 {
      complete(&mut g, i);
    }
    assert_eq!(g.progress, 75);
    assert_eq!(g.status, GoalStatus::InProgress);
    assert!(g.completed_at.is_none());
  }

  #[test]
  fn completing_all_sub_tasks_flips_status() {
    let mut g = goal_with_tasks(&["a", "b", "c", "d"]);
    for i in 0..4 {
      complete(&mut g, i);
    }
    assert_eq!(g.progress, 100);
    assert_eq!(g.status, GoalStatus::Completed);
    assert!(g.completed_at.is_some());
  }

  #[test]
  fn on_hold_goal_never_auto_completes() {
    let mut g = goal_with_tasks(&["a", "b"]);
    g.status = GoalStatus::OnHold;
    complete(&mut g, 0);
    complete(&mut g, 1);
    assert_eq!(g.progress, 100);
    assert_eq!(g.status, GoalStatus::OnHold);
    assert!(g.completed_at.is_none());
  }

  #[test]
  fn zero_sub_tasks_leave_progress_untouched() {
    let mut g = goal_with_tasks(&[]);
    g.progress = 40;
    g.derive_progress(Utc::now());
    assert_eq!(g.progress, 40);
  }

  #[test]
  fn uncompleting_a_sub_task_clears_its_timestamp() {
    let mut g = goal_with_tasks(&["a"]);
    g.status = GoalStatus::NotStarted;
    complete(&mut g, 0);
    assert!(g.sub_tasks[0].completed_at.is_some());

    let id = g.sub_tasks[0].id;
    g.update_sub_task(
      id,
      SubTaskPatch { is_completed: Some(false), ..Default::default() },
      Utc::now(),
    )
    .unwrap();
    assert!(g.sub_tasks[0].completed_at.is_none());
    assert_eq!(g.progress, 0);
  }

  #[test]
  fn removing_unknown_sub_task_errors() {
    let mut g = goal_with_tasks(&["a"]);
    let err = g.remove_sub_task(Uuid::new_v4(), Utc::now()).unwrap_err();
    assert!(matches!(err, Error::SubTaskNotFound(_)));
  }

  #[test]
  fn sub_task_priority_rejects_nothing() {
    // The sub-task scale has no "critical"; it coerces to medium.
    let p: SubTaskPriority = serde_json::from_str("\"critical\"").unwrap();
    assert_eq!(p, SubTaskPriority::Medium);
    let p: SubTaskPriority = serde_json::from_str("\"high\"").unwrap();
    assert_eq!(p, SubTaskPriority::High);
  }
}
