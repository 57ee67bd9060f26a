//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`. Structured fields (frequency, target, reminder, completion
//! logs, sub-tasks, milestones) are stored as compact JSON. UUIDs are stored
//! as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use tend_core::{
  goal::{Goal, GoalCategory, GoalPriority, GoalStatus, Milestone, SubTask},
  habit::{Category, Completion, Frequency, Habit, Reminder, Target},
  streak::StreakState,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Category ────────────────────────────────────────────────────────────────

pub fn encode_category(c: Category) -> &'static str {
  match c {
    Category::Health => "health",
    Category::Fitness => "fitness",
    Category::Mindfulness => "mindfulness",
    Category::Learning => "learning",
    Category::Productivity => "productivity",
    Category::Social => "social",
    Category::Finance => "finance",
    Category::Other => "other",
  }
}

pub fn decode_category(s: &str) -> Result<Category> {
  match s {
    "health" => Ok(Category::Health),
    "fitness" => Ok(Category::Fitness),
    "mindfulness" => Ok(Category::Mindfulness),
    "learning" => Ok(Category::Learning),
    "productivity" => Ok(Category::Productivity),
    "social" => Ok(Category::Social),
    "finance" => Ok(Category::Finance),
    "other" => Ok(Category::Other),
    other => Err(Error::Decode(format!("habit category: {other:?}"))),
  }
}

// ─── GoalCategory ────────────────────────────────────────────────────────────

pub fn encode_goal_category(c: GoalCategory) -> &'static str {
  match c {
    GoalCategory::Career => "career",
    GoalCategory::Health => "health",
    GoalCategory::Finance => "finance",
    GoalCategory::Personal => "personal",
    GoalCategory::Education => "education",
    GoalCategory::Relationship => "relationship",
    GoalCategory::Other => "other",
  }
}

pub fn decode_goal_category(s: &str) -> Result<GoalCategory> {
  match s {
    "career" => Ok(GoalCategory::Career),
    "health" => Ok(GoalCategory::Health),
    "finance" => Ok(GoalCategory::Finance),
    "personal" => Ok(GoalCategory::Personal),
    "education" => Ok(GoalCategory::Education),
    "relationship" => Ok(GoalCategory::Relationship),
    "other" => Ok(GoalCategory::Other),
    other => Err(Error::Decode(format!("goal category: {other:?}"))),
  }
}

// ─── GoalPriority ────────────────────────────────────────────────────────────

pub fn encode_goal_priority(p: GoalPriority) -> &'static str {
  match p {
    GoalPriority::Low => "low",
    GoalPriority::Medium => "medium",
    GoalPriority::High => "high",
    GoalPriority::Critical => "critical",
  }
}

pub fn decode_goal_priority(s: &str) -> Result<GoalPriority> {
  match s {
    "low" => Ok(GoalPriority::Low),
    "medium" => Ok(GoalPriority::Medium),
    "high" => Ok(GoalPriority::High),
    "critical" => Ok(GoalPriority::Critical),
    other => Err(Error::Decode(format!("goal priority: {other:?}"))),
  }
}

// ─── GoalStatus ──────────────────────────────────────────────────────────────

pub fn encode_goal_status(s: GoalStatus) -> &'static str {
  match s {
    GoalStatus::NotStarted => "not_started",
    GoalStatus::InProgress => "in_progress",
    GoalStatus::OnHold => "on_hold",
    GoalStatus::Completed => "completed",
    GoalStatus::Cancelled => "cancelled",
  }
}

pub fn decode_goal_status(s: &str) -> Result<GoalStatus> {
  match s {
    "not_started" => Ok(GoalStatus::NotStarted),
    "in_progress" => Ok(GoalStatus::InProgress),
    "on_hold" => Ok(GoalStatus::OnHold),
    "completed" => Ok(GoalStatus::Completed),
    "cancelled" => Ok(GoalStatus::Cancelled),
    other => Err(Error::Decode(format!("goal status: {other:?}"))),
  }
}

// ─── Completion log ──────────────────────────────────────────────────────────

pub fn encode_completions(completions: &[Completion]) -> Result<String> {
  Ok(serde_json::to_string(completions)?)
}

/// Lenient decode of a stored completion log.
///
/// One malformed entry (bad date, wrong shape) must not take out the whole
/// habit — it is skipped with a warning and the rest of the log survives.
pub fn decode_completions(s: &str) -> Result<Vec<Completion>> {
  let raw: Vec<serde_json::Value> = serde_json::from_str(s)?;
  let mut out = Vec::with_capacity(raw.len());
  for entry in raw {
    match serde_json::from_value::<Completion>(entry) {
      Ok(c) => out.push(c),
      Err(e) => {
        tracing::warn!(error = %e, "skipping malformed completion record");
      }
    }
  }
  Ok(out)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `habits` row.
pub struct RawHabit {
  pub habit_id:       String,
  pub name:           String,
  pub description:    String,
  pub icon:           String,
  pub color:          String,
  pub category:       String,
  pub frequency:      String,
  pub target:         String,
  pub reminder:       String,
  pub completions:    String,
  pub streak_current: i64,
  pub streak_longest: i64,
  pub last_completed: Option<String>,
  pub is_archived:    bool,
  pub start_date:     String,
  pub sort_order:     i64,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawHabit {
  pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
    Ok(Self {
      habit_id:       row.get(0)?,
      name:           row.get(1)?,
      description:    row.get(2)?,
      icon:           row.get(3)?,
      color:          row.get(4)?,
      category:       row.get(5)?,
      frequency:      row.get(6)?,
      target:         row.get(7)?,
      reminder:       row.get(8)?,
      completions:    row.get(9)?,
      streak_current: row.get(10)?,
      streak_longest: row.get(11)?,
      last_completed: row.get(12)?,
      is_archived:    row.get(13)?,
      start_date:     row.get(14)?,
      sort_order:     row.get(15)?,
      created_at:     row.get(16)?,
      updated_at:     row.get(17)?,
    })
  }

  pub fn into_habit(self) -> Result<Habit> {
    let frequency: Frequency = serde_json::from_str(&self.frequency)?;
    let target: Target = serde_json::from_str(&self.target)?;
    let reminder: Reminder = serde_json::from_str(&self.reminder)?;
    let completions = decode_completions(&self.completions)?;

    let streak = StreakState {
      current:        self.streak_current as u32,
      longest:        self.streak_longest as u32,
      last_completed: self
        .last_completed
        .as_deref()
        .map(decode_date)
        .transpose()?,
    };

    Ok(Habit {
      id: decode_uuid(&self.habit_id)?,
      name: self.name,
      description: self.description,
      icon: self.icon,
      color: self.color,
      category: decode_category(&self.category)?,
      frequency,
      target,
      reminder,
      completions,
      streak,
      is_archived: self.is_archived,
      start_date: decode_date(&self.start_date)?,
      order: self.sort_order,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `goals` row.
pub struct RawGoal {
  pub goal_id:      String,
  pub title:        String,
  pub description:  String,
  pub icon:         String,
  pub color:        String,
  pub category:     String,
  pub priority:     String,
  pub status:       String,
  pub progress:     i64,
  pub start_date:   String,
  pub target_date:  String,
  pub completed_at: Option<String>,
  pub sub_tasks:    String,
  pub milestones:   String,
  pub notes:        String,
  pub is_archived:  bool,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawGoal {
  pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
    Ok(Self {
      goal_id:      row.get(0)?,
      title:        row.get(1)?,
      description:  row.get(2)?,
      icon:         row.get(3)?,
      color:        row.get(4)?,
      category:     row.get(5)?,
      priority:     row.get(6)?,
      status:       row.get(7)?,
      progress:     row.get(8)?,
      start_date:   row.get(9)?,
      target_date:  row.get(10)?,
      completed_at: row.get(11)?,
      sub_tasks:    row.get(12)?,
      milestones:   row.get(13)?,
      notes:        row.get(14)?,
      is_archived:  row.get(15)?,
      created_at:   row.get(16)?,
      updated_at:   row.get(17)?,
    })
  }

  pub fn into_goal(self) -> Result<Goal> {
    let sub_tasks: Vec<SubTask> = serde_json::from_str(&self.sub_tasks)?;
    let milestones: Vec<Milestone> = serde_json::from_str(&self.milestones)?;

    Ok(Goal {
      id: decode_uuid(&self.goal_id)?,
      title: self.title,
      description: self.description,
      icon: self.icon,
      color: self.color,
      category: decode_goal_category(&self.category)?,
      priority: decode_goal_priority(&self.priority)?,
      status: decode_goal_status(&self.status)?,
      progress: self.progress.clamp(0, 100) as u8,
      start_date: decode_date(&self.start_date)?,
      target_date: decode_date(&self.target_date)?,
      completed_at: self.completed_at.as_deref().map(decode_dt).transpose()?,
      sub_tasks,
      milestones,
      notes: self.notes,
      is_archived: self.is_archived,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
