//! Habit types — the fundamental unit of the Tend tracker.
//!
//! A habit owns its completion log: at most one [`Completion`] per calendar
//! date. The cached [`StreakState`] is a pure function of that log and is
//! recomputed on every mutation, never edited directly.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::streak::{self, StreakState};

// ─── Category ────────────────────────────────────────────────────────────────

/// Life area a habit belongs to; drives the per-category stats breakdown.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
  Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Health,
  Fitness,
  Mindfulness,
  Learning,
  Productivity,
  Social,
  Finance,
  #[default]
  Other,
}

// ─── Frequency ───────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyKind {
  #[default]
  Daily,
  Weekly,
  Custom,
}

/// How often a habit is meant to be performed.
///
/// `days_of_week` uses 0 = Sunday .. 6 = Saturday and only applies to
/// `Weekly`. `Custom` habits count as scheduled every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
  #[serde(default)]
  pub kind:           FrequencyKind,
  #[serde(default)]
  pub days_of_week:   Vec<u8>,
  #[serde(default = "default_times_per_week")]
  pub times_per_week: u8,
}

fn default_times_per_week() -> u8 { 7 }

impl Default for Frequency {
  fn default() -> Self {
    Self {
      kind:           FrequencyKind::Daily,
      days_of_week:   Vec::new(),
      times_per_week: default_times_per_week(),
    }
  }
}

impl Frequency {
  /// Whether the habit is scheduled to be performed on `date`.
  pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
    match self.kind {
      FrequencyKind::Daily => true,
      FrequencyKind::Weekly => {
        let dow = date.weekday().num_days_from_sunday() as u8;
        self.days_of_week.contains(&dow)
      }
      FrequencyKind::Custom => true,
    }
  }
}

// ─── Target ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
  #[default]
  Boolean,
  Count,
  Duration,
}

/// What "done" means for a measurable habit (e.g. 20 minutes, 8 glasses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
  #[serde(default)]
  pub kind:  TargetKind,
  #[serde(default = "default_target_value")]
  pub value: f64,
  #[serde(default)]
  pub unit:  String,
}

fn default_target_value() -> f64 { 1.0 }

impl Default for Target {
  fn default() -> Self {
    Self {
      kind:  TargetKind::Boolean,
      value: default_target_value(),
      unit:  String::new(),
    }
  }
}

// ─── Reminder ────────────────────────────────────────────────────────────────

/// Daily reminder setting; `time` is a wall-clock `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
  #[serde(default)]
  pub enabled: bool,
  #[serde(default = "default_reminder_time")]
  pub time:    String,
}

fn default_reminder_time() -> String { "08:00".to_owned() }

impl Default for Reminder {
  fn default() -> Self {
    Self { enabled: false, time: default_reminder_time() }
  }
}

// ─── Completion ──────────────────────────────────────────────────────────────

/// One completed day in a habit's log. At most one record exists per `date`;
/// toggling a completed date removes the record instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
  /// Timezone-naive calendar day the habit was performed.
  pub date:         NaiveDate,
  /// When the record entered the log.
  pub completed_at: DateTime<Utc>,
  #[serde(default)]
  pub note:         String,
  /// Measured amount for count/duration habits; 1 for boolean habits.
  #[serde(default = "default_target_value")]
  pub value:        f64,
}

// ─── Habit ───────────────────────────────────────────────────────────────────

/// A recurring habit with its embedded completion log and cached streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
  pub id:          Uuid,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  pub icon:        String,
  pub color:       String,
  #[serde(default)]
  pub category:    Category,
  #[serde(default)]
  pub frequency:   Frequency,
  #[serde(default)]
  pub target:      Target,
  #[serde(default)]
  pub reminder:    Reminder,
  #[serde(default)]
  pub completions: Vec<Completion>,
  /// Derived from `completions`; never authoritative on its own.
  #[serde(default)]
  pub streak:      StreakState,
  #[serde(default)]
  pub is_archived: bool,
  pub start_date:  NaiveDate,
  #[serde(default)]
  pub order:       i64,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Habit {
  /// Build a fresh habit from caller input. The completion log starts empty
  /// and the streak cache at zero.
  pub fn new(input: NewHabit, now: DateTime<Utc>) -> Self {
    Self {
      id:          Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      icon:        input.icon,
      color:       input.color,
      category:    input.category,
      frequency:   input.frequency,
      target:      input.target,
      reminder:    input.reminder,
      completions: Vec::new(),
      streak:      StreakState::default(),
      is_archived: false,
      start_date:  input.start_date.unwrap_or_else(|| now.date_naive()),
      order:       input.order,
      created_at:  now,
      updated_at:  now,
    }
  }

  pub fn completion_on(&self, date: NaiveDate) -> Option<&Completion> {
    self.completions.iter().find(|c| c.date == date)
  }

  pub fn is_completed_on(&self, date: NaiveDate) -> bool {
    self.completion_on(date).is_some()
  }

  pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
    self.frequency.is_scheduled_on(date)
  }

  /// Toggle the log entry for `entry.date`: remove it if one exists, insert
  /// `entry` otherwise. Recomputes the streak cache relative to `today`.
  ///
  /// Returns `true` if the habit is now completed on that date.
  pub fn toggle_completion(&mut self, entry: Completion, today: NaiveDate) -> bool {
    let completed = match self
      .completions
      .iter()
      .position(|c| c.date == entry.date)
    {
      Some(existing) => {
        self.completions.remove(existing);
        false
      }
      None => {
        self.completions.push(entry);
        true
      }
    };
    self.streak = streak::compute_streak(&self.completions, today);
    completed
  }

  /// Percentage of the trailing 30 days with a completion, rounded.
  pub fn completion_rate(&self, today: NaiveDate) -> u8 {
    let window_start = today - Duration::days(30);
    let recent = self
      .completions
      .iter()
      .filter(|c| c.date >= window_start)
      .count();
    ((recent as f64 / 30.0) * 100.0).round() as u8
  }

  /// Apply a partial update. Derived fields (`completions`, `streak`) are not
  /// patchable; the store recomputes the streak cache on save.
  pub fn apply(&mut self, patch: UpdateHabit) {
    if let Some(name) = patch.name {
      self.name = name;
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
    if let Some(frequency) = patch.frequency {
      self.frequency = frequency;
    }
    if let Some(target) = patch.target {
      self.target = target;
    }
    if let Some(reminder) = patch.reminder {
      self.reminder = reminder;
    }
    if let Some(is_archived) = patch.is_archived {
      self.is_archived = is_archived;
    }
    if let Some(start_date) = patch.start_date {
      self.start_date = start_date;
    }
    if let Some(order) = patch.order {
      self.order = order;
    }
  }
}

// ─── NewHabit ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::HabitStore::add_habit`].
/// `id` and timestamps are always assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default = "default_habit_icon")]
  pub icon:        String,
  #[serde(default = "default_habit_color")]
  pub color:       String,
  #[serde(default)]
  pub category:    Category,
  #[serde(default)]
  pub frequency:   Frequency,
  #[serde(default)]
  pub target:      Target,
  #[serde(default)]
  pub reminder:    Reminder,
  /// Defaults to the creation date.
  #[serde(default)]
  pub start_date:  Option<NaiveDate>,
  #[serde(default)]
  pub order:       i64,
}

fn default_habit_icon() -> String { "⭐".to_owned() }

fn default_habit_color() -> String { "#f59e0b".to_owned() }

// ─── UpdateHabit ─────────────────────────────────────────────────────────────

/// Partial update accepted by [`crate::store::HabitStore::update_habit`].
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabit {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub icon:        Option<String>,
  pub color:       Option<String>,
  pub category:    Option<Category>,
  pub frequency:   Option<Frequency>,
  pub target:      Option<Target>,
  pub reminder:    Option<Reminder>,
  pub is_archived: Option<bool>,
  pub start_date:  Option<NaiveDate>,
  pub order:       Option<i64>,
}
