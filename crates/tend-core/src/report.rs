//! Progress-report data derivation.
//!
//! Produces the numbers behind a shareable progress summary (today's
//! completions, goal averages, top streaks). Rendering and delivery are the
//! caller's concern; this module only derives the data.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  goal::{Goal, GoalStatus},
  habit::{Category, Habit},
  streak::compute_streak,
};

/// How many habits the "top streaks" section shows.
pub const TOP_STREAK_LIMIT: usize = 5;

/// A habit with a live streak, for the report's highlight list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakHighlight {
  pub id:             Uuid,
  pub name:           String,
  pub icon:           String,
  pub category:       Category,
  pub current_streak: u32,
}

/// An in-progress goal with its derived progress and time budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalHighlight {
  pub id:          Uuid,
  pub title:       String,
  pub icon:        String,
  pub progress:    u8,
  pub target_date: NaiveDate,
  /// Days until `target_date`; negative when overdue.
  pub days_left:   i64,
}

/// The full report payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
  pub date:              NaiveDate,
  pub total_habits:      u32,
  pub completed_today:   u32,
  /// Mean progress across every goal passed in, rounded; 0 with no goals.
  pub avg_goal_progress: u8,
  pub active_goals:      Vec<GoalHighlight>,
  pub completed_goals:   u32,
  /// Habits with a current streak, highest first, at most
  /// [`TOP_STREAK_LIMIT`] entries.
  pub top_streaks:       Vec<StreakHighlight>,
}

/// Derive a [`ProgressReport`] from a user's habits and goals.
pub fn build_progress_report(
  habits: &[Habit],
  goals: &[Goal],
  today: NaiveDate,
) -> ProgressReport {
  let completed_today =
    habits.iter().filter(|h| h.is_completed_on(today)).count() as u32;

  let active_goals: Vec<GoalHighlight> = goals
    .iter()
    .filter(|g| g.status == GoalStatus::InProgress)
    .map(|g| GoalHighlight {
      id:          g.id,
      title:       g.title.clone(),
      icon:        g.icon.clone(),
      progress:    g.progress,
      target_date: g.target_date,
      days_left:   (g.target_date - today).num_days(),
    })
    .collect();

  let completed_goals =
    goals.iter().filter(|g| g.status == GoalStatus::Completed).count() as u32;

  let avg_goal_progress = if goals.is_empty() {
    0
  } else {
    let sum: u32 = goals.iter().map(|g| u32::from(g.progress)).sum();
    (f64::from(sum) / goals.len() as f64).round() as u8
  };

  let mut top_streaks: Vec<StreakHighlight> = habits
    .iter()
    .filter_map(|h| {
      let streak = compute_streak(&h.completions, today);
      (streak.current > 0).then(|| StreakHighlight {
        id:             h.id,
        name:           h.name.clone(),
        icon:           h.icon.clone(),
        category:       h.category,
        current_streak: streak.current,
      })
    })
    .collect();
  top_streaks.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
  top_streaks.truncate(TOP_STREAK_LIMIT);

  ProgressReport {
    date: today,
    total_habits: habits.len() as u32,
    completed_today,
    avg_goal_progress,
    active_goals,
    completed_goals,
    top_streaks,
  }
}
