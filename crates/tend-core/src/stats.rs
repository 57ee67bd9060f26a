//! Trailing-window statistics for the dashboard and progress views.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::{
  habit::{Category, Habit},
  streak::compute_streak,
};

/// Window length used by the dashboard and progress charts.
pub const DASHBOARD_WINDOW_DAYS: u32 = 30;

/// One day in the trailing series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStat {
  pub date:      NaiveDate,
  pub completed: u32,
  pub total:     u32,
}

/// Per-category habit count and lifetime completion count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryStat {
  pub count:       u32,
  pub completions: u32,
}

/// Aggregate statistics over a habit list.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
  pub total_habits:    u32,
  pub completed_today: u32,
  /// Sum of every habit's current streak.
  pub total_streaks:   u32,
  /// Longest streak any habit has ever reached.
  pub longest_streak:  u32,
  /// Exactly the requested number of days, oldest first, ending today.
  pub series:          Vec<DayStat>,
  pub by_category:     BTreeMap<Category, CategoryStat>,
}

/// Build a trailing-window summary over `habits`.
///
/// The series always has `window_days` entries, ending at `today` inclusive —
/// a habit list with no completions yields a series of zeros, not a shorter
/// series. Each day's `total` counts every habit passed in, with no
/// schedule-awareness; the month calendar applies the schedule rule, this
/// series does not, and the displayed percentages differ accordingly.
///
/// `by_category` counts lifetime completions, not completions in the window.
/// Streak numbers are derived from the completion logs at `today`, not read
/// from the cached streak.
pub fn build_trailing_stats(
  habits: &[Habit],
  window_days: u32,
  today: NaiveDate,
) -> StatsSummary {
  let total = habits.len() as u32;

  let mut series = Vec::with_capacity(window_days as usize);
  for offset in (0..i64::from(window_days)).rev() {
    let date = today - Duration::days(offset);
    let completed =
      habits.iter().filter(|h| h.is_completed_on(date)).count() as u32;
    series.push(DayStat { date, completed, total });
  }

  let mut by_category: BTreeMap<Category, CategoryStat> = BTreeMap::new();
  for habit in habits {
    let entry = by_category.entry(habit.category).or_default();
    entry.count += 1;
    entry.completions += habit.completions.len() as u32;
  }

  let mut total_streaks = 0;
  let mut longest_streak = 0;
  for habit in habits {
    let streak = compute_streak(&habit.completions, today);
    total_streaks += streak.current;
    longest_streak = longest_streak.max(streak.longest);
  }

  let completed_today =
    habits.iter().filter(|h| h.is_completed_on(today)).count() as u32;

  StatsSummary {
    total_habits: total,
    completed_today,
    total_streaks,
    longest_streak,
    series,
    by_category,
  }
}
