//! Streak derivation over a habit's completion log.
//!
//! A streak is a run of consecutive calendar days with at least one
//! completion. The current streak survives [`GRACE_PERIOD_DAYS`] without a
//! new completion before it resets — a completion yesterday keeps the streak
//! alive even if today has none yet.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::Completion;

/// Full days without a completion a streak survives before resetting.
pub const GRACE_PERIOD_DAYS: i64 = 1;

/// Derived streak numbers for one habit. `longest >= current` always holds.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct StreakState {
  pub current:        u32,
  pub longest:        u32,
  pub last_completed: Option<NaiveDate>,
}

/// Derive [`StreakState`] from a completion log.
///
/// Pure: the same log and `today` always produce the same state. Duplicate
/// dates are tolerated even though the toggle invariant should prevent them.
pub fn compute_streak(completions: &[Completion], today: NaiveDate) -> StreakState {
  let dates: BTreeSet<NaiveDate> = completions.iter().map(|c| c.date).collect();
  if dates.is_empty() {
    return StreakState::default();
  }

  // Newest first; the walks below only ever look at adjacent pairs.
  let desc: Vec<NaiveDate> = dates.into_iter().rev().collect();

  let mut longest = 1u32;
  let mut run = 1u32;
  for pair in desc.windows(2) {
    if (pair[0] - pair[1]).num_days() == 1 {
      run += 1;
    } else {
      run = 1;
    }
    longest = longest.max(run);
  }

  let mut current = 0u32;
  let age = (today - desc[0]).num_days();
  if (0..=GRACE_PERIOD_DAYS).contains(&age) {
    current = 1;
    for pair in desc.windows(2) {
      if (pair[0] - pair[1]).num_days() == 1 {
        current += 1;
      } else {
        break;
      }
    }
  }

  StreakState {
    current,
    longest: longest.max(current),
    last_completed: Some(desc[0]),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;

  fn log(offsets: &[i64], today: NaiveDate) -> Vec<Completion> {
    offsets
      .iter()
      .map(|&o| Completion {
        date:         today - Duration::days(o),
        completed_at: Utc::now(),
        note:         String::new(),
        value:        1.0,
      })
      .collect()
  }

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
  }

  #[test]
  fn empty_log_is_all_zero() {
    let state = compute_streak(&[], today());
    assert_eq!(state, StreakState::default());
  }

  #[test]
  fn single_completion_today() {
    let state = compute_streak(&log(&[0], today()), today());
    assert_eq!(state.current, 1);
    assert_eq!(state.longest, 1);
    assert_eq!(state.last_completed, Some(today()));
  }

  #[test]
  fn completion_yesterday_survives_grace_period() {
    let state = compute_streak(&log(&[1], today()), today());
    assert_eq!(state.current, 1);
    assert_eq!(state.longest, 1);
  }

  #[test]
  fn two_day_gap_resets_current() {
    let state = compute_streak(&log(&[2], today()), today());
    assert_eq!(state.current, 0);
    assert_eq!(state.longest, 1);
  }

  #[test]
  fn three_consecutive_days_ending_today() {
    let state = compute_streak(&log(&[0, 1, 2], today()), today());
    assert_eq!(state.current, 3);
    assert_eq!(state.longest, 3);
  }

  #[test]
  fn gap_in_history_breaks_longest_run() {
    // 5-day run in the past, 2-day run ending today.
    let state = compute_streak(&log(&[0, 1, 10, 11, 12, 13, 14], today()), today());
    assert_eq!(state.current, 2);
    assert_eq!(state.longest, 5);
  }

  #[test]
  fn longest_never_below_current() {
    let logs: &[&[i64]] = &[
      &[0],
      &[0, 1],
      &[0, 1, 2, 5],
      &[1, 3, 4, 9],
      &[0, 2, 4, 6, 8],
    ];
    for offsets in logs {
      let state = compute_streak(&log(offsets, today()), today());
      assert!(state.longest >= state.current, "log {offsets:?}");
    }
  }

  #[test]
  fn duplicate_dates_are_tolerated() {
    let state = compute_streak(&log(&[0, 0, 1, 1], today()), today());
    assert_eq!(state.current, 2);
    assert_eq!(state.longest, 2);
  }

  #[test]
  fn future_dated_entry_does_not_count_as_current() {
    let state = compute_streak(&log(&[-1], today()), today());
    assert_eq!(state.current, 0);
    assert_eq!(state.longest, 1);
  }

  #[test]
  fn recomputation_is_idempotent() {
    let entries = log(&[0, 1, 2, 7, 8], today());
    let first = compute_streak(&entries, today());
    let second = compute_streak(&entries, today());
    assert_eq!(first, second);
  }
}
