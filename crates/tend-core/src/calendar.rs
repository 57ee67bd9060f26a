//! Month-calendar aggregation across a user's habits.
//!
//! Computed on demand per month query; never persisted.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::habit::Habit;

/// Display handle for a habit completed on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitRef {
  pub id:    Uuid,
  pub name:  String,
  pub icon:  String,
  pub color: String,
}

impl From<&Habit> for HabitRef {
  fn from(habit: &Habit) -> Self {
    Self {
      id:    habit.id,
      name:  habit.name.clone(),
      icon:  habit.icon.clone(),
      color: habit.color.clone(),
    }
  }
}

/// One day's aggregate in the month view.
///
/// `total` counts habits scheduled that day; `completed` counts habits with a
/// completion record, whether or not they were scheduled. The two are
/// independent on purpose — completing an unscheduled habit still shows up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalendarDay {
  pub completed: u32,
  pub total:     u32,
  pub habits:    Vec<HabitRef>,
}

/// Aggregate completions into one [`CalendarDay`] per day of the given month.
///
/// Every day of the month appears in the result, including days with no
/// completions. An invalid year/month combination yields an empty map.
pub fn build_calendar(
  habits: &[Habit],
  year: i32,
  month: u32,
) -> BTreeMap<NaiveDate, CalendarDay> {
  let mut days = BTreeMap::new();
  let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
    return days;
  };

  let mut date = first;
  while date.month() == month && date.year() == year {
    let mut day = CalendarDay::default();
    for habit in habits {
      if habit.is_scheduled_on(date) {
        day.total += 1;
      }
      if habit.is_completed_on(date) {
        day.completed += 1;
        day.habits.push(HabitRef::from(habit));
      }
    }
    days.insert(date, day);
    match date.succ_opt() {
      Some(next) => date = next,
      None => break,
    }
  }
  days
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::habit::{
    Category, Completion, Frequency, FrequencyKind, NewHabit, Reminder, Target,
  };

  fn habit(name: &str, frequency: Frequency) -> Habit {
    Habit::new(
      NewHabit {
        name:        name.to_owned(),
        description: String::new(),
        icon:        "⭐".to_owned(),
        color:       "#f59e0b".to_owned(),
        category:    Category::Other,
        frequency,
        target:      Target::default(),
        reminder:    Reminder::default(),
        start_date:  None,
        order:       0,
      },
      Utc::now(),
    )
  }

  fn complete_on(h: &mut Habit, date: NaiveDate) {
    let entry = Completion {
      date,
      completed_at: Utc::now(),
      note: String::new(),
      value: 1.0,
    };
    h.toggle_completion(entry, date);
  }

  #[test]
  fn every_day_of_the_month_is_present() {
    let days = build_calendar(&[], 2026, 2);
    assert_eq!(days.len(), 28);
    assert!(days.values().all(|d| *d == CalendarDay::default()));
  }

  #[test]
  fn invalid_month_yields_empty_map() {
    assert!(build_calendar(&[], 2026, 13).is_empty());
    assert!(build_calendar(&[], 2026, 0).is_empty());
  }

  #[test]
  fn month_sum_matches_in_month_completion_count() {
    let mut h = habit("run", Frequency::default());
    let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    for offset in [0, 4, 9, 30] {
      complete_on(&mut h, jan + Duration::days(offset));
    }
    // Outside January; must not be counted.
    complete_on(&mut h, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());

    let days = build_calendar(std::slice::from_ref(&h), 2026, 1);
    let sum: u32 = days.values().map(|d| d.completed).sum();
    assert_eq!(sum, 4);
  }

  #[test]
  fn total_is_schedule_aware() {
    let daily = habit("stretch", Frequency::default());
    let weekly = habit(
      "swim",
      Frequency {
        kind:           FrequencyKind::Weekly,
        days_of_week:   vec![1], // Mondays only
        times_per_week: 1,
      },
    );

    let days = build_calendar(&[daily, weekly], 2026, 3);
    // 2026-03-02 is a Monday, 2026-03-03 a Tuesday.
    let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    assert_eq!(days[&monday].total, 2);
    assert_eq!(days[&tuesday].total, 1);
  }

  #[test]
  fn unscheduled_completion_still_counts() {
    let mut weekly = habit(
      "swim",
      Frequency {
        kind:           FrequencyKind::Weekly,
        days_of_week:   vec![1],
        times_per_week: 1,
      },
    );
    // Completed on a Tuesday, a day it is not scheduled.
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    complete_on(&mut weekly, tuesday);

    let days = build_calendar(std::slice::from_ref(&weekly), 2026, 3);
    assert_eq!(days[&tuesday].completed, 1);
    assert_eq!(days[&tuesday].total, 0);
    assert_eq!(days[&tuesday].habits.len(), 1);
    assert_eq!(days[&tuesday].habits[0].name, "swim");
  }
}
