//! [`SqliteStore`] — the SQLite implementation of [`HabitStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tend_core::{
  goal::{Goal, NewGoal, NewSubTask, SubTaskPatch, UpdateGoal},
  habit::{Completion, Habit, NewHabit, UpdateHabit},
  store::{GoalQuery, HabitQuery, HabitStore},
  streak::compute_streak,
};

use crate::{
  Error, Result,
  encode::{
    RawGoal, RawHabit, encode_category, encode_completions, encode_date,
    encode_dt, encode_goal_category, encode_goal_priority, encode_goal_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

const HABIT_COLUMNS: &str = "habit_id, name, description, icon, color, \
   category, frequency, target, reminder, completions, streak_current, \
   streak_longest, last_completed, is_archived, start_date, sort_order, \
   created_at, updated_at";

const GOAL_COLUMNS: &str = "goal_id, title, description, icon, color, \
   category, priority, status, progress, start_date, target_date, \
   completed_at, sub_tasks, milestones, notes, is_archived, created_at, \
   updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tend store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write a habit row, inserting or replacing by id.
  ///
  /// Callers must have recomputed the streak cache before this point; the
  /// cached columns are written from whatever `habit.streak` holds.
  async fn put_habit(&self, habit: &Habit) -> Result<()> {
    let habit_id_str       = encode_uuid(habit.id);
    let name               = habit.name.clone();
    let description        = habit.description.clone();
    let icon               = habit.icon.clone();
    let color              = habit.color.clone();
    let category_str       = encode_category(habit.category).to_owned();
    let frequency_str      = serde_json::to_string(&habit.frequency)?;
    let target_str         = serde_json::to_string(&habit.target)?;
    let reminder_str       = serde_json::to_string(&habit.reminder)?;
    let completions_str    = encode_completions(&habit.completions)?;
    let streak_current     = i64::from(habit.streak.current);
    let streak_longest     = i64::from(habit.streak.longest);
    let last_completed_str = habit.streak.last_completed.map(encode_date);
    let is_archived        = habit.is_archived;
    let start_date_str     = encode_date(habit.start_date);
    let sort_order         = habit.order;
    let created_at_str     = encode_dt(habit.created_at);
    let updated_at_str     = encode_dt(habit.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO habits (
             habit_id, name, description, icon, color, category,
             frequency, target, reminder, completions,
             streak_current, streak_longest, last_completed,
             is_archived, start_date, sort_order, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
          rusqlite::params![
            habit_id_str,
            name,
            description,
            icon,
            color,
            category_str,
            frequency_str,
            target_str,
            reminder_str,
            completions_str,
            streak_current,
            streak_longest,
            last_completed_str,
            is_archived,
            start_date_str,
            sort_order,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write a goal row, inserting or replacing by id.
  ///
  /// Callers must have run the progress deriver before this point.
  async fn put_goal(&self, goal: &Goal) -> Result<()> {
    let goal_id_str      = encode_uuid(goal.id);
    let title            = goal.title.clone();
    let description      = goal.description.clone();
    let icon             = goal.icon.clone();
    let color            = goal.color.clone();
    let category_str     = encode_goal_category(goal.category).to_owned();
    let priority_str     = encode_goal_priority(goal.priority).to_owned();
    let status_str       = encode_goal_status(goal.status).to_owned();
    let progress         = i64::from(goal.progress);
    let start_date_str   = encode_date(goal.start_date);
    let target_date_str  = encode_date(goal.target_date);
    let completed_at_str = goal.completed_at.map(encode_dt);
    let sub_tasks_str    = serde_json::to_string(&goal.sub_tasks)?;
    let milestones_str   = serde_json::to_string(&goal.milestones)?;
    let notes            = goal.notes.clone();
    let is_archived      = goal.is_archived;
    let created_at_str   = encode_dt(goal.created_at);
    let updated_at_str   = encode_dt(goal.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO goals (
             goal_id, title, description, icon, color, category,
             priority, status, progress, start_date, target_date,
             completed_at, sub_tasks, milestones, notes, is_archived,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
          rusqlite::params![
            goal_id_str,
            title,
            description,
            icon,
            color,
            category_str,
            priority_str,
            status_str,
            progress,
            start_date_str,
            target_date_str,
            completed_at_str,
            sub_tasks_str,
            milestones_str,
            notes,
            is_archived,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load a goal or fail with [`Error::GoalNotFound`].
  async fn require_goal(&self, id: Uuid) -> Result<Goal> {
    self.get_goal(id).await?.ok_or(Error::GoalNotFound(id))
  }
}

// ─── HabitStore impl ─────────────────────────────────────────────────────────

impl HabitStore for SqliteStore {
  type Error = Error;

  // ── Habits ────────────────────────────────────────────────────────────────

  async fn add_habit(&self, input: NewHabit) -> Result<Habit> {
    let habit = Habit::new(input, Utc::now());
    self.put_habit(&habit).await?;
    Ok(habit)
  }

  async fn get_habit(&self, id: Uuid) -> Result<Option<Habit>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawHabit> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE habit_id = ?1"),
              rusqlite::params![id_str],
              RawHabit::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawHabit::into_habit).transpose()
  }

  async fn list_habits(&self, query: HabitQuery) -> Result<Vec<Habit>> {
    let archived = query.archived;

    let raws: Vec<RawHabit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HABIT_COLUMNS} FROM habits WHERE is_archived = ?1
           ORDER BY sort_order ASC, created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![archived], RawHabit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut habits: Vec<Habit> = raws
      .into_iter()
      .map(RawHabit::into_habit)
      .collect::<Result<_>>()?;

    if let Some(category) = query.category {
      habits.retain(|h| h.category == category);
    }

    Ok(habits)
  }

  async fn update_habit(&self, id: Uuid, patch: UpdateHabit) -> Result<Habit> {
    let mut habit = self.get_habit(id).await?.ok_or(Error::HabitNotFound(id))?;
    let now = Utc::now();

    habit.apply(patch);
    // Guard the cache on every write path, not just completion toggles.
    habit.streak = compute_streak(&habit.completions, now.date_naive());
    habit.updated_at = now;

    self.put_habit(&habit).await?;
    Ok(habit)
  }

  async fn delete_habit(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM habits WHERE habit_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::HabitNotFound(id));
    }
    Ok(())
  }

  async fn toggle_completion(
    &self,
    id: Uuid,
    date: Option<NaiveDate>,
    note: String,
    value: f64,
  ) -> Result<(Habit, bool)> {
    let mut habit = self.get_habit(id).await?.ok_or(Error::HabitNotFound(id))?;
    let now = Utc::now();
    let today = now.date_naive();

    let entry = Completion {
      date: date.unwrap_or(today),
      completed_at: now,
      note,
      value,
    };
    let is_completed = habit.toggle_completion(entry, today);
    habit.updated_at = now;

    self.put_habit(&habit).await?;
    Ok((habit, is_completed))
  }

  // ── Goals ─────────────────────────────────────────────────────────────────

  async fn add_goal(&self, input: NewGoal) -> Result<Goal> {
    let now = Utc::now();
    let mut goal = Goal::new(input, now);
    goal.derive_progress(now);
    self.put_goal(&goal).await?;
    Ok(goal)
  }

  async fn get_goal(&self, id: Uuid) -> Result<Option<Goal>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawGoal> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE goal_id = ?1"),
              rusqlite::params![id_str],
              RawGoal::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGoal::into_goal).transpose()
  }

  async fn list_goals(&self, query: GoalQuery) -> Result<Vec<Goal>> {
    let archived = query.archived;

    let raws: Vec<RawGoal> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GOAL_COLUMNS} FROM goals WHERE is_archived = ?1
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![archived], RawGoal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut goals: Vec<Goal> = raws
      .into_iter()
      .map(RawGoal::into_goal)
      .collect::<Result<_>>()?;

    if let Some(status) = query.status {
      goals.retain(|g| g.status == status);
    }
    if let Some(category) = query.category {
      goals.retain(|g| g.category == category);
    }

    Ok(goals)
  }

  async fn update_goal(&self, id: Uuid, patch: UpdateGoal) -> Result<Goal> {
    let mut goal = self.require_goal(id).await?;
    let now = Utc::now();

    goal.apply(patch);
    goal.derive_progress(now);
    goal.updated_at = now;

    self.put_goal(&goal).await?;
    Ok(goal)
  }

  async fn delete_goal(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM goals WHERE goal_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::GoalNotFound(id));
    }
    Ok(())
  }

  // ── Sub-tasks ─────────────────────────────────────────────────────────────

  async fn add_sub_task(&self, goal_id: Uuid, input: NewSubTask) -> Result<Goal> {
    let mut goal = self.require_goal(goal_id).await?;
    let now = Utc::now();

    goal.push_sub_task(input, now);
    goal.updated_at = now;

    self.put_goal(&goal).await?;
    Ok(goal)
  }

  async fn update_sub_task(
    &self,
    goal_id: Uuid,
    task_id: Uuid,
    patch: SubTaskPatch,
  ) -> Result<Goal> {
    let mut goal = self.require_goal(goal_id).await?;
    let now = Utc::now();

    goal.update_sub_task(task_id, patch, now)?;
    goal.updated_at = now;

    self.put_goal(&goal).await?;
    Ok(goal)
  }

  async fn delete_sub_task(&self, goal_id: Uuid, task_id: Uuid) -> Result<Goal> {
    let mut goal = self.require_goal(goal_id).await?;
    let now = Utc::now();

    goal.remove_sub_task(task_id, now)?;
    goal.updated_at = now;

    self.put_goal(&goal).await?;
    Ok(goal)
  }
}
