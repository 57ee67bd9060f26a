//! Error type for `tend-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tend_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum discriminant that no variant matches.
  #[error("unknown discriminant: {0}")]
  Decode(String),

  #[error("habit not found: {0}")]
  HabitNotFound(uuid::Uuid),

  #[error("goal not found: {0}")]
  GoalNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
