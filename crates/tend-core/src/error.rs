//! Error types for `tend-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("sub-task not found: {0}")]
  SubTaskNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
