//! Error type for `cadre-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cadre_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("staff member not found: {0}")]
  StaffNotFound(uuid::Uuid),

  #[error("a staff member named {0:?} already exists")]
  DuplicateName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for cadre_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::StaffNotFound(id) => cadre_core::Error::StaffNotFound(id),
      Error::DuplicateName(name) => cadre_core::Error::DuplicateName(name),
      other => cadre_core::Error::Store(Box::new(other)),
    }
  }
}
