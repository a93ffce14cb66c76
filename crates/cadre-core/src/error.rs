//! Error types for `cadre-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::staff::Role;

#[derive(Debug, Error)]
pub enum Error {
  #[error("staff member not found: {0}")]
  StaffNotFound(Uuid),

  /// Self-reference, a link that does not exist, or a link that would close
  /// a cycle.
  #[error("invalid relation: {0}")]
  InvalidRelation(String),

  #[error("staff member {staff_id} has role {role} and cannot have subordinates")]
  InvalidRole { staff_id: Uuid, role: Role },

  #[error("configuration error: unknown staff role {0:?}")]
  UnknownRole(String),

  #[error("base salary must be a non-negative amount, got {0}")]
  InvalidSalary(f64),

  #[error("a staff member named {0:?} already exists")]
  DuplicateName(String),

  #[error("hierarchy deeper than {0} levels")]
  HierarchyTooDeep(usize),

  #[error("cycle in hierarchy at staff member {0}")]
  CycleDetected(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
