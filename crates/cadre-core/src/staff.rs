//! Staff records, one row per member of the organization.
//!
//! A record carries both ends of the hierarchy relation: the ordered list of
//! direct `subordinates` and the single optional `supervisor`. Backends keep
//! the two sides consistent; see [`crate::store::StaffStore::save_staff`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Base salary applied when a record is created without one.
pub const DEFAULT_BASE_SALARY: f64 = 500.0;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The closed set of staff roles. The role selects the salary rule and how
/// deep subordinate salaries are aggregated.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Older records spell this `emploee`; both spellings are accepted.
  #[default]
  #[serde(alias = "emploee")]
  #[strum(to_string = "employee", serialize = "emploee")]
  Employee,
  #[strum(to_string = "manager")]
  Manager,
  #[strum(to_string = "sales")]
  Sales,
}

impl Role {
  /// Parse a role name, failing with [`Error::UnknownRole`] rather than
  /// falling back to a default.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownRole(s.to_owned()))
  }

  /// Whether records with this role may hold subordinates.
  pub fn can_supervise(self) -> bool { !matches!(self, Self::Employee) }
}

// ─── StaffRecord ─────────────────────────────────────────────────────────────

/// A persisted staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
  /// Store-assigned; never changes after creation.
  pub staff_id:     Uuid,
  /// Unique across all records.
  pub name:         String,
  pub join_date:    DateTime<Utc>,
  pub base_salary:  f64,
  pub role:         Role,
  /// Direct subordinates in the order they were linked.
  pub subordinates: Vec<Uuid>,
  pub supervisor:   Option<Uuid>,
}

// ─── NewStaff ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::StaffStore::create_staff`]. Unset fields take
/// their defaults in the store: `join_date` is the creation time,
/// `base_salary` is [`DEFAULT_BASE_SALARY`] and `role` is
/// [`Role::Employee`].
#[derive(Debug, Clone)]
pub struct NewStaff {
  pub name:        String,
  pub join_date:   Option<DateTime<Utc>>,
  pub base_salary: Option<f64>,
  pub role:        Option<Role>,
}

impl NewStaff {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      join_date:   None,
      base_salary: None,
      role:        None,
    }
  }

  pub fn with_role(mut self, role: Role) -> Self {
    self.role = Some(role);
    self
  }

  pub fn with_base_salary(mut self, base_salary: f64) -> Self {
    self.base_salary = Some(base_salary);
    self
  }

  pub fn with_join_date(mut self, join_date: DateTime<Utc>) -> Self {
    self.join_date = Some(join_date);
    self
  }
}

// ─── StaffPatch ──────────────────────────────────────────────────────────────

/// A partial field update. Hierarchy links are changed only through
/// [`crate::hierarchy::HierarchyManager`].
#[derive(Debug, Clone, Default)]
pub struct StaffPatch {
  pub name:        Option<String>,
  pub join_date:   Option<DateTime<Utc>>,
  pub base_salary: Option<f64>,
  pub role:        Option<Role>,
}

impl StaffPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.join_date.is_none()
      && self.base_salary.is_none()
      && self.role.is_none()
  }
}

/// Reject negative and non-finite base salaries.
pub fn validate_base_salary(amount: f64) -> Result<()> {
  if amount.is_finite() && amount >= 0.0 {
    Ok(())
  } else {
    Err(Error::InvalidSalary(amount))
  }
}
