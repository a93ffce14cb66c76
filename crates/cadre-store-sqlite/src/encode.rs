//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings and roles by name.

use cadre_core::staff::{Role, StaffRecord};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> String { role.to_string() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(Role::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `staff` row, plus the ids of the rows
/// that name it as supervisor.
pub struct RawStaff {
  pub staff_id:      String,
  pub name:          String,
  pub join_date:     String,
  pub base_salary:   f64,
  pub role:          String,
  pub supervisor_id: Option<String>,
  pub subordinates:  Vec<String>,
}

impl RawStaff {
  /// Map a row selected with [`STAFF_COLUMNS`]; `subordinates` is left empty.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      staff_id:      row.get(0)?,
      name:          row.get(1)?,
      join_date:     row.get(2)?,
      base_salary:   row.get(3)?,
      role:          row.get(4)?,
      supervisor_id: row.get(5)?,
      subordinates:  Vec::new(),
    })
  }

  pub fn into_record(self) -> Result<StaffRecord> {
    Ok(StaffRecord {
      staff_id:     decode_uuid(&self.staff_id)?,
      name:         self.name,
      join_date:    decode_dt(&self.join_date)?,
      base_salary:  self.base_salary,
      role:         decode_role(&self.role)?,
      subordinates: self
        .subordinates
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<_>>()?,
      supervisor:   self.supervisor_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

/// Column list matching [`RawStaff::from_row`].
pub const STAFF_COLUMNS: &str =
  "staff_id, name, join_date, base_salary, role, supervisor_id";
