//! [`SqliteStore`]: the SQLite implementation of [`StaffStore`].

use std::{collections::HashMap, path::Path};

use cadre_core::{
  Error as CoreError,
  staff::{DEFAULT_BASE_SALARY, NewStaff, Role, StaffPatch, StaffRecord},
  store::StaffStore,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawStaff, STAFF_COLUMNS, encode_dt, encode_role, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cadre staff store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(?path, "opened staff store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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
}

// ─── Connection helpers ──────────────────────────────────────────────────────

/// Result of a write closure. Domain failures are carried out of the closure
/// as values so the transaction can be dropped (rolled back) before they are
/// turned into [`Error`]s.
enum Write<T> {
  Done(T),
  Missing(Uuid),
  NameTaken(String),
  Rejected(CoreError),
}

impl Write<RawStaff> {
  fn into_record(self) -> Result<StaffRecord> {
    match self {
      Write::Done(raw) => raw.into_record(),
      Write::Missing(id) => Err(Error::StaffNotFound(id)),
      Write::NameTaken(name) => Err(Error::DuplicateName(name)),
      Write::Rejected(e) => Err(Error::Core(e)),
    }
  }
}

fn read_subordinates(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT staff_id FROM staff WHERE supervisor_id = ?1 ORDER BY link_seq, rowid",
  )?;
  stmt
    .query_map(rusqlite::params![id], |row| row.get(0))?
    .collect()
}

fn read_staff(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawStaff>> {
  let raw = conn
    .query_row(
      &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE staff_id = ?1"),
      rusqlite::params![id],
      RawStaff::from_row,
    )
    .optional()?;

  let Some(mut raw) = raw else {
    return Ok(None);
  };
  raw.subordinates = read_subordinates(conn, id)?;
  Ok(Some(raw))
}

/// Re-read a row written earlier in the same closure.
fn reread_staff(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<RawStaff> {
  read_staff(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Whether `name` belongs to a row other than `except`.
fn name_taken(
  conn: &rusqlite::Connection,
  name: &str,
  except: Option<&str>,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM staff WHERE name = ?1 AND staff_id IS NOT ?2",
        rusqlite::params![name, except],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn staff_exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM staff WHERE staff_id = ?1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn role_of(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT role FROM staff WHERE staff_id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()
}

/// `None` if the row is missing, otherwise its current `supervisor_id`.
fn supervisor_of(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<Option<String>>> {
  conn
    .query_row(
      "SELECT supervisor_id FROM staff WHERE staff_id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()
}

fn has_subordinates(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM staff WHERE supervisor_id = ?1 LIMIT 1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

enum Ancestry {
  Clear,
  Cycle,
  TooDeep,
}

/// Walk the supervisor chain above `from`, looking for `target` within
/// `max_depth + 1` levels.
fn ancestry(
  conn: &rusqlite::Connection,
  from: &str,
  target: &str,
  max_depth: usize,
) -> rusqlite::Result<Ancestry> {
  let (hit, deepest): (Option<i64>, Option<i64>) = conn.query_row(
    "WITH RECURSIVE chain(id, depth) AS (
       SELECT supervisor_id, 1 FROM staff
        WHERE staff_id = ?1 AND supervisor_id IS NOT NULL
       UNION ALL
       SELECT s.supervisor_id, c.depth + 1 FROM staff s
         JOIN chain c ON s.staff_id = c.id
        WHERE s.supervisor_id IS NOT NULL AND c.id <> ?2 AND c.depth <= ?3
     )
     SELECT MAX(id = ?2), MAX(depth) FROM chain",
    rusqlite::params![from, target, max_depth as i64],
    |row| Ok((row.get(0)?, row.get(1)?)),
  )?;

  Ok(match (hit, deepest) {
    (Some(1), _) => Ancestry::Cycle,
    (_, Some(d)) if d as usize > max_depth => Ancestry::TooDeep,
    _ => Ancestry::Clear,
  })
}

// ─── StaffStore impl ─────────────────────────────────────────────────────────

impl StaffStore for SqliteStore {
  type Error = Error;

  async fn list_staff(&self, role: Option<Role>) -> Result<Vec<StaffRecord>> {
    let role_str = role.map(encode_role);

    let raws: Vec<RawStaff> = self
      .conn
      .call(move |conn| {
        let mut rows = if let Some(r) = role_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE role = ?1 ORDER BY rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![r], RawStaff::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn
            .prepare(&format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY rowid"))?;
          stmt
            .query_map([], RawStaff::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut links: HashMap<String, Vec<String>> = HashMap::new();
        let mut stmt = conn.prepare(
          "SELECT supervisor_id, staff_id FROM staff
           WHERE supervisor_id IS NOT NULL
           ORDER BY link_seq, rowid",
        )?;
        let pairs = stmt.query_map([], |row| {
          Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for pair in pairs {
          let (supervisor, subordinate) = pair?;
          links.entry(supervisor).or_default().push(subordinate);
        }

        for raw in &mut rows {
          raw.subordinates = links.remove(&raw.staff_id).unwrap_or_default();
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStaff::into_record).collect()
  }

  async fn get_staff(&self, id: Uuid) -> Result<Option<StaffRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| Ok(read_staff(conn, &id_str)?))
      .await?;

    raw.map(RawStaff::into_record).transpose()
  }

  async fn create_staff(&self, input: NewStaff) -> Result<StaffRecord> {
    let id_str    = encode_uuid(Uuid::new_v4());
    let name      = input.name;
    let join_str  = encode_dt(input.join_date.unwrap_or_else(Utc::now));
    let base      = input.base_salary.unwrap_or(DEFAULT_BASE_SALARY);
    let role_str  = encode_role(input.role.unwrap_or_default());

    let outcome = self
      .conn
      .call(move |conn| {
        if name_taken(conn, &name, None)? {
          return Ok(Write::NameTaken(name));
        }
        conn.execute(
          "INSERT INTO staff (staff_id, name, join_date, base_salary, role)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, join_str, base, role_str],
        )?;
        Ok(Write::Done(reread_staff(conn, &id_str)?))
      })
      .await?;

    outcome.into_record()
  }

  async fn update_staff(
    &self,
    id:    Uuid,
    patch: StaffPatch,
  ) -> Result<Option<StaffRecord>> {
    let id_str   = encode_uuid(id);
    let name     = patch.name;
    let join_str = patch.join_date.map(encode_dt);
    let base     = patch.base_salary;
    let role_str = patch.role.map(encode_role);
    let demotion = patch.role.filter(|role| !role.can_supervise());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !staff_exists(&tx, &id_str)? {
          return Ok(Write::Missing(id));
        }
        if let Some(role) = demotion
          && has_subordinates(&tx, &id_str)?
        {
          return Ok(Write::Rejected(CoreError::InvalidRole { staff_id: id, role }));
        }
        if let Some(n) = &name
          && name_taken(&tx, n, Some(id_str.as_str()))?
        {
          return Ok(Write::NameTaken(n.clone()));
        }
        tx.execute(
          "UPDATE staff SET
             name        = COALESCE(?2, name),
             join_date   = COALESCE(?3, join_date),
             base_salary = COALESCE(?4, base_salary),
             role        = COALESCE(?5, role)
           WHERE staff_id = ?1",
          rusqlite::params![id_str, name, join_str, base, role_str],
        )?;
        let raw = reread_staff(&tx, &id_str)?;
        tx.commit()?;
        Ok(Write::Done(raw))
      })
      .await?;

    match outcome {
      Write::Missing(_) => Ok(None),
      other => other.into_record().map(Some),
    }
  }

  async fn delete_staff(&self, id: Uuid) -> Result<Option<StaffRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(raw) = read_staff(&tx, &id_str)? else {
          return Ok(None);
        };
        // Orphan the subordinates; the row's own entry in its supervisor's
        // list disappears with the row.
        tx.execute(
          "UPDATE staff SET supervisor_id = NULL, link_seq = 0 WHERE supervisor_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM staff WHERE staff_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawStaff::into_record).transpose()
  }

  async fn link_subordinate(
    &self,
    manager_id:     Uuid,
    subordinate_id: Uuid,
    max_depth:      usize,
  ) -> Result<StaffRecord> {
    let manager_str     = encode_uuid(manager_id);
    let subordinate_str = encode_uuid(subordinate_id);

    let outcome = self
      .conn
      .call(move |conn| {
        if manager_id == subordinate_id {
          return Ok(Write::Rejected(CoreError::InvalidRelation(format!(
            "staff member {manager_id} cannot be its own subordinate"
          ))));
        }
        let tx = conn.transaction()?;

        let Some(role) = role_of(&tx, &manager_str)? else {
          return Ok(Write::Missing(manager_id));
        };
        let Some(previous) = supervisor_of(&tx, &subordinate_str)? else {
          return Ok(Write::Missing(subordinate_id));
        };
        let role = match Role::parse(&role) {
          Ok(role) => role,
          Err(e) => return Ok(Write::Rejected(e)),
        };
        if !role.can_supervise() {
          return Ok(Write::Rejected(CoreError::InvalidRole {
            staff_id: manager_id,
            role,
          }));
        }
        if previous.as_deref() == Some(manager_str.as_str()) {
          return Ok(Write::Rejected(CoreError::InvalidRelation(format!(
            "staff member {subordinate_id} is already a subordinate of {manager_id}"
          ))));
        }
        match ancestry(&tx, &manager_str, &subordinate_str, max_depth)? {
          Ancestry::Clear => {}
          Ancestry::Cycle => {
            return Ok(Write::Rejected(CoreError::InvalidRelation(format!(
              "linking {subordinate_id} under {manager_id} would create a cycle"
            ))));
          }
          Ancestry::TooDeep => {
            return Ok(Write::Rejected(CoreError::HierarchyTooDeep(max_depth)));
          }
        }

        tx.execute(
          "UPDATE staff SET
             supervisor_id = ?1,
             link_seq      = (SELECT COALESCE(MAX(link_seq), -1) + 1
                              FROM staff WHERE supervisor_id = ?1)
           WHERE staff_id = ?2",
          rusqlite::params![manager_str, subordinate_str],
        )?;
        if let Some(previous) = previous {
          tracing::debug!(
            subordinate = %subordinate_str,
            %previous,
            manager = %manager_str,
            "moved subordinate"
          );
        }

        let raw = reread_staff(&tx, &manager_str)?;
        tx.commit()?;
        Ok(Write::Done(raw))
      })
      .await?;

    outcome.into_record()
  }

  async fn unlink_subordinate(
    &self,
    manager_id:     Uuid,
    subordinate_id: Uuid,
  ) -> Result<StaffRecord> {
    let manager_str     = encode_uuid(manager_id);
    let subordinate_str = encode_uuid(subordinate_id);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !staff_exists(&tx, &manager_str)? {
          return Ok(Write::Missing(manager_id));
        }
        let Some(current) = supervisor_of(&tx, &subordinate_str)? else {
          return Ok(Write::Missing(subordinate_id));
        };
        if current.as_deref() != Some(manager_str.as_str()) {
          return Ok(Write::Rejected(CoreError::InvalidRelation(format!(
            "staff member {subordinate_id} is not a subordinate of {manager_id}"
          ))));
        }

        tx.execute(
          "UPDATE staff SET supervisor_id = NULL, link_seq = 0 WHERE staff_id = ?1",
          rusqlite::params![subordinate_str],
        )?;

        let raw = reread_staff(&tx, &manager_str)?;
        tx.commit()?;
        Ok(Write::Done(raw))
      })
      .await?;

    outcome.into_record()
  }

  async fn save_staff(&self, record: &StaffRecord) -> Result<StaffRecord> {
    let record_id    = record.staff_id;
    let name         = record.name.clone();
    let join_str     = encode_dt(record.join_date);
    let base         = record.base_salary;
    let role_str     = encode_role(record.role);
    let supervisor   = record.supervisor;
    let subordinates = record.subordinates.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let id_str = encode_uuid(record_id);
        let tx = conn.transaction()?;

        if !staff_exists(&tx, &id_str)? {
          return Ok(Write::Missing(record_id));
        }
        if name_taken(&tx, &name, Some(id_str.as_str()))? {
          return Ok(Write::NameTaken(name));
        }
        let supervisor_str = supervisor.map(encode_uuid);
        if let (Some(sup), Some(sup_str)) = (supervisor, &supervisor_str)
          && !staff_exists(&tx, sup_str)?
        {
          return Ok(Write::Missing(sup));
        }

        // A record keeps its slot in an unchanged supervisor's list and goes
        // to the end of a new one.
        tx.execute(
          "UPDATE staff SET
             name        = ?2,
             join_date   = ?3,
             base_salary = ?4,
             role        = ?5,
             link_seq    = CASE
               WHEN supervisor_id IS ?6 THEN link_seq
               ELSE (SELECT COALESCE(MAX(link_seq), -1) + 1
                     FROM staff WHERE supervisor_id = ?6)
             END,
             supervisor_id = ?6
           WHERE staff_id = ?1",
          rusqlite::params![id_str, name, join_str, base, role_str, supervisor_str],
        )?;

        tx.execute(
          "UPDATE staff SET supervisor_id = NULL, link_seq = 0 WHERE supervisor_id = ?1",
          rusqlite::params![id_str],
        )?;
        for (seq, subordinate) in subordinates.iter().enumerate() {
          let changed = tx.execute(
            "UPDATE staff SET supervisor_id = ?1, link_seq = ?2 WHERE staff_id = ?3",
            rusqlite::params![id_str, seq as i64, encode_uuid(*subordinate)],
          )?;
          if changed == 0 {
            return Ok(Write::Missing(*subordinate));
          }
        }

        let raw = reread_staff(&tx, &id_str)?;
        tx.commit()?;
        Ok(Write::Done(raw))
      })
      .await?;

    outcome.into_record()
  }
}
