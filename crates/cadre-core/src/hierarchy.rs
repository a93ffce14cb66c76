//! The hierarchy manager. Every mutation of staff records goes through here.
//!
//! Requests are held to the relation invariants: no self-reference, only
//! supervising roles hold subordinates, no cycles. Checks that need current
//! data are made by the store inside the write that applies the change, so
//! concurrent requests cannot invalidate them in between.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  staff::{NewStaff, StaffPatch, StaffRecord, validate_base_salary},
  store::StaffStore,
};

/// Upper bound on supervisor chains and subordinate recursion.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Validates and applies staff mutations against a [`StaffStore`].
pub struct HierarchyManager<S> {
  store:     Arc<S>,
  max_depth: usize,
}

impl<S> Clone for HierarchyManager<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), max_depth: self.max_depth }
  }
}

impl<S> HierarchyManager<S>
where
  S: StaffStore,
  Error: From<S::Error>,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, max_depth: MAX_HIERARCHY_DEPTH }
  }

  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  async fn require(&self, id: Uuid) -> Result<StaffRecord> {
    self.store.get_staff(id).await?.ok_or(Error::StaffNotFound(id))
  }

  // ── Records ─────────────────────────────────────────────────────────────

  pub async fn create_staff(&self, input: NewStaff) -> Result<StaffRecord> {
    if let Some(amount) = input.base_salary {
      validate_base_salary(amount)?;
    }
    let record = self.store.create_staff(input).await?;
    tracing::info!(staff_id = %record.staff_id, name = %record.name, role = %record.role, "created staff member");
    Ok(record)
  }

  /// Patch a record's fields. A record that currently has subordinates cannot
  /// be demoted to [`Role::Employee`](crate::staff::Role::Employee); the store
  /// enforces this in the same write. An empty patch writes nothing and
  /// returns the record as stored.
  pub async fn update_staff(
    &self,
    id: Uuid,
    patch: StaffPatch,
  ) -> Result<StaffRecord> {
    if let Some(amount) = patch.base_salary {
      validate_base_salary(amount)?;
    }
    if patch.is_empty() {
      return self.require(id).await;
    }

    let updated = self
      .store
      .update_staff(id, patch)
      .await
      .map_err(Error::from)
      .inspect_err(|e| tracing::debug!(staff_id = %id, error = %e, "rejected staff update"))?
      .ok_or(Error::StaffNotFound(id))?;
    tracing::info!(staff_id = %id, "updated staff member");
    Ok(updated)
  }

  /// Delete a record. Links to and from it are cleared in the same write:
  /// its supervisor loses it as a subordinate and its subordinates lose it as
  /// supervisor.
  pub async fn delete_staff(&self, id: Uuid) -> Result<StaffRecord> {
    let deleted = self
      .store
      .delete_staff(id)
      .await?
      .ok_or(Error::StaffNotFound(id))?;
    tracing::info!(
      staff_id = %id,
      orphaned = deleted.subordinates.len(),
      "deleted staff member"
    );
    Ok(deleted)
  }

  // ── Links ───────────────────────────────────────────────────────────────

  /// Make `subordinate_id` a direct subordinate of `manager_id`.
  ///
  /// A subordinate that already reports to someone else is moved. Role,
  /// duplicate and cycle checks run inside the store write. Returns the
  /// updated manager.
  pub async fn add_subordinate(
    &self,
    manager_id: Uuid,
    subordinate_id: Uuid,
  ) -> Result<StaffRecord> {
    if manager_id == subordinate_id {
      return Err(Error::InvalidRelation(format!(
        "staff member {manager_id} cannot be its own subordinate"
      )));
    }

    let updated = self
      .store
      .link_subordinate(manager_id, subordinate_id, self.max_depth)
      .await
      .map_err(Error::from)
      .inspect_err(|e| tracing::debug!(%manager_id, %subordinate_id, error = %e, "rejected link"))?;
    tracing::info!(%manager_id, %subordinate_id, "linked subordinate");
    Ok(updated)
  }

  /// Detach `subordinate_id` from `manager_id`. Returns the updated manager.
  pub async fn remove_subordinate(
    &self,
    manager_id: Uuid,
    subordinate_id: Uuid,
  ) -> Result<StaffRecord> {
    let updated = self
      .store
      .unlink_subordinate(manager_id, subordinate_id)
      .await?;
    tracing::info!(%manager_id, %subordinate_id, "unlinked subordinate");
    Ok(updated)
  }
}
