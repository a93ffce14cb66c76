//! The `StaffStore` trait.
//!
//! Implemented by storage backends (e.g. `cadre-store-sqlite`). The hierarchy
//! manager and salary calculator depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::staff::{NewStaff, Role, StaffPatch, StaffRecord};

/// Abstraction over a staff store backend.
///
/// The subordinate relation has two sides (`subordinates` on the supervisor,
/// `supervisor` on the subordinate). Backends must apply both sides of a
/// change in one atomic write; a reader never sees only one side updated.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StaffStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List every record, or only those with the given role.
  fn list_staff(
    &self,
    role: Option<Role>,
  ) -> impl Future<Output = Result<Vec<StaffRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_staff(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StaffRecord>, Self::Error>> + Send + '_;

  /// Create and persist a record, assigning its id and applying defaults for
  /// unset fields. Fails if the name is already taken.
  fn create_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<StaffRecord, Self::Error>> + Send + '_;

  /// Apply a field patch. Returns `None` if the record does not exist.
  ///
  /// A patch that gives a record with subordinates a role that cannot
  /// supervise fails with [`Error::InvalidRole`](crate::Error::InvalidRole);
  /// the check and the write happen atomically.
  fn update_staff(
    &self,
    id: Uuid,
    patch: StaffPatch,
  ) -> impl Future<Output = Result<Option<StaffRecord>, Self::Error>> + Send + '_;

  /// Delete a record and clear every link that referenced it, in one atomic
  /// write. Returns the record as it was before deletion, or `None`.
  fn delete_staff(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StaffRecord>, Self::Error>> + Send + '_;

  /// Make `subordinate_id` the last direct subordinate of `manager_id`,
  /// moving it away from any previous supervisor. Returns the manager as
  /// re-read after the write.
  ///
  /// The following are checked against current data in the same atomic write
  /// that sets the link, and only the subordinate's row is written:
  ///
  /// - both records exist ([`Error::StaffNotFound`](crate::Error::StaffNotFound));
  /// - the manager's role can supervise ([`Error::InvalidRole`](crate::Error::InvalidRole));
  /// - the pair is not already linked, and the subordinate is neither the
  ///   manager nor one of its supervisors ([`Error::InvalidRelation`](crate::Error::InvalidRelation));
  /// - the manager's supervisor chain is at most `max_depth` long
  ///   ([`Error::HierarchyTooDeep`](crate::Error::HierarchyTooDeep)).
  fn link_subordinate(
    &self,
    manager_id: Uuid,
    subordinate_id: Uuid,
    max_depth: usize,
  ) -> impl Future<Output = Result<StaffRecord, Self::Error>> + Send + '_;

  /// Clear the link between `manager_id` and `subordinate_id`. Fails with
  /// [`Error::InvalidRelation`](crate::Error::InvalidRelation) unless the
  /// subordinate currently reports to the manager. Only the subordinate's row
  /// is written. Returns the manager as re-read after the write.
  fn unlink_subordinate(
    &self,
    manager_id: Uuid,
    subordinate_id: Uuid,
  ) -> impl Future<Output = Result<StaffRecord, Self::Error>> + Send + '_;

  /// Persist `record` as a whole, including its hierarchy pointers.
  ///
  /// Every id in `record.subordinates` ends up with `record` as supervisor (in
  /// list order), and every former subordinate missing from the list has its
  /// supervisor cleared. All of this is one atomic write. Returns the record
  /// as re-read from the store.
  fn save_staff<'a>(
    &'a self,
    record: &'a StaffRecord,
  ) -> impl Future<Output = Result<StaffRecord, Self::Error>> + Send + 'a;
}
