//! JSON REST API for Cadre.
//!
//! Exposes an axum [`Router`] backed by any [`cadre_core::store::StaffStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cadre_api::api_router(ApiState::new(store.clone())))
//! ```

pub mod error;
pub mod salary;
pub mod staff;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use cadre_core::{
  hierarchy::{HierarchyManager, MAX_HIERARCHY_DEPTH},
  salary::SalaryCalculator,
  store::StaffStore,
};

pub use error::ApiError;

/// Shared state threaded through all handlers: the store for plain reads,
/// and the engine components built on top of it.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub hierarchy: HierarchyManager<S>,
  pub salary:    SalaryCalculator<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      hierarchy: self.hierarchy.clone(),
      salary:    self.salary.clone(),
    }
  }
}

impl<S> ApiState<S>
where
  S: StaffStore,
  cadre_core::Error: From<S::Error>,
{
  pub fn new(store: Arc<S>) -> Self {
    Self::with_max_depth(store, MAX_HIERARCHY_DEPTH)
  }

  /// Build state whose hierarchy walks stop after `max_depth` levels.
  pub fn with_max_depth(store: Arc<S>, max_depth: usize) -> Self {
    Self {
      hierarchy: HierarchyManager::new(store.clone()).with_max_depth(max_depth),
      salary:    SalaryCalculator::new(store.clone()).with_max_depth(max_depth),
      store,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  Router::new()
    // Staff records
    .route("/staff", get(staff::list::<S>).post(staff::create::<S>))
    .route(
      "/staff/{id}",
      get(staff::get_one::<S>)
        .patch(staff::update::<S>)
        .delete(staff::delete_one::<S>),
    )
    // Hierarchy links
    .route("/staff/{id}/subordinates", post(staff::add_subordinate::<S>))
    .route(
      "/staff/{id}/subordinates/{subordinate_id}",
      delete(staff::remove_subordinate::<S>),
    )
    // Salaries
    .route("/staff/{id}/salary", get(salary::get_one::<S>))
    .route("/salaries", get(salary::report::<S>))
    .with_state(state)
}
