//! HTTP server for Cadre.
//!
//! Wraps the JSON API from [`cadre_api`] under `/api` and adds request
//! tracing. The `server` binary in `main.rs` wires this to configuration and
//! a SQLite store.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use cadre_api::{ApiState, api_router};
use cadre_core::{hierarchy::MAX_HIERARCHY_DEPTH, store::StaffStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CADRE_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Deepest supervisor chain a salary or hierarchy walk will follow.
  #[serde(default = "default_max_hierarchy_depth")]
  pub max_hierarchy_depth: usize,
}

fn default_max_hierarchy_depth() -> usize { MAX_HIERARCHY_DEPTH }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`] for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let state = ApiState::with_max_depth(store, config.max_hierarchy_depth);
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
