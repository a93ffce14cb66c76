//! Handlers for `/staff` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/staff` | Optional `?role=employee\|manager\|sales` |
//! | `POST`   | `/staff` | Body: [`CreateBody`]; returns 201 + stored record |
//! | `GET`    | `/staff/:id` | 404 if not found |
//! | `PATCH`  | `/staff/:id` | Body: [`UpdateBody`] |
//! | `DELETE` | `/staff/:id` | Returns the deleted record |
//! | `POST`   | `/staff/:id/subordinates` | Body: `{"subordinate_id":"..."}` |
//! | `DELETE` | `/staff/:id/subordinates/:subordinate_id` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cadre_core::{
  staff::{NewStaff, Role, StaffPatch, StaffRecord},
  store::StaffStore,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub role: Option<String>,
}

/// `GET /staff[?role=<role>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<StaffRecord>>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let role = params.role.as_deref().map(Role::parse).transpose()?;
  let staff = state
    .store
    .list_staff(role)
    .await
    .map_err(cadre_core::Error::from)?;
  Ok(Json(staff))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /staff/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<StaffRecord>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let record = state
    .store
    .get_staff(id)
    .await
    .map_err(cadre_core::Error::from)?
    .ok_or_else(|| ApiError::NotFound(format!("staff member {id} not found")))?;
  Ok(Json(record))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /staff`. Omitted fields take the store's
/// defaults.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  pub join_date:   Option<DateTime<Utc>>,
  pub base_salary: Option<f64>,
  pub role:        Option<String>,
}

impl TryFrom<CreateBody> for NewStaff {
  type Error = cadre_core::Error;

  fn try_from(b: CreateBody) -> Result<Self, Self::Error> {
    Ok(NewStaff {
      name:        b.name,
      join_date:   b.join_date,
      base_salary: b.base_salary,
      role:        b.role.as_deref().map(Role::parse).transpose()?,
    })
  }
}

/// `POST /staff`: returns 201 and the stored [`StaffRecord`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let record = state.hierarchy.create_staff(NewStaff::try_from(body)?).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /staff/:id`. Only present fields change.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateBody {
  pub name:        Option<String>,
  pub join_date:   Option<DateTime<Utc>>,
  pub base_salary: Option<f64>,
  pub role:        Option<String>,
}

impl TryFrom<UpdateBody> for StaffPatch {
  type Error = cadre_core::Error;

  fn try_from(b: UpdateBody) -> Result<Self, Self::Error> {
    Ok(StaffPatch {
      name:        b.name,
      join_date:   b.join_date,
      base_salary: b.base_salary,
      role:        b.role.as_deref().map(Role::parse).transpose()?,
    })
  }
}

/// `PATCH /staff/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<StaffRecord>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let record = state
    .hierarchy
    .update_staff(id, StaffPatch::try_from(body)?)
    .await?;
  Ok(Json(record))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /staff/:id`. Links to and from the record are cleared.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<StaffRecord>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  Ok(Json(state.hierarchy.delete_staff(id).await?))
}

// ─── Subordinate links ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LinkBody {
  pub subordinate_id: Uuid,
}

/// `POST /staff/:id/subordinates`: returns the updated manager.
pub async fn add_subordinate<S>(
  State(state): State<ApiState<S>>,
  Path(manager_id): Path<Uuid>,
  Json(body): Json<LinkBody>,
) -> Result<Json<StaffRecord>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let manager = state
    .hierarchy
    .add_subordinate(manager_id, body.subordinate_id)
    .await?;
  Ok(Json(manager))
}

/// `DELETE /staff/:id/subordinates/:subordinate_id`: returns the updated
/// manager.
pub async fn remove_subordinate<S>(
  State(state): State<ApiState<S>>,
  Path((manager_id, subordinate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StaffRecord>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let manager = state
    .hierarchy
    .remove_subordinate(manager_id, subordinate_id)
    .await?;
  Ok(Json(manager))
}
