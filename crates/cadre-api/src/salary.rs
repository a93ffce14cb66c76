//! Handlers for salary queries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/staff/:id/salary` | `{"staff_id":"...","salary":1107.725}` |
//! | `GET`  | `/salaries` | [`SalaryReport`] over all staff |

use axum::{
  Json,
  extract::{Path, State},
};
use cadre_core::{salary::SalaryReport, store::StaffStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct SalaryBody {
  pub staff_id: Uuid,
  pub salary:   f64,
}

/// `GET /staff/:id/salary`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(staff_id): Path<Uuid>,
) -> Result<Json<SalaryBody>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  let salary = state.salary.calculate_salary(staff_id).await?;
  Ok(Json(SalaryBody { staff_id, salary }))
}

/// `GET /salaries`
pub async fn report<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<SalaryReport>, ApiError>
where
  S: StaffStore + 'static,
  cadre_core::Error: From<S::Error>,
{
  Ok(Json(state.salary.salary_report().await?))
}
