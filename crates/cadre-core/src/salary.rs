//! The salary calculator.
//!
//! A member's salary is their base salary, plus a capped tenure bonus, plus a
//! share of the salaries of the people below them. How far down that share
//! reaches depends on the role:
//!
//! | Role | Subordinate salaries counted |
//! |------|------------------------------|
//! | `employee` | none |
//! | `manager`  | direct subordinates only |
//! | `sales`    | every transitive subordinate |
//!
//! Each subordinate's salary is itself computed by the same rules, so the
//! calculation recurses down the hierarchy. Sibling calculations run
//! concurrently.

use std::{collections::{BTreeMap, HashSet}, sync::Arc};

use chrono::{DateTime, Datelike, Utc};
use futures::future::{BoxFuture, FutureExt, try_join_all};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  hierarchy::MAX_HIERARCHY_DEPTH,
  rules::SalaryRule,
  staff::{Role, StaffRecord},
  store::StaffStore,
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// Salary of every staff member keyed by name, plus the sum.
///
/// `total` adds up independently computed salaries, so subordinate bonuses
/// already folded into a superior's salary are counted again for the
/// subordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryReport {
  pub staff: BTreeMap<String, f64>,
  pub total: f64,
}

// ─── Calculator ──────────────────────────────────────────────────────────────

/// Computes salaries from records read through a [`StaffStore`].
pub struct SalaryCalculator<S> {
  store:     Arc<S>,
  max_depth: usize,
}

impl<S> Clone for SalaryCalculator<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), max_depth: self.max_depth }
  }
}

impl<S> SalaryCalculator<S>
where
  S: StaffStore,
  Error: From<S::Error>,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, max_depth: MAX_HIERARCHY_DEPTH }
  }

  /// Limit how many levels below the queried member the calculation may
  /// descend before failing with [`Error::HierarchyTooDeep`].
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Salary of `staff_id` as of now.
  pub async fn calculate_salary(&self, staff_id: Uuid) -> Result<f64> {
    self.calculate_salary_as_of(staff_id, Utc::now()).await
  }

  /// Salary of `staff_id` with tenure counted in whole calendar years up to
  /// `as_of`.
  pub async fn calculate_salary_as_of(
    &self,
    staff_id: Uuid,
    as_of: DateTime<Utc>,
  ) -> Result<f64> {
    self.salary_at(staff_id, as_of.year(), 0).await
  }

  /// Salaries of all staff as of now.
  pub async fn salary_report(&self) -> Result<SalaryReport> {
    self.salary_report_as_of(Utc::now()).await
  }

  pub async fn salary_report_as_of(
    &self,
    as_of: DateTime<Utc>,
  ) -> Result<SalaryReport> {
    let staff = self.store.list_staff(None).await?;
    let year = as_of.year();

    let salaries =
      try_join_all(staff.iter().map(|record| self.salary_of(record, year, 0)))
        .await?;

    let mut report = SalaryReport::default();
    for (record, salary) in staff.into_iter().zip(salaries) {
      report.total += salary;
      report.staff.insert(record.name, salary);
    }
    Ok(report)
  }

  // ── Recursion ───────────────────────────────────────────────────────────

  async fn require(&self, staff_id: Uuid) -> Result<StaffRecord> {
    self
      .store
      .get_staff(staff_id)
      .await?
      .ok_or(Error::StaffNotFound(staff_id))
  }

  fn salary_at(
    &self,
    staff_id: Uuid,
    year: i32,
    depth: usize,
  ) -> BoxFuture<'_, Result<f64>> {
    async move {
      if depth > self.max_depth {
        return Err(Error::HierarchyTooDeep(self.max_depth));
      }
      let record = self.require(staff_id).await?;
      self.salary_of(&record, year, depth).await
    }
    .boxed()
  }

  async fn salary_of(
    &self,
    record: &StaffRecord,
    year: i32,
    depth: usize,
  ) -> Result<f64> {
    let rule = SalaryRule::for_role(record.role);
    let years_worked = year - record.join_date.year();

    let counted: Vec<(Uuid, usize)> = match record.role {
      Role::Employee => Vec::new(),
      Role::Manager => record
        .subordinates
        .iter()
        .map(|id| (*id, depth + 1))
        .collect(),
      Role::Sales => self.descendants(record, depth).await?,
    };

    let salaries = try_join_all(
      counted
        .into_iter()
        .map(|(id, level)| self.salary_at(id, year, level)),
    )
    .await?;

    Ok(rule.salary(record.base_salary, years_worked, salaries.iter().sum()))
  }

  /// Every transitive subordinate of `root` with the level it sits at,
  /// breadth-first.
  async fn descendants(
    &self,
    root: &StaffRecord,
    depth: usize,
  ) -> Result<Vec<(Uuid, usize)>> {
    let mut seen = HashSet::from([root.staff_id]);
    let mut found = Vec::new();
    let mut frontier = root.subordinates.clone();
    let mut level = depth;

    while !frontier.is_empty() {
      level += 1;
      if level > self.max_depth {
        return Err(Error::HierarchyTooDeep(self.max_depth));
      }
      for id in &frontier {
        if !seen.insert(*id) {
          return Err(Error::CycleDetected(*id));
        }
        found.push((*id, level));
      }

      let records =
        try_join_all(frontier.iter().map(|id| self.require(*id))).await?;
      frontier = records.into_iter().flat_map(|r| r.subordinates).collect();
    }

    Ok(found)
  }
}
