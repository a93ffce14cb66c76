//! The salary rule table.
//!
//! One [`SalaryRule`] per [`Role`]. The table is a `match`, so every role has
//! exactly one rule and lookup cannot fail.

use serde::Serialize;

use crate::staff::Role;

/// Bonus parameters for a role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryRule {
  /// Fraction of base salary granted per whole year worked.
  pub bonus_rate:             f64,
  /// Upper bound on the accumulated tenure fraction.
  pub max_bonus_percent:      f64,
  /// Fraction of the summed subordinate salaries added on top.
  pub subordinate_bonus_rate: f64,
}

pub const EMPLOYEE_RULE: SalaryRule = SalaryRule {
  bonus_rate:             0.03,
  max_bonus_percent:      0.30,
  subordinate_bonus_rate: 0.0,
};

pub const MANAGER_RULE: SalaryRule = SalaryRule {
  bonus_rate:             0.05,
  max_bonus_percent:      0.40,
  subordinate_bonus_rate: 0.005,
};

pub const SALES_RULE: SalaryRule = SalaryRule {
  bonus_rate:             0.01,
  max_bonus_percent:      0.35,
  subordinate_bonus_rate: 0.003,
};

impl SalaryRule {
  pub const fn for_role(role: Role) -> Self {
    match role {
      Role::Employee => EMPLOYEE_RULE,
      Role::Manager => MANAGER_RULE,
      Role::Sales => SALES_RULE,
    }
  }

  /// Tenure bonus as a fraction of base salary. Grows linearly per year and
  /// is capped at `max_bonus_percent`; negative tenure counts as zero.
  pub fn tenure_percent(&self, years_worked: i32) -> f64 {
    let years = f64::from(years_worked.max(0));
    (self.bonus_rate * years).min(self.max_bonus_percent)
  }

  /// `base + base * tenure + subordinate_bonus_rate * subordinate_total`.
  pub fn salary(
    &self,
    base_salary: f64,
    years_worked: i32,
    subordinate_total: f64,
  ) -> f64 {
    base_salary
      + base_salary * self.tenure_percent(years_worked)
      + self.subordinate_bonus_rate * subordinate_total
  }
}
