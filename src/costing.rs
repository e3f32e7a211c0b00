use std::collections::HashMap;

use crate::models::{Assignment, ConsultantRate};

/// Standard working days per year used to turn an annual salary into a daily rate.
pub const WORKING_DAYS_PER_YEAR: f64 = 220.0;

/// Snapshot of the rate table keyed by role, taken at calculation time.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, ConsultantRate>,
}

impl RateTable {
    pub fn from_rates(rates: &[ConsultantRate]) -> Self {
        Self {
            rates: rates
                .iter()
                .map(|rate| (rate.role.clone(), rate.clone()))
                .collect(),
        }
    }

    pub fn get(&self, role: &str) -> Option<&ConsultantRate> {
        self.rates.get(role)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.rates.contains_key(role)
    }
}

/// Total cost of staffing a project for `duration` days.
///
/// Entries with a headcount of zero or less are never charged. A role missing
/// from `rates` contributes nothing and raises no error, so totals for saved
/// projects stay stable when a role is deleted from the rate table.
pub fn compute_cost(duration: i32, assignment: &Assignment, rates: &RateTable) -> f64 {
    let duration = f64::from(duration);

    assignment
        .staffed()
        .filter_map(|(role, count)| rates.get(role).map(|rate| (rate, f64::from(count))))
        .map(|(rate, count)| {
            let daily_rate = rate.annual_salary / WORKING_DAYS_PER_YEAR;
            daily_rate * duration * count + rate.fixed_cost * count
        })
        .sum()
}

/// Cost, profit and margin for one project scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub total_cost: f64,
    pub profit: f64,
    pub margin_percent: f64,
}

impl Evaluation {
    pub fn from_cost(sales_price: f64, total_cost: f64) -> Self {
        let profit = sales_price - total_cost;
        // A zero price reports a zero margin rather than dividing by zero.
        let margin_percent = if sales_price > 0.0 {
            profit / sales_price * 100.0
        } else {
            0.0
        };

        Self {
            total_cost,
            profit,
            margin_percent,
        }
    }
}

pub fn evaluate(duration: i32, sales_price: f64, assignment: &Assignment, rates: &RateTable) -> Evaluation {
    Evaluation::from_cost(sales_price, compute_cost(duration, assignment, rates))
}
