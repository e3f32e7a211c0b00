/// Rates seeded into an empty rate table: (role, annual salary, fixed cost).
pub const DEFAULT_RATES: [(&str, f64, f64); 4] = [
    ("Strategy Consultant", 27000.0, 500.0),
    ("Senior Strategy Consultant", 40000.0, 1000.0),
    ("IT Consultant", 24000.0, 500.0),
    ("Senior IT Consultant", 37000.0, 1000.0),
];

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ConsultantRate {
    pub role: String,
    pub annual_salary: f64,
    /// Charged once per assigned consultant, independent of duration.
    pub fixed_cost: f64,
}

impl ConsultantRate {
    pub fn new(role: impl Into<String>, annual_salary: f64, fixed_cost: f64) -> Self {
        Self {
            role: role.into(),
            annual_salary,
            fixed_cost,
        }
    }

    pub fn defaults() -> Vec<ConsultantRate> {
        DEFAULT_RATES
            .iter()
            .map(|(role, salary, fixed)| ConsultantRate::new(*role, *salary, *fixed))
            .collect()
    }
}
