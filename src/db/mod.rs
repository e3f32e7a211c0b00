mod memory;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{EvaluatorError, Result};
use crate::models::{Assignment, ConsultantRate, Project};

pub use memory::MemoryStore;

/// Persistence contract for the rate table and saved projects.
///
/// There is no locking and no multi-statement transaction: concurrent writers
/// to the same row are last-write-wins.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_rates(&self) -> Result<Vec<ConsultantRate>>;

    /// Insert `rate`, or overwrite salary and fixed cost if the role already exists.
    async fn upsert_rate(&self, rate: &ConsultantRate) -> Result<()>;

    /// Insert `rate` only if its role is unseen. Returns whether a row was written.
    async fn insert_rate_if_absent(&self, rate: &ConsultantRate) -> Result<bool>;

    /// Remove the rate for `role`. Absent roles are a no-op.
    async fn delete_rate(&self, role: &str) -> Result<()>;

    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn get_project(&self, id: i32) -> Result<Project>;

    /// Store a new project and return its generated id. `project.id` is ignored.
    async fn create_project(&self, project: &Project) -> Result<i32>;

    /// Replace every field of the project with id `project.id`.
    async fn update_project(&self, project: &Project) -> Result<()>;

    /// Remove the project. Absent ids are a no-op.
    async fn delete_project(&self, id: i32) -> Result<()>;

    /// Seed the four default rates into an empty rate table.
    ///
    /// Rows are inserted by role only if absent, so running this again never
    /// duplicates or resets anything. Returns the number of rows inserted.
    async fn seed_default_rates(&self) -> Result<usize> {
        if !self.list_rates().await?.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for rate in ConsultantRate::defaults() {
            if self.insert_rate_if_absent(&rate).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

pub(crate) fn validate_rate(rate: &ConsultantRate) -> Result<()> {
    if rate.role.trim().is_empty() {
        return Err(EvaluatorError::validation("Please enter a role name."));
    }
    if !rate.annual_salary.is_finite() || rate.annual_salary < 0.0 {
        return Err(EvaluatorError::validation("Annual salary must be zero or more."));
    }
    if !rate.fixed_cost.is_finite() || rate.fixed_cost < 0.0 {
        return Err(EvaluatorError::validation("Fixed cost must be zero or more."));
    }
    Ok(())
}

pub(crate) fn validate_project(project: &Project) -> Result<()> {
    if project.duration < 1 {
        return Err(EvaluatorError::validation("Duration must be at least 1 day."));
    }
    if !project.sales_price.is_finite() || project.sales_price < 0.0 {
        return Err(EvaluatorError::validation("Sales price must be zero or more."));
    }
    Ok(())
}

fn encode_assignment(project: &Project) -> Result<String> {
    project
        .assignment
        .to_json()
        .map_err(|source| EvaluatorError::CorruptAssignment { id: project.id, source })
}

/// Row shape of the `projects` table; the assignment is an opaque JSON blob.
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    name: String,
    duration: i32,
    sales_price: f64,
    consultants_json: String,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project> {
        let assignment = Assignment::from_json(&self.consultants_json)
            .map_err(|source| EvaluatorError::CorruptAssignment { id: self.id, source })?;

        Ok(Project {
            id: self.id,
            name: self.name,
            duration: self.duration,
            sales_price: self.sales_price,
            assignment,
        })
    }
}

const SELECT_RATES: &str = r#"
    SELECT
        role,
        COALESCE(annual_salary::float8, 0.0) AS annual_salary,
        COALESCE(fixed_cost::float8, 0.0) AS fixed_cost
    FROM consultants
"#;

const SELECT_PROJECTS: &str = r#"
    SELECT
        id,
        COALESCE(name, '') AS name,
        COALESCE(duration, 0) AS duration,
        COALESCE(sales_price::float8, 0.0) AS sales_price,
        COALESCE(consultants_json, '{}') AS consultants_json
    FROM projects
"#;

/// PostgreSQL-backed store
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> AnyResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url()?)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for Database {
    async fn list_rates(&self) -> Result<Vec<ConsultantRate>> {
        let rates = sqlx::query_as::<_, ConsultantRate>(SELECT_RATES)
            .fetch_all(self.get_pool())
            .await?;

        Ok(rates)
    }

    async fn upsert_rate(&self, rate: &ConsultantRate) -> Result<()> {
        validate_rate(rate)?;

        sqlx::query(
            r#"
            INSERT INTO consultants (role, annual_salary, fixed_cost)
            VALUES ($1, $2, $3)
            ON CONFLICT (role) DO UPDATE SET
                annual_salary = EXCLUDED.annual_salary,
                fixed_cost = EXCLUDED.fixed_cost
            "#,
        )
        .bind(&rate.role)
        .bind(rate.annual_salary)
        .bind(rate.fixed_cost)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn insert_rate_if_absent(&self, rate: &ConsultantRate) -> Result<bool> {
        validate_rate(rate)?;

        let result = sqlx::query(
            r#"
            INSERT INTO consultants (role, annual_salary, fixed_cost)
            VALUES ($1, $2, $3)
            ON CONFLICT (role) DO NOTHING
            "#,
        )
        .bind(&rate.role)
        .bind(rate.annual_salary)
        .bind(rate.fixed_cost)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_rate(&self, role: &str) -> Result<()> {
        sqlx::query("DELETE FROM consultants WHERE role = $1")
            .bind(role)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let sql = format!("{SELECT_PROJECTS} ORDER BY id ASC");
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .fetch_all(self.get_pool())
            .await?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    async fn get_project(&self, id: i32) -> Result<Project> {
        let sql = format!("{SELECT_PROJECTS} WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        row.ok_or(EvaluatorError::NotFound(id))?.into_project()
    }

    async fn create_project(&self, project: &Project) -> Result<i32> {
        validate_project(project)?;
        let consultants_json = encode_assignment(project)?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO projects (name, duration, sales_price, consultants_json)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(project.duration)
        .bind(project.sales_price)
        .bind(consultants_json)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        validate_project(project)?;
        let consultants_json = encode_assignment(project)?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $1, duration = $2, sales_price = $3, consultants_json = $4
            WHERE id = $5
            "#,
        )
        .bind(&project.name)
        .bind(project.duration)
        .bind(project.sales_price)
        .bind(consultants_json)
        .bind(project.id)
        .execute(self.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(EvaluatorError::NotFound(project.id));
        }

        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}

/// Connect to PostgreSQL, create missing tables and seed the default rates.
pub async fn init(config: &Config) -> AnyResult<Database> {
    let db = Database::new(config).await?;

    sqlx::migrate!().run(db.get_pool()).await?;
    debug!("migrations applied");

    let seeded = db.seed_default_rates().await?;
    if seeded > 0 {
        info!(seeded, "seeded default consultant rates");
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, consultants_json: &str) -> ProjectRow {
        ProjectRow {
            id,
            name: "Rollout".to_string(),
            duration: 12,
            sales_price: 15000.0,
            consultants_json: consultants_json.to_string(),
        }
    }

    #[test]
    fn stored_assignment_is_decoded() {
        let project = row(3, r#"{"IT Consultant": 2}"#).into_project().unwrap();

        assert_eq!(project.id, 3);
        assert_eq!(project.duration, 12);
        assert_eq!(project.assignment.get("IT Consultant"), 2);
    }

    #[test]
    fn unreadable_assignment_reports_the_project() {
        let result = row(7, "not json").into_project();

        match result {
            Err(err @ EvaluatorError::CorruptAssignment { id: 7, .. }) => {
                assert!(err.to_string().contains("project 7"));
            }
            other => panic!("expected a corrupt assignment error, got {other:?}"),
        }
    }
}
