use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{validate_project, validate_rate, Store};
use crate::error::{EvaluatorError, Result};
use crate::models::{ConsultantRate, Project};

#[derive(Default)]
struct Tables {
    rates: Vec<ConsultantRate>,
    projects: Vec<Project>,
    last_id: i32,
}

/// In-process store with the same contract as the PostgreSQL one.
///
/// Rates and projects are kept in insertion order. Ids are never reused
/// after a delete, matching a `SERIAL` column.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_rates(&self) -> Result<Vec<ConsultantRate>> {
        Ok(self.tables.lock().await.rates.clone())
    }

    async fn upsert_rate(&self, rate: &ConsultantRate) -> Result<()> {
        validate_rate(rate)?;

        let mut tables = self.tables.lock().await;
        match tables.rates.iter_mut().find(|existing| existing.role == rate.role) {
            Some(existing) => {
                existing.annual_salary = rate.annual_salary;
                existing.fixed_cost = rate.fixed_cost;
            }
            None => tables.rates.push(rate.clone()),
        }

        Ok(())
    }

    async fn insert_rate_if_absent(&self, rate: &ConsultantRate) -> Result<bool> {
        validate_rate(rate)?;

        let mut tables = self.tables.lock().await;
        if tables.rates.iter().any(|existing| existing.role == rate.role) {
            return Ok(false);
        }
        tables.rates.push(rate.clone());

        Ok(true)
    }

    async fn delete_rate(&self, role: &str) -> Result<()> {
        self.tables.lock().await.rates.retain(|rate| rate.role != role);
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.tables.lock().await.projects.clone())
    }

    async fn get_project(&self, id: i32) -> Result<Project> {
        self.tables
            .lock()
            .await
            .projects
            .iter()
            .find(|project| project.id == id)
            .cloned()
            .ok_or(EvaluatorError::NotFound(id))
    }

    async fn create_project(&self, project: &Project) -> Result<i32> {
        validate_project(project)?;

        let mut tables = self.tables.lock().await;
        tables.last_id += 1;
        let id = tables.last_id;
        tables.projects.push(Project {
            id,
            ..project.clone()
        });

        Ok(id)
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        validate_project(project)?;

        let mut tables = self.tables.lock().await;
        let existing = tables
            .projects
            .iter_mut()
            .find(|existing| existing.id == project.id)
            .ok_or(EvaluatorError::NotFound(project.id))?;
        *existing = project.clone();

        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<()> {
        self.tables.lock().await.projects.retain(|project| project.id != id);
        Ok(())
    }
}
