use tracing::info;

use crate::auth::Session;
use crate::costing::{evaluate, Evaluation, RateTable};
use crate::db::Store;
use crate::error::Result;
use crate::export::ExportRow;
use crate::form::Mutation;
use crate::models::{ConsultantRate, Project};

/// A saved project together with its cost recomputed from the live rate table.
#[derive(Debug, Clone)]
pub struct EvaluatedProject {
    pub project: Project,
    pub evaluation: Evaluation,
}

impl EvaluatedProject {
    pub fn export_row(&self) -> ExportRow {
        ExportRow::new(&self.project, &self.evaluation)
    }
}

/// Store operations available to a logged-in user.
///
/// Costs of saved projects are always recomputed from the current rates; a
/// rate change therefore changes the figures shown for older projects.
pub struct Workspace<'a> {
    store: &'a dyn Store,
    session: &'a Session,
}

impl<'a> Workspace<'a> {
    pub fn new(store: &'a dyn Store, session: &'a Session) -> Self {
        Self { store, session }
    }

    pub fn user(&self) -> &str {
        self.session.username()
    }

    pub async fn list_rates(&self) -> Result<Vec<ConsultantRate>> {
        self.store.list_rates().await
    }

    pub async fn rate_table(&self) -> Result<RateTable> {
        Ok(RateTable::from_rates(&self.list_rates().await?))
    }

    pub async fn upsert_rate(&self, rate: &ConsultantRate) -> Result<()> {
        self.store.upsert_rate(rate).await?;
        info!(user = self.user(), role = %rate.role, "saved consultant rate");
        Ok(())
    }

    pub async fn delete_rate(&self, role: &str) -> Result<()> {
        self.store.delete_rate(role).await?;
        info!(user = self.user(), role, "deleted consultant rate");
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.store.list_projects().await
    }

    pub async fn get_project(&self, id: i32) -> Result<Project> {
        self.store.get_project(id).await
    }

    pub async fn evaluated_projects(&self) -> Result<Vec<EvaluatedProject>> {
        let rates = self.rate_table().await?;
        let projects = self.list_projects().await?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let evaluation =
                    evaluate(project.duration, project.sales_price, &project.assignment, &rates);
                EvaluatedProject { project, evaluation }
            })
            .collect())
    }

    /// Apply a mutation produced by the project form. Returns the project id.
    pub async fn apply(&self, mutation: &Mutation) -> Result<i32> {
        match mutation {
            Mutation::Create(project) => {
                let id = self.store.create_project(project).await?;
                info!(user = self.user(), id, name = %project.name, "created project");
                Ok(id)
            }
            Mutation::Update(project) => {
                self.store.update_project(project).await?;
                info!(user = self.user(), id = project.id, "updated project");
                Ok(project.id)
            }
        }
    }

    pub async fn delete_project(&self, id: i32) -> Result<()> {
        self.store.delete_project(id).await?;
        info!(user = self.user(), id, "deleted project");
        Ok(())
    }
}
