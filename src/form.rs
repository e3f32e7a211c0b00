//! Project form handling as a pure function of the rate snapshot and the
//! submitted input. The caller decides whether to apply the returned mutation.

use crate::costing::{evaluate, Evaluation, RateTable};
use crate::error::{EvaluatorError, Result};
use crate::models::{Assignment, ConsultantRate, Project};

/// What the user submitted. `id` is 0 for a project that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub id: i32,
    pub name: String,
    pub duration: i32,
    pub sales_price: f64,
    pub assignment: Assignment,
}

impl ProjectInput {
    /// Blank form with one zero headcount per current role, and the defaults
    /// of 30 days at 10 000.
    pub fn blank(rates: &[ConsultantRate]) -> Self {
        Self {
            id: 0,
            name: String::new(),
            duration: 30,
            sales_price: 10000.0,
            assignment: rates.iter().map(|rate| (rate.role.clone(), 0)).collect(),
        }
    }

    /// Form for editing `project`.
    ///
    /// Every current role gets a field. Roles the project references that no
    /// longer have a rate are kept too, so an update does not drop them.
    pub fn from_project(project: &Project, rates: &[ConsultantRate]) -> Self {
        let mut assignment = project.assignment.clone();
        for rate in rates {
            if !assignment.contains(&rate.role) {
                assignment.set(rate.role.clone(), 0);
            }
        }

        Self {
            id: project.id,
            name: project.name.clone(),
            duration: project.duration,
            sales_price: project.sales_price,
            assignment,
        }
    }

    pub fn to_project(&self) -> Project {
        Project {
            id: self.id,
            name: self.name.trim().to_string(),
            duration: self.duration,
            sales_price: self.sales_price,
            assignment: self.assignment.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIntent {
    Calculate,
    Save,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(Project),
    Update(Project),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormOutcome {
    pub evaluation: Evaluation,
    pub mutation: Option<Mutation>,
}

pub fn submit(input: &ProjectInput, rates: &RateTable, intent: FormIntent) -> Result<FormOutcome> {
    let evaluation = evaluate(input.duration, input.sales_price, &input.assignment, rates);

    let mutation = match intent {
        FormIntent::Calculate => None,
        FormIntent::Save => {
            if input.name.trim().is_empty() {
                return Err(EvaluatorError::validation("Please enter a project name to save."));
            }
            let project = input.to_project();
            Some(if project.is_saved() {
                Mutation::Update(project)
            } else {
                Mutation::Create(project)
            })
        }
    };

    Ok(FormOutcome { evaluation, mutation })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> Vec<ConsultantRate> {
        ConsultantRate::defaults()
    }

    #[test]
    fn blank_form_lists_every_role() {
        let input = ProjectInput::blank(&rates());

        assert_eq!(input.duration, 30);
        assert_eq!(input.sales_price, 10000.0);
        assert_eq!(input.assignment.iter().count(), 4);
        assert_eq!(input.assignment.staffed().count(), 0);
    }

    #[test]
    fn calculate_never_mutates() {
        let mut input = ProjectInput::blank(&rates());
        input.assignment.set("Strategy Consultant", 2);

        let outcome = submit(&input, &RateTable::from_rates(&rates()), FormIntent::Calculate).unwrap();

        assert!(outcome.mutation.is_none());
        assert!((outcome.evaluation.total_cost - 8363.636363).abs() < 1e-3);
    }

    #[test]
    fn save_requires_a_name() {
        let input = ProjectInput::blank(&rates());

        let result = submit(&input, &RateTable::from_rates(&rates()), FormIntent::Save);
        assert!(matches!(result, Err(EvaluatorError::Validation(_))));
    }

    #[test]
    fn save_creates_new_and_updates_existing() {
        let table = RateTable::from_rates(&rates());
        let mut input = ProjectInput::blank(&rates());
        input.name = "  Data platform ".to_string();

        let created = submit(&input, &table, FormIntent::Save).unwrap();
        match created.mutation {
            Some(Mutation::Create(project)) => assert_eq!(project.name, "Data platform"),
            other => panic!("expected create, got {other:?}"),
        }

        input.id = 7;
        let updated = submit(&input, &table, FormIntent::Save).unwrap();
        assert!(matches!(updated.mutation, Some(Mutation::Update(ref project)) if project.id == 7));
    }

    #[test]
    fn editing_keeps_roles_without_rates() {
        let project = Project {
            id: 3,
            name: "Legacy".to_string(),
            duration: 10,
            sales_price: 5000.0,
            assignment: Assignment::new().with("Ghost Role", 2).with("IT Consultant", 1),
        };

        let input = ProjectInput::from_project(&project, &rates());

        assert_eq!(input.assignment.get("Ghost Role"), 2);
        assert_eq!(input.assignment.get("IT Consultant"), 1);
        assert!(input.assignment.contains("Senior IT Consultant"));
        assert_eq!(input.to_project().assignment.staffed().count(), 2);
    }
}
