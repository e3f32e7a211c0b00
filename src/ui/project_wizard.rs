use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::costing::{Evaluation, RateTable};
use crate::error::Result as EvaluatorResult;
use crate::form::{submit, FormIntent, ProjectInput};
use crate::models::{ConsultantRate, Project};
use crate::ui::components::field::{format_amount, FieldKind, FieldList, TextField};
use crate::ui::components::{render_fields, render_help, render_message, render_title, Message};
use crate::ui::{navigation_for, Navigation, NAVIGATION_HELP};

const NAME: usize = 0;
const DURATION: usize = 1;
const SALES_PRICE: usize = 2;
const FIRST_ROLE: usize = 3;

pub enum ProjectWizardAction {
    Save(ProjectInput),
    Cancel,
    Navigate(Navigation),
}

/// New-project evaluation page, also used to edit a saved project.
pub struct ProjectWizardState {
    project_id: i32,
    roles: Vec<String>,
    rates: RateTable,
    form: FieldList,
    message: Option<Message>,
}

impl ProjectWizardState {
    pub fn new(rates: &[ConsultantRate]) -> Self {
        Self::from_input(ProjectInput::blank(rates), rates)
    }

    pub fn from_existing(project: &Project, rates: &[ConsultantRate]) -> Self {
        Self::from_input(ProjectInput::from_project(project, rates), rates)
    }

    fn from_input(input: ProjectInput, rates: &[ConsultantRate]) -> Self {
        let table = RateTable::from_rates(rates);

        // Current roles first in rate-table order, then roles that lost their rate.
        let mut roles: Vec<String> = rates
            .iter()
            .map(|rate| rate.role.clone())
            .filter(|role| input.assignment.contains(role))
            .collect();
        roles.extend(
            input
                .assignment
                .iter()
                .map(|(role, _)| role.to_string())
                .filter(|role| !table.contains(role)),
        );

        let mut fields = vec![
            TextField::new("Project Name", input.name.clone(), FieldKind::Text),
            TextField::new("Duration (days)", input.duration.to_string(), FieldKind::WholeNumber),
            TextField::new("Sales Price (€)", format_amount(input.sales_price), FieldKind::Amount),
        ];
        fields.extend(roles.iter().map(|role| {
            let label = if table.contains(role) {
                format!("Number of {}", role)
            } else {
                format!("Number of {} (no rate)", role)
            };
            TextField::new(label, input.assignment.get(role).to_string(), FieldKind::WholeNumber)
        }));

        Self {
            project_id: input.id,
            roles,
            rates: table,
            form: FieldList::new(fields),
            message: None,
        }
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Read the fields back into a form submission.
    pub fn input(&self) -> EvaluatorResult<ProjectInput> {
        let assignment = self
            .roles
            .iter()
            .enumerate()
            .map(|(i, role)| Ok((role.clone(), self.form.get(FIRST_ROLE + i).whole_number(Some(0))?)))
            .collect::<EvaluatorResult<_>>()?;

        Ok(ProjectInput {
            id: self.project_id,
            name: self.form.get(NAME).value.clone(),
            duration: self.form.get(DURATION).whole_number(None)?,
            sales_price: self.form.get(SALES_PRICE).amount()?,
            assignment,
        })
    }

    /// Live figures for the current fields, recalculated on every draw
    pub fn evaluation(&self) -> EvaluatorResult<Evaluation> {
        let outcome = submit(&self.input()?, &self.rates, FormIntent::Calculate)?;
        Ok(outcome.evaluation)
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    let page_title = if state.project_id == 0 {
        "New Project Evaluation".to_string()
    } else {
        format!("Edit Project (ID: {})", state.project_id)
    };
    render_title(f, chunks[0], &page_title, user);

    render_fields(
        f,
        chunks[1],
        "Project & Assign Consultants",
        &state.form.fields,
        state.form.current,
        state.form.editing,
    );
    render_results(f, chunks[2], state.evaluation());
    render_message(f, chunks[3], state.message.as_ref());

    let help_text = if state.form.editing {
        "Enter - Save field | Esc - Stop editing".to_string()
    } else if state.project_id == 0 {
        format!("Enter - Edit field | Up/Down - Navigate | S - Save project | {}", NAVIGATION_HELP)
    } else {
        "Enter - Edit field | Up/Down - Navigate | S - Update project | Esc - Back".to_string()
    };
    render_help(f, chunks[4], &help_text);
}

fn render_results<B: Backend>(f: &mut Frame<B>, area: Rect, evaluation: EvaluatorResult<Evaluation>) {
    let line = match evaluation {
        Ok(evaluation) => {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            Spans::from(vec![
                Span::styled(format!("Total Costs: €{:.2}", evaluation.total_cost), bold.fg(Color::Red)),
                Span::raw("   "),
                Span::styled(format!("Profit: €{:.2}", evaluation.profit), bold.fg(Color::Green)),
                Span::raw("   "),
                Span::styled(format!("Margin: {:.2}%", evaluation.margin_percent), bold.fg(Color::Blue)),
            ])
        }
        Err(err) => Spans::from(Span::styled(err.to_string(), Style::default().fg(Color::Gray))),
    };

    let results = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(results, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.form.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => state.form.toggle_editing(),
                code => state.form.edit_current_field(code),
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc if state.project_id != 0 => return Ok(Some(ProjectWizardAction::Cancel)),
            KeyCode::Enter => {
                state.message = None;
                state.form.toggle_editing();
            }
            KeyCode::Up => state.form.previous_field(),
            KeyCode::Down | KeyCode::Tab => state.form.next_field(),
            KeyCode::Char('s') => match state.input() {
                Ok(input) => return Ok(Some(ProjectWizardAction::Save(input))),
                Err(err) => state.set_message(Message::error(err)),
            },
            code => {
                // Leaving an edit of a saved project goes through Esc so changes are not lost by a stray key.
                if state.project_id == 0 {
                    if let Some(navigation) = navigation_for(code) {
                        return Ok(Some(ProjectWizardAction::Navigate(navigation)));
                    }
                }
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    #[test]
    fn new_form_has_field_per_role() {
        let state = ProjectWizardState::new(&ConsultantRate::defaults());

        assert_eq!(state.form.fields.len(), FIRST_ROLE + 4);
        let input = state.input().unwrap();
        assert_eq!(input.duration, 30);
        assert_eq!(input.sales_price, 10000.0);
        assert_eq!(state.evaluation().unwrap().total_cost, 0.0);
    }

    #[test]
    fn typed_headcount_flows_into_evaluation() {
        let mut state = ProjectWizardState::new(&ConsultantRate::defaults());
        state.form.fields[FIRST_ROLE].value = "2".to_string();

        let evaluation = state.evaluation().unwrap();
        assert!((evaluation.total_cost - 8363.636363).abs() < 1e-3);
    }

    #[test]
    fn editing_lists_roles_without_rate_last() {
        let project = Project {
            id: 4,
            name: "Legacy".to_string(),
            duration: 5,
            sales_price: 900.5,
            assignment: Assignment::new().with("Ghost Role", 3),
        };

        let state = ProjectWizardState::from_existing(&project, &ConsultantRate::defaults());

        assert_eq!(state.roles.last().map(String::as_str), Some("Ghost Role"));
        assert_eq!(state.form.get(SALES_PRICE).value, "900.5");
        assert_eq!(state.input().unwrap().assignment.get("Ghost Role"), 3);
    }

    #[test]
    fn empty_duration_is_reported() {
        let mut state = ProjectWizardState::new(&ConsultantRate::defaults());
        state.form.fields[DURATION].value.clear();

        assert!(state.input().is_err());
        assert!(state.evaluation().is_err());
    }
}
