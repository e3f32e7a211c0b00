use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::error::Result as EvaluatorResult;
use crate::models::ConsultantRate;
use crate::ui::components::field::{format_amount, FieldKind, FieldList, TextField};
use crate::ui::components::{render_fields, render_help, render_message, render_title, Message};

const ROLE: usize = 0;
const ANNUAL_SALARY: usize = 1;
const FIXED_COST: usize = 2;

pub enum RateWizardAction {
    Cancel,
    Save(ConsultantRate),
}

/// Add or edit one role. Saving an existing role name overwrites its rates.
pub struct RateWizardState {
    form: FieldList,
    editing_existing: bool,
    message: Option<Message>,
}

impl RateWizardState {
    pub fn new() -> Self {
        Self {
            form: FieldList::new(vec![
                TextField::new("Role Name", "", FieldKind::Text),
                TextField::new("Annual Salary (€)", "0", FieldKind::Amount),
                TextField::new("Fixed Cost (€)", "0", FieldKind::Amount),
            ]),
            editing_existing: false,
            message: None,
        }
    }

    pub fn from_existing(rate: &ConsultantRate) -> Self {
        let mut state = Self::new();
        state.form.fields[ROLE].value = rate.role.clone();
        state.form.fields[ANNUAL_SALARY].value = format_amount(rate.annual_salary);
        state.form.fields[FIXED_COST].value = format_amount(rate.fixed_cost);
        state.editing_existing = true;
        state
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    pub fn rate(&self) -> EvaluatorResult<ConsultantRate> {
        Ok(ConsultantRate::new(
            self.form.get(ROLE).value.trim(),
            self.form.get(ANNUAL_SALARY).amount()?,
            self.form.get(FIXED_COST).amount()?,
        ))
    }
}

pub fn render_rate_wizard<B: Backend>(f: &mut Frame<B>, state: &mut RateWizardState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(2),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = if state.editing_existing {
        "Edit Role"
    } else {
        "Add Role"
    };
    render_title(f, chunks[0], title, user);
    render_fields(f, chunks[1], "Add or Edit Role", &state.form.fields, state.form.current, state.form.editing);
    render_message(f, chunks[2], state.message.as_ref());

    let help_text = if state.form.editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Add/Update | Esc - Cancel"
    };
    render_help(f, chunks[3], help_text);
}

pub fn handle_input(state: &mut RateWizardState) -> Result<Option<RateWizardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.form.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => state.form.toggle_editing(),
                code => state.form.edit_current_field(code),
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(RateWizardAction::Cancel)),
            KeyCode::Enter => {
                state.message = None;
                state.form.toggle_editing();
            }
            KeyCode::Up => state.form.previous_field(),
            KeyCode::Down | KeyCode::Tab => state.form.next_field(),
            KeyCode::Char('s') => match state.rate() {
                Ok(rate) => return Ok(Some(RateWizardAction::Save(rate))),
                Err(err) => state.set_message(Message::error(err)),
            },
            _ => {}
        }
    }

    Ok(None)
}
