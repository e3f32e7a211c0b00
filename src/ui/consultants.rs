use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::models::ConsultantRate;
use crate::ui::components::field::format_amount;
use crate::ui::components::{
    render_delete_confirmation, render_help, render_message, render_title, Message,
};
use crate::ui::{navigation_for, Navigation, NAVIGATION_HELP};

// Represents the state of the rate table screen
pub struct ConsultantsState {
    rates: Vec<ConsultantRate>,
    table_state: TableState,
    show_delete_confirmation: bool,
    message: Option<Message>,
}

impl ConsultantsState {
    pub fn new(rates: Vec<ConsultantRate>) -> Self {
        let mut table_state = TableState::default();
        if !rates.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            rates,
            table_state,
            show_delete_confirmation: false,
            message: None,
        }
    }

    pub fn next(&mut self) {
        if self.rates.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.rates.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rates.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => self.rates.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_rate(&self) -> Option<&ConsultantRate> {
        self.table_state.selected().and_then(|i| self.rates.get(i))
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }
}

pub enum ConsultantAction {
    NewRate,
    EditRate(ConsultantRate),
    DeleteRate(String),
    Navigate(Navigation),
}

pub fn render_consultants<B: Backend>(frame: &mut Frame<B>, state: &mut ConsultantsState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_title(frame, chunks[0], "Manage Consultants", user);

    let header_cells = ["#", "Role", "Annual Salary (€)", "Fixed Cost (€)"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::White).bg(Color::Blue)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.rates.iter().enumerate().map(|(i, rate)| {
        let style = if i % 2 == 1 {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(rate.role.as_str()),
            Cell::from(format_amount(rate.annual_salary)),
            Cell::from(format_amount(rate.fixed_cost)),
        ])
        .style(style)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Consultant Rates").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(6),
            Constraint::Percentage(44),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ]);
    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    render_message(frame, chunks[2], state.message.as_ref());

    let buttons_text = if state.selected_rate().is_some() {
        format!("<N> Add Role | <E> Edit Role | <D> Delete Role | {}", NAVIGATION_HELP)
    } else {
        format!("No consultants yet. <N> Add Role | {}", NAVIGATION_HELP)
    };
    render_help(frame, chunks[3], &buttons_text);

    if state.show_delete_confirmation {
        let question = match state.selected_rate() {
            Some(rate) => format!("Delete the role \"{}\"?", rate.role),
            None => "Delete this role?".to_string(),
        };
        render_delete_confirmation(frame, &question);
    }
}

pub fn handle_input(state: &mut ConsultantsState) -> Result<Option<ConsultantAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    state.show_delete_confirmation = false;
                    if let Some(rate) = state.selected_rate() {
                        return Ok(Some(ConsultantAction::DeleteRate(rate.role.clone())));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            KeyCode::Char('n') => return Ok(Some(ConsultantAction::NewRate)),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(rate) = state.selected_rate() {
                    return Ok(Some(ConsultantAction::EditRate(rate.clone())));
                }
            }
            KeyCode::Char('d') => {
                if state.selected_rate().is_some() {
                    state.show_delete_confirmation = true;
                }
            }
            code => {
                if let Some(navigation) = navigation_for(code) {
                    return Ok(Some(ConsultantAction::Navigate(navigation)));
                }
            }
        }
    }
    Ok(None)
}
