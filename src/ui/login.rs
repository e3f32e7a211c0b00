use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::field::{FieldKind, FieldList, TextField};
use crate::ui::components::{centered_rect, render_fields, render_help, render_message, Message};

const USERNAME: usize = 0;
const PASSWORD: usize = 1;

pub enum LoginAction {
    Submit { username: String, password: String },
    Quit,
}

pub struct LoginState {
    form: FieldList,
    message: Option<Message>,
}

impl LoginState {
    pub fn new() -> Self {
        let mut form = FieldList::new(vec![
            TextField::new("Username", "", FieldKind::Text),
            TextField::new("Password", "", FieldKind::Text).masked(),
        ]);
        form.editing = true;

        Self { form, message: None }
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    /// Clear the password after a failed attempt, keep the username
    pub fn reset_password(&mut self) {
        self.form.fields[PASSWORD].value.clear();
        self.form.current = PASSWORD;
    }

    fn submission(&self) -> LoginAction {
        LoginAction::Submit {
            username: self.form.get(USERNAME).value.clone(),
            password: self.form.get(PASSWORD).value.clone(),
        }
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let area = centered_rect(60, 60, frame.size());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(2),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new("Consulting Project Evaluator: Login")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_fields(frame, chunks[1], "Credentials", &state.form.fields, state.form.current, true);
    render_message(frame, chunks[2], state.message.as_ref());
    render_help(frame, chunks[3], "Tab/Up/Down - Switch field | Enter - Login | Esc - Quit");
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => return Ok(Some(LoginAction::Quit)),
            KeyCode::Tab | KeyCode::Down => state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => state.form.previous_field(),
            KeyCode::Enter => {
                if state.form.current == USERNAME {
                    state.form.next_field();
                } else {
                    return Ok(Some(state.submission()));
                }
            }
            code => state.form.edit_current_field(code),
        }
    }

    Ok(None)
}
