use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::export::ExportFormat;
use crate::ui::components::{
    render_delete_confirmation, render_help, render_message, render_title, Message,
};
use crate::ui::{navigation_for, Navigation, NAVIGATION_HELP};
use crate::workspace::EvaluatedProject;

// Represents the state of the saved projects screen
pub struct ProjectsState {
    projects: Vec<EvaluatedProject>,
    list_state: ListState,
    show_delete_confirmation: bool,
    message: Option<Message>,
}

impl ProjectsState {
    pub fn new(projects: Vec<EvaluatedProject>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
            message: None,
        }
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.projects.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.projects.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_project(&self) -> Option<&EvaluatedProject> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i32> {
        self.selected_project().map(|p| p.project.id)
    }

    pub fn projects(&self) -> &[EvaluatedProject] {
        &self.projects
    }

    pub fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }
}

pub enum ProjectAction {
    EditProject(i32),
    DeleteProject(i32),
    ExportSelected(i32, ExportFormat),
    ExportAll(ExportFormat),
    Navigate(Navigation),
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState, user: &str) {
    let size = frame.size();
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
        .split(size);

    render_title(frame, chunks[0], "Saved Projects", user);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|evaluated| {
            ListItem::new(Spans::from(format!(
                "Project: {} (ID: {})",
                evaluated.project.name, evaluated.project.id
            )))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(projects_list, body[0], &mut state.list_state);

    render_details(frame, body[1], state.selected_project());
    render_message(frame, chunks[2], state.message.as_ref());

    let buttons_text = if state.selected_project().is_some() {
        format!(
            "<E> Edit | <D> Delete | <X>/<P> Export to Excel/PDF | <Shift+X>/<Shift+P> Export all | {}",
            NAVIGATION_HELP
        )
    } else {
        format!("No saved projects yet. | {}", NAVIGATION_HELP)
    };
    render_help(frame, chunks[3], &buttons_text);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, "Are you sure you want to delete this project?");
    }
}

fn render_details<B: Backend>(frame: &mut Frame<B>, area: Rect, selected: Option<&EvaluatedProject>) {
    let mut lines = Vec::new();

    if let Some(EvaluatedProject { project, evaluation }) = selected {
        lines.push(Spans::from(format!("Duration: {} days", project.duration)));
        lines.push(Spans::from(format!("Sales Price: €{:.2}", project.sales_price)));
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
            format!("Total Costs: €{:.2}", evaluation.total_cost),
            Style::default().fg(Color::Red),
        )));
        lines.push(Spans::from(Span::styled(
            format!("Profit: €{:.2}", evaluation.profit),
            Style::default().fg(Color::Green),
        )));
        lines.push(Spans::from(Span::styled(
            format!("Margin: {:.2}%", evaluation.margin_percent),
            Style::default().fg(Color::Blue),
        )));
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
            "Assigned Consultants",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (role, count) in project.assignment.staffed() {
            lines.push(Spans::from(format!("{}: {}", role, count)));
        }
    }

    let details = Paragraph::new(lines)
        .block(Block::default().title("Details").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, area);
}

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    state.toggle_delete_confirmation();
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(ProjectAction::DeleteProject(id)));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
                _ => {}
            }
            return Ok(None);
        }

        let selected = state.selected_project_id();
        match key.code {
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = selected {
                    return Ok(Some(ProjectAction::EditProject(id)));
                }
            }
            KeyCode::Char('d') => {
                if selected.is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = selected {
                    return Ok(Some(ProjectAction::ExportSelected(id, ExportFormat::Spreadsheet)));
                }
            }
            KeyCode::Char('p') => {
                if let Some(id) = selected {
                    return Ok(Some(ProjectAction::ExportSelected(id, ExportFormat::Document)));
                }
            }
            KeyCode::Char('X') if !state.projects.is_empty() => {
                return Ok(Some(ProjectAction::ExportAll(ExportFormat::Spreadsheet)));
            }
            KeyCode::Char('P') if !state.projects.is_empty() => {
                return Ok(Some(ProjectAction::ExportAll(ExportFormat::Document)));
            }
            code => {
                if let Some(navigation) = navigation_for(code) {
                    return Ok(Some(ProjectAction::Navigate(navigation)));
                }
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::Evaluation;
    use crate::models::{Assignment, Project};

    fn evaluated(id: i32) -> EvaluatedProject {
        EvaluatedProject {
            project: Project {
                id,
                name: format!("Project {id}"),
                duration: 10,
                sales_price: 1000.0,
                assignment: Assignment::new(),
            },
            evaluation: Evaluation::from_cost(1000.0, 0.0),
        }
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut state = ProjectsState::new(vec![evaluated(1), evaluated(2), evaluated(5)]);
        assert_eq!(state.selected_project_id(), Some(1));

        state.previous();
        assert_eq!(state.selected_project_id(), Some(5));
        state.next();
        assert_eq!(state.selected_project_id(), Some(1));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut state = ProjectsState::new(Vec::new());
        state.next();
        state.previous();
        assert!(state.selected_project().is_none());
    }
}
