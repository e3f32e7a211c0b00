pub mod field;

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use field::TextField;

/// Result of the last action, shown until the next one
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Info(String),
    Error(String),
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Message::Info(text.into())
    }

    pub fn error(text: impl ToString) -> Self {
        Message::Error(text.to_string())
    }
}

pub fn render_message<B: Backend>(frame: &mut Frame<B>, area: Rect, message: Option<&Message>) {
    let line = match message {
        Some(Message::Info(text)) => Span::styled(text.as_str(), Style::default().fg(Color::Green)),
        Some(Message::Error(text)) => Span::styled(
            text.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };

    frame.render_widget(
        Paragraph::new(Spans::from(line)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

pub fn render_help<B: Backend>(frame: &mut Frame<B>, area: Rect, text: &str) {
    let help = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, area);
}

pub fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, question: &str) {
    let popup_area = centered_rect(50, 20, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(question.to_string()),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Header block shared by every page after login
pub fn render_title<B: Backend>(frame: &mut Frame<B>, area: Rect, page_title: &str, user: &str) {
    let title = Paragraph::new(Spans::from(vec![
        Span::styled(
            "Consulting Project Evaluator",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  |  {}", page_title)),
        Span::styled(format!("  ({})", user), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

/// Form body: one line per field, the current one highlighted and showing a cursor while edited
pub fn render_fields<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    title: &str,
    fields: &[TextField],
    current: usize,
    editing: bool,
) {
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let content = if i == current && editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{}|", field.display()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if i == current {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label), style),
                    Span::raw(field.display()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(form_list, area);
}
