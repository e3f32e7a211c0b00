use crossterm::event::KeyCode;

use crate::error::{EvaluatorError, Result};

/// Which characters a text field accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    WholeNumber,
    Amount,
}

/// Editable text buffer behind one form field
#[derive(Clone, Debug)]
pub struct TextField {
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
    pub masked: bool,
}

impl TextField {
    pub fn new(label: impl Into<String>, value: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind,
            masked: false,
        }
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if self.accepts(c) => self.value.push(c),
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Text => true,
            FieldKind::WholeNumber => c.is_ascii_digit(),
            FieldKind::Amount => c.is_ascii_digit() || (c == '.' && !self.value.contains('.')),
        }
    }

    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Parse a whole number; an empty field counts as `empty_as`.
    pub fn whole_number(&self, empty_as: Option<i32>) -> Result<i32> {
        let value = self.value.trim();
        if value.is_empty() {
            if let Some(default) = empty_as {
                return Ok(default);
            }
        }
        value
            .parse()
            .map_err(|_| EvaluatorError::validation(format!("{} must be a whole number.", self.label)))
    }

    pub fn amount(&self) -> Result<f64> {
        let value = self.value.trim();
        if value.is_empty() {
            return Ok(0.0);
        }
        value
            .parse()
            .map_err(|_| EvaluatorError::validation(format!("{} must be a number.", self.label)))
    }
}

/// A list of fields with a cursor, shared by the wizards
#[derive(Clone, Debug)]
pub struct FieldList {
    pub fields: Vec<TextField>,
    pub current: usize,
    pub editing: bool,
}

impl FieldList {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            current: 0,
            editing: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.current) {
            field.handle_key(key);
        }
    }

    pub fn get(&self, index: usize) -> &TextField {
        &self.fields[index]
    }
}

pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_fields_reject_letters() {
        let mut field = TextField::new("Duration", "", FieldKind::WholeNumber);
        for key in ['3', 'x', '0', '.'] {
            field.handle_key(KeyCode::Char(key));
        }
        assert_eq!(field.value, "30");
        assert_eq!(field.whole_number(None).unwrap(), 30);
    }

    #[test]
    fn amount_accepts_one_decimal_point() {
        let mut field = TextField::new("Sales Price", "", FieldKind::Amount);
        for key in ['1', '.', '5', '.'] {
            field.handle_key(KeyCode::Char(key));
        }
        assert_eq!(field.amount().unwrap(), 1.5);
    }

    #[test]
    fn empty_fields_use_defaults() {
        let count = TextField::new("IT Consultant", "", FieldKind::WholeNumber);
        assert_eq!(count.whole_number(Some(0)).unwrap(), 0);
        assert!(count.whole_number(None).is_err());
        assert_eq!(TextField::new("Fixed Cost", "", FieldKind::Amount).amount().unwrap(), 0.0);
    }

    #[test]
    fn masked_fields_hide_value() {
        let mut field = TextField::new("Password", "", FieldKind::Text).masked();
        field.handle_key(KeyCode::Char('a'));
        field.handle_key(KeyCode::Char('b'));
        assert_eq!(field.display(), "**");
    }

    #[test]
    fn cursor_wraps_around() {
        let mut list = FieldList::new(vec![
            TextField::new("Role", "", FieldKind::Text),
            TextField::new("Annual Salary", "", FieldKind::Amount),
        ]);

        list.previous_field();
        assert_eq!(list.current, 1);
        list.next_field();
        assert_eq!(list.current, 0);

        list.edit_current_field(KeyCode::Char('a'));
        assert_eq!(list.get(0).value, "");
        list.toggle_editing();
        list.edit_current_field(KeyCode::Char('a'));
        assert_eq!(list.get(0).value, "a");
    }

    #[test]
    fn amounts_print_without_trailing_zeros() {
        assert_eq!(format_amount(27000.0), "27000");
        assert_eq!(format_amount(99.5), "99.5");
    }
}
