use super::Assignment;

/// A saved project scenario. An `id` of 0 marks a project that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub duration: i32,
    pub sales_price: f64,
    pub assignment: Assignment,
}

impl Project {
    pub fn new(name: impl Into<String>, duration: i32, sales_price: f64, assignment: Assignment) -> Self {
        Self {
            id: 0,
            name: name.into(),
            duration,
            sales_price,
            assignment,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }
}
