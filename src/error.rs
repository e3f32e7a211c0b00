use thiserror::Error;

/// Errors raised by the rate table, the project store and the project form.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// Invalid input to a mutating operation. Nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("project {0} does not exist")]
    NotFound(i32),

    /// The database could not be reached or rejected the statement.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("project {id} has an unreadable consultant assignment: {source}")]
    CorruptAssignment {
        id: i32,
        #[source]
        source: serde_json::Error,
    },
}

impl EvaluatorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EvaluatorError>;
