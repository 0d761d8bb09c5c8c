use thiserror::Error;

use crate::api::validation::ValidationErrors;
use crate::query::{MappingError, SortError};

#[derive(Error, Debug)]
pub enum RoutineError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("Field mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RoutineError {
    pub fn company_not_found(id: impl std::fmt::Display) -> Self {
        RoutineError::NotFound(format!("Company {id}"))
    }

    pub fn employee_not_found(id: impl std::fmt::Display) -> Self {
        RoutineError::NotFound(format!("Employee {id}"))
    }
}

pub type Result<T> = std::result::Result<T, RoutineError>;
