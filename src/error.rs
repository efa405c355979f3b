//! Error types for input validation

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid input: {field} must be at least {minimum}, got {value}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        minimum: f64,
    },

    #[error("invalid input: {field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

impl SimulationError {
    /// Name of the offending input field (camelCase, as in scenario files)
    pub fn field(&self) -> &'static str {
        match self {
            SimulationError::BelowMinimum { field, .. } => field,
            SimulationError::NotFinite { field, .. } => field,
        }
    }
}
