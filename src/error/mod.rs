//! The unified error handling system for the application.

use std::fmt::Display;

pub use types::AppError;

/// A unified `Result` type for the entire application.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, AppError>;

pub mod macros;
pub mod types;

/// Context trait for adding context to errors.
pub trait Context<T, E> {
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display;

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let context_message = context().to_string();
                Err(AppError::Context {
                    context: context_message,
                    source: Box::new(error.into()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_database_error() {
        let db_err: std::result::Result<(), AppError> =
            Err(AppError::database("connection refused"));
        let wrapped = db_err.context("Failed to fetch order");
        let message = wrapped.unwrap_err().to_string();
        assert!(message.contains("Failed to fetch order"));
    }

    #[test]
    fn validation_error_carries_field() {
        let err = AppError::validation("quantity must be positive", Some("quantity".into()));
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("quantity must be positive"));
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = AppError::invalid_transition("Pending", "Shipped");
        let message = err.to_string();
        assert!(message.contains("Pending"));
        assert!(message.contains("Shipped"));
    }
}
