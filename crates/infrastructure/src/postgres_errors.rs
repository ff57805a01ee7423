//! SQLSTATE helpers shared by the PostgreSQL adapters.

use eleads_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Returns the violated constraint name when `error` is a unique violation.
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<String> {
    violation(error, UNIQUE_VIOLATION)
}

/// Returns the violated constraint name when `error` is a foreign key violation.
pub(crate) fn foreign_key_violation(error: &sqlx::Error) -> Option<String> {
    violation(error, FOREIGN_KEY_VIOLATION)
}

/// Wraps an unexpected database error.
pub(crate) fn internal(operation: &str, error: sqlx::Error) -> AppError {
    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn violation(error: &sqlx::Error, code: &str) -> Option<String> {
    if let sqlx::Error::Database(database_error) = error
        && database_error.code().as_deref() == Some(code)
    {
        return Some(database_error.constraint().unwrap_or_default().to_owned());
    }

    None
}
