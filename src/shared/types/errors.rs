use std::path::PathBuf;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// Unique, foreign-key or NOT NULL violation reported by the store
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Connection could not be acquired or was lost
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried. Nothing retries today.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Unavailable(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DomainError::Constraint(_))
    }
}

impl From<DbErr> for DomainError {
    fn from(err: DbErr) -> Self {
        if matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) {
            return DomainError::Unavailable(err.to_string());
        }

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Constraint(msg),
            _ if is_not_null_violation(&err) => DomainError::Constraint(err.to_string()),
            _ => DomainError::Storage(err.to_string()),
        }
    }
}

// sqlx does not classify NOT NULL failures, so match on the driver text:
// SQLite, MySQL and Postgres respectively.
fn is_not_null_violation(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("not null constraint failed")
        || msg.contains("cannot be null")
        || msg.contains("violates not-null constraint")
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: invalid {field} value {value:?}")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Domain(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn connection_errors_are_transient() {
        let err: DomainError = DbErr::Conn(RuntimeErr::Internal("socket closed".into())).into();
        assert!(err.is_transient());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn not_null_failures_are_constraint_violations() {
        let err: DomainError = DbErr::Exec(RuntimeErr::Internal(
            "NOT NULL constraint failed: cars.engine_type".into(),
        ))
        .into();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn other_errors_stay_storage_errors() {
        let err: DomainError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn invalid_number_names_line_and_field() {
        let err = InfraError::InvalidNumber {
            line: 4,
            field: "year",
            value: "20x1".into(),
        };
        assert_eq!(err.to_string(), "Line 4: invalid year value \"20x1\"");
    }
}
