use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("Employee with id {0} not found")]
    NotFound(i64),
    #[error("An employee with email {0} already exists")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl HrError {
    /// Classify a failed write. A unique violation can only come from the
    /// email index, so it is reported the same way as the service-level check.
    pub(crate) fn from_write(err: DbErr, email: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(email.to_owned()),
            _ => Self::Database(err),
        }
    }
}
