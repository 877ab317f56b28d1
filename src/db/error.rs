use std::fmt::Display;

use sea_orm::DbErr;
use uuid::Uuid;

/// Failure kinds at the store boundary. The HTTP layer picks a status per kind.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo item not found (id={id})")]
    NotFound { id: Uuid },
    #[error("invalid paging state")]
    InvalidPagingState,
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn backend(err: impl Display) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        Self::backend(err)
    }
}
