use sea_orm::DbErr;
use thiserror::Error;

use crate::{
    messages::{Messages, Rule},
    model::UniqueField,
    validation::FieldErrors,
};

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("storage failure: {0}")]
    System(#[from] DbErr),
}

impl HrError {
    /// Lift a store failure into the service taxonomy. A unique violation
    /// caught by the index becomes the same field error the pre-check emits.
    pub(crate) fn from_store(err: StoreError, messages: &Messages) -> Self {
        match err {
            StoreError::NotFound(id) => HrError::NotFound(id),
            StoreError::UniqueViolation(field) => {
                let field = field.field();
                HrError::Validation(FieldErrors::single(
                    field,
                    messages.message(field, Rule::Unique),
                ))
            }
            StoreError::Database(err) => HrError::System(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("unique constraint violated on {}", .0.field().as_str())]
    UniqueViolation(UniqueField),
    #[error(transparent)]
    Database(#[from] DbErr),
}
