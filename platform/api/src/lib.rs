use std::{collections::BTreeMap, sync::Arc};

use async_graphql::{Error, ErrorExtensions, Value};
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Field name → messages, in the shape clients render next to form inputs.
pub type FieldMessages = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("validation failed")]
    Validation(FieldMessages),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::Validation(fields) = self {
            let fields = fields
                .iter()
                .map(|(field, messages)| {
                    let messages = messages.iter().cloned().map(Value::from).collect();
                    (async_graphql::Name::new(field), Value::List(messages))
                })
                .collect();
            err = err.extend_with(|_err, e| {
                e.set("fields", Value::Object(fields));
            });
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
