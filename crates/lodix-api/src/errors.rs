// SPDX-License-Identifier: Apache-2.0

use lodix_model::{TransitionError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidQueryParameter,
    NotFound,
    Conflict,
    IllegalTransition,
    Internal,
}

/// The one error shape every endpoint returns, wrapped as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message, json!({}))
    }

    #[must_use]
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "Missing required fields",
            json!({ "missingFields": fields }),
        )
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({ "parameter": name, "value": value }),
        )
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({}),
        )
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::new(ApiErrorCode::Conflict, message, details)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorCode::Internal, "Internal Server Error", json!({}))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation_failed(err.0)
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        Self::new(
            ApiErrorCode::IllegalTransition,
            err.to_string(),
            json!({ "from": err.from, "to": err.to }),
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
