// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

/// Single place the envelope's code becomes an HTTP status.
#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::ValidationFailed | ApiErrorCode::InvalidQueryParameter => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::Conflict | ApiErrorCode::IllegalTransition => 409,
        ApiErrorCode::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operational_errors_keep_their_status() {
        assert_eq!(map_error(&ApiError::missing_fields(&["cargo"])), 400);
        assert_eq!(map_error(&ApiError::invalid_param("limit", "zero")), 400);
        assert_eq!(map_error(&ApiError::not_found("Order")), 404);
        assert_eq!(
            map_error(&ApiError::conflict("order has shipments", serde_json::json!({}))),
            409
        );
        assert_eq!(map_error(&ApiError::internal()), 500);
    }
}
