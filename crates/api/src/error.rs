use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Reader not found")]
    ReaderNotFound,

    #[error("Reader is inactive")]
    ReaderInactive,

    #[error("Reader location not configured")]
    ReaderNotConfigured,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed")]
    Validation {
        details: serde_json::Value,
    },

    #[error("Failed to record log")]
    RecordFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire shape of error responses: `{"error": "...", "details": {...}?}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            ApiError::ReaderNotFound => {
                (StatusCode::NOT_FOUND, "Reader not found".to_string(), None)
            }
            ApiError::ReaderInactive => {
                (StatusCode::FORBIDDEN, "Reader is inactive".to_string(), None)
            }
            ApiError::ReaderNotConfigured => (
                StatusCode::BAD_REQUEST,
                "Reader location not configured".to_string(),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Validation { details } => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(details),
            ),
            ApiError::RecordFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record log".to_string(),
                None,
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation {
            details: validation_details(&errors),
        }
    }
}

/// Flattens validator errors into `{"field": ["message", ...]}`, the shape
/// reader firmware and the dashboard both expect.
fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut details = serde_json::Map::new();
    collect_details(errors, "", &mut details);
    serde_json::Value::Object(details)
}

fn collect_details(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut serde_json::Map<String, serde_json::Value>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<serde_json::Value> = field_errors
                    .iter()
                    .map(|e| {
                        serde_json::Value::String(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Invalid value for {path}")),
                        )
                    })
                    .collect();
                out.insert(path, serde_json::Value::Array(messages));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_details(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_details(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[test]
    fn test_unauthorized_status() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_reader_not_found_status() {
        let response = ApiError::ReaderNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_reader_inactive_status() {
        let response = ApiError::ReaderInactive.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_reader_not_configured_status() {
        let response = ApiError::ReaderNotConfigured.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_record_failed_status() {
        let response = ApiError::RecordFailed.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_status() {
        let error = ApiError::Validation {
            details: serde_json::json!({"rssi": ["bad"]}),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", ApiError::ReaderNotFound), "Reader not found");
        assert_eq!(format!("{}", ApiError::ReaderInactive), "Reader is inactive");
        assert_eq!(format!("{}", ApiError::RecordFailed), "Failed to record log");
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Name must not be empty"))]
        name: String,
    }

    #[test]
    fn test_validation_details_shape() {
        let errors = Probe {
            name: String::new(),
        }
        .validate()
        .unwrap_err();
        let error: ApiError = errors.into();
        match error {
            ApiError::Validation { details } => {
                assert_eq!(details["name"][0], "Name must not be empty");
            }
            _ => panic!("Expected Validation error"),
        }
    }
}
