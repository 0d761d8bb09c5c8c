use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use routine_core::{RoutineError, api::ValidationErrors};
use serde_json::json;
use std::fmt;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

const PROBLEM_JSON: &str = "application/problem+json";
const UNPROCESSABLE_TYPE: &str = "https://tools.ietf.org/html/rfc4918#section-11.2";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field messages; rendered as a problem document when present.
    pub validation: Option<ValidationErrors>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            validation: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "One or more validation errors occurred.".to_string(),
            validation: Some(errors),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(errors) = self.validation {
            let body = Json(json!({
                "type": UNPROCESSABLE_TYPE,
                "title": self.message,
                "status": self.status.as_u16(),
                "detail": "See the errors field for details.",
                "errors": errors,
            }));
            let mut response = (self.status, body).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_JSON),
            );
            return response;
        }

        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<RoutineError> for AppError {
    fn from(err: RoutineError) -> Self {
        match err {
            RoutineError::NotFound(_) => Self::not_found(err.to_string()),
            RoutineError::Sort(sort) => Self::bad_request(sort.to_string()),
            RoutineError::InvalidInput(msg) => Self::bad_request(msg),
            RoutineError::Validation(errors) => Self::unprocessable(errors),
            RoutineError::Conflict(msg) => Self::conflict(msg),
            RoutineError::Mapping(mapping) => {
                error!(error = %mapping, "sort mapping misconfigured");
                Self::internal("Sort mapping is not configured")
            }
            RoutineError::Database(db) => {
                error!(error = ?db, "database operation failed");
                Self::internal("Database operation failed")
            }
            RoutineError::Migration(migration) => {
                error!(error = %migration, "database migration failed");
                Self::internal("Database operation failed")
            }
            RoutineError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// Body decoding failures. Type mismatches become a 422 problem keyed on
/// `body`; syntax and content-type failures keep the rejection's status.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let mut errors = ValidationErrors::new();
                errors.add("body", err.body_text());
                Self::unprocessable(errors)
            }
            other => Self::new(other.status(), other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routine_core::api::CompanyDto;
    use routine_core::query::{MappingError, ShapePair, SortError};
    use routine_model::Company;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (
                RoutineError::NotFound("Company x".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                RoutineError::Sort(SortError::UnknownField {
                    field: "salary".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                RoutineError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                RoutineError::Conflict("taken".into()),
                StatusCode::CONFLICT,
            ),
            (
                RoutineError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RoutineError::Mapping(MappingError::NotFound {
                    pair: ShapePair::of::<CompanyDto, Company>(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn unknown_sort_field_message_names_the_field() {
        let err = AppError::from(RoutineError::Sort(SortError::UnknownField {
            field: "salary".into(),
        }));
        assert!(err.message.contains("salary"));
    }

    #[test]
    fn validation_errors_render_as_problem_json() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "The Name field is required.");
        let response = AppError::from(RoutineError::Validation(errors)).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );
    }

    #[test]
    fn missing_mapping_hides_details_behind_json_500() {
        let err = AppError::from(RoutineError::Mapping(MappingError::NotFound {
            pair: ShapePair::of::<CompanyDto, Company>(),
        }));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("CompanyDto"));

        let response = err.into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
