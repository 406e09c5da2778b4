//! HTTP mapping of service failures.
//!
//! Handlers return `Result<HttpResponse, ServiceError>`; this impl turns the
//! error side into a JSON body with a stable `error` code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::services::ServiceError;

impl ServiceError {
    /// Stable machine-readable code sent as the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::TypeConstraint(_) => "type_constraint",
            ServiceError::NotFound => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Computation(_) => "computation_error",
            ServiceError::Unavailable => "unavailable",
            ServiceError::DataAccess(_) => "data_access_error",
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::Computation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::Validation(errors) => json!({
                "error": self.code(),
                "message": "payload failed validation",
                "fields": errors,
            }),
            ServiceError::DataAccess(err) => {
                log::error!("Data access failure: {err}");
                json!({
                    "error": self.code(),
                    "message": "internal error",
                })
            }
            other => json!({
                "error": other.code(),
                "message": other.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::validation::{ValidationErrorKind, ValidationErrors};

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                ServiceError::Validation(ValidationErrors::new()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::TypeConstraint("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::DataAccess(RepositoryError::DatabaseError("io".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error:?}");
        }
    }

    #[actix_web::test]
    async fn validation_body_lists_fields() {
        let error = ServiceError::Validation(ValidationErrors::single(
            "valorTotal",
            ValidationErrorKind::BelowMinimum { min: 0.0 },
        ));
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["fields"][0]["field"], "valorTotal");
        assert_eq!(json["fields"][0]["kind"], "below_minimum");
        assert_eq!(json["fields"][0]["min"], 0.0);
    }

    #[actix_web::test]
    async fn store_details_are_not_leaked() {
        let error = ServiceError::DataAccess(RepositoryError::DatabaseError(
            "disk I/O error at /var/db".into(),
        ));
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("/var/db"));
    }
}
