use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    /// Query by id matched no row.
    NotFound(&'static str),
    /// Input failed write-time validation (malformed email/URL, short password).
    Validation(String),
    /// Insert violated a foreign-key or uniqueness constraint.
    ConstraintViolation(&'static str),
    /// Login with an unknown email or a wrong password.
    BadCredentials(&'static str),
    /// A query traversed an association the schema never declared.
    QueryConstruction(&'static str),
    ServerError,
    /// Any other persistence failure.
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    message: String,
}

impl RequestErrorJson {
    pub fn new(message: &str) -> RequestErrorJson {
        RequestErrorJson {
            message: message.to_string(),
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(e) = &value {
            let message = e.message();
            if message.contains("FOREIGN KEY constraint failed") {
                return Self::ConstraintViolation("Referenced row does not exist");
            }
            if message.contains("UNIQUE constraint failed") {
                return Self::ConstraintViolation("Value already exists");
            }
        }
        Self::DatabaseError(value)
    }
}

impl From<validator::ValidationErrors> for RequestError {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let (status_code, json) = match self {
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJson::new(message))
            }
            RequestError::Validation(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::ConstraintViolation(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::BadCredentials(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::QueryConstruction(message) => {
                tracing::error!("query construction error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJson::new("Internal Server Error"),
                )
            }
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJson::new("Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJson::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}
