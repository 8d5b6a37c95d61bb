use super::APIResponse;
use crate::patch::PatchError;
use crate::repositories::RepositoryError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{http::StatusCode, response::IntoResponse};
use tracing::{error, warn};
use validator::ValidationErrors;

/// Failure of a request, rendered as a failed `APIResponse`
///
/// Every handler returns `Result<_, AppError>`, so no failure leaves the
/// service without an envelope.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    messages: Vec<String>,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            messages: vec![message.into()],
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    // Common error constructors
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Uniqueness violation detected before writing
    pub fn duplicate_key(name: &'static str, message: &str) -> Self {
        Self::bad_request(format!("{name}: {message}"))
    }

    /// Referenced parent entity missing
    pub fn foreign_key(message: &str) -> Self {
        Self::bad_request(format!("ForeignKey: {message}"))
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::not_found("Resource not found"),

            RepositoryError::Persistence(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed,
            ) => Self::service_unavailable("Database unavailable"),

            RepositoryError::Persistence(err) => {
                Self::internal_server_error("Internal server error").with_details(err.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let mut fields: Vec<_> = err.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();

        Self {
            status: StatusCode::BAD_REQUEST,
            messages,
            details: None,
        }
    }
}

impl From<PatchError> for AppError {
    fn from(err: PatchError) -> Self {
        Self::bad_request(format!("MalformedPatch: {err}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_details(err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        Self::new(err.status(), "Invalid resource id").with_details(err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            error!(status = %self.status, details = ?self.details, "Request failed: {:?}", self.messages);
        } else {
            warn!(status = %self.status, details = ?self.details, "Request rejected: {:?}", self.messages);
        }

        let mut messages = self.messages;
        messages.extend(self.details);
        APIResponse::<()>::failure(self.status, messages).into_response()
    }
}
