//! APIResponse - Envelope shared by every endpoint

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

/// Uniform wrapper returned by the API
///
/// `error_messages` is empty whenever `is_successful` is true; build values
/// through `success` and `failure` to keep it that way.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct APIResponse<T> {
    pub status_code: u16,
    pub is_successful: bool,
    pub error_messages: Vec<String>,
    pub result: Option<T>,
}

impl<T> APIResponse<T> {
    pub fn success(status: StatusCode, result: T) -> Self {
        Self {
            status_code: status.as_u16(),
            is_successful: true,
            error_messages: Vec::new(),
            result: Some(result),
        }
    }

    pub fn ok(result: T) -> Self {
        Self::success(StatusCode::OK, result)
    }

    pub fn created(result: T) -> Self {
        Self::success(StatusCode::CREATED, result)
    }

    pub fn failure(status: StatusCode, error_messages: Vec<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            is_successful: false,
            error_messages,
            result: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for APIResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}
