use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::logic::{FieldErrors, ServiceError};

/// Errors a handler can answer with. Each variant maps to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the requested resource could not be found")]
    NotFound,
    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(Method),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("validation failed")]
    FailedValidation(FieldErrors),
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
    #[error("the server encountered a problem and could not process your request")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(FieldErrors),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: ErrorDetail::Message(message.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            ApiError::FailedValidation(fields) => ErrorResponse {
                error: ErrorDetail::Fields(fields),
            },
            ApiError::Internal(cause) => {
                // Details stay in the log, the client only gets the generic message.
                log::error!("Internal error: {:#}", cause);
                ErrorResponse::new(&message)
            }
            _ => ErrorResponse::new(&message),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::ValidationFailed(fields) => ApiError::FailedValidation(fields),
            ServiceError::Conflict(_) => ApiError::EditConflict,
            ServiceError::Internal(cause) => ApiError::Internal(cause),
        }
    }
}
