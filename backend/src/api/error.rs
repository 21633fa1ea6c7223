//! # Endpoint Errors
//!
//! Every talk operation runs inside [`boundary`], which turns the
//! operation's `Result` into the HTTP response:
//!
//! | Error | Status | Code |
//! |-------|--------|------|
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `BadRequest` | 400 | `BAD_REQUEST` |
//! | `Database` / `Link` | 500 | `INTERNAL_ERROR` |
//!
//! Faults are logged with their cause; the client only sees the fixed
//! message of the operation that failed.

use std::future::Future;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use thiserror::Error;
use tracing::{error, warn};

use super::links::LinkError;
use crate::db::DatabaseError;
use crate::mapper::MappingError;
use crate::models::ApiResponse;

/// The five talk operations, for logging and fault messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalkOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl TalkOperation {
    /// Message returned to the client when the operation faults.
    pub fn failure_message(self) -> &'static str {
        match self {
            TalkOperation::List | TalkOperation::Get => "Failed to get Talks",
            TalkOperation::Create => "Failed to create Talk",
            TalkOperation::Update => "Failed to update Talk",
            TalkOperation::Delete => "Failed to delete Talk",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TalkOperation::List => "list_talks",
            TalkOperation::Get => "get_talk",
            TalkOperation::Create => "create_talk",
            TalkOperation::Update => "update_talk",
            TalkOperation::Delete => "delete_talk",
        }
    }
}

/// Why a talk operation did not succeed.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The requested talk does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A precondition failed or the commit was rejected.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

impl EndpointError {
    pub fn not_found(message: impl Into<String>) -> Self {
        EndpointError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        EndpointError::BadRequest(message.into())
    }
}

impl From<MappingError> for EndpointError {
    fn from(e: MappingError) -> Self {
        EndpointError::BadRequest(e.to_string())
    }
}

/// Build an enveloped error response.
pub fn error_response(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()>::error(code, message))
}

/// Run one talk operation and convert its outcome into a response.
pub async fn boundary<F>(operation: TalkOperation, work: F) -> HttpResponse
where
    F: Future<Output = Result<HttpResponse, EndpointError>>,
{
    match work.await {
        Ok(response) => response,
        Err(EndpointError::NotFound(message)) => {
            warn!("{}: {}", operation.name(), message);
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", &message)
        }
        Err(EndpointError::BadRequest(message)) => {
            warn!("{}: {}", operation.name(), message);
            error_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", &message)
        }
        Err(fault) => {
            error!("{} failed: {}", operation.name(), fault);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                operation.failure_message(),
            )
        }
    }
}

/// Malformed JSON bodies become enveloped 400s instead of plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    let response = error_response(StatusCode::BAD_REQUEST, "INVALID_BODY", &err.to_string());
    actix_web::error::InternalError::from_response(err, response).into()
}
