//! Error kinds raised while arbitrating an authorization request.
//!
//! Denial is not an error: a denied request is expressed through the
//! decision's resolution and rendered as an `access_denied` redirect.

use std::error::Error;
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use super::types::HttpResponse;

/// Boxed error produced by a storage collaborator.
pub type StorageError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// A caller read state that was never set, e.g. a custom response
    /// before checking `has_custom_response`.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// The protocol layer accepted a client the client manager no longer knows.
    #[error("no client found for the given identifier \"{identifier}\"")]
    ClientNotFound { identifier: String },

    /// The request was approved but no decider attached a resource owner.
    #[error("an approved authorization request requires a resource owner")]
    MissingResourceOwner,

    /// Failure inside a collaborator (client store, consent store).
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),

    #[error("invalid authorization configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl AuthorizeError {
    /// Wraps a collaborator failure.
    pub fn storage(err: impl Into<StorageError>) -> Self {
        AuthorizeError::Storage(err.into())
    }

    /// Convert this error into a JSON HTTP response with the proper status.
    ///
    /// Every variant is a server-side fault; none is the user agent's doing.
    pub fn into_response(&self) -> HttpResponse {
        let (status, code, description) = match self {
            AuthorizeError::PreconditionViolation(_) => (500, "server_error", "Internal server error"),
            AuthorizeError::ClientNotFound { .. } => (500, "server_error", "Client record is unavailable"),
            AuthorizeError::MissingResourceOwner => (500, "server_error", "Internal server error"),
            AuthorizeError::Storage(_) => (503, "temporarily_unavailable", "Storage is temporarily unavailable"),
            AuthorizeError::Config(_) => (500, "server_error", "Internal server error"),
        };
        warn!(error = %self, error_code = code, http_status = status, "authorization request failed");
        HttpResponse::json(status, &json!({ "error": code, "error_description": description }))
    }
}
