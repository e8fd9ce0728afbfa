// ABOUTME: Protocol-layer error type for the management API.
// ABOUTME: Distinguishes transient failures from permanent rejections and protocol bugs.

use super::transport::TransportError;

/// Failures surfaced by the protocol client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An HTTP response the protocol does not model. Usually a service
    /// hiccup; safe to re-issue the same request.
    #[error("unexpected response: HTTP {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// The service rejected the submitted payload outright. Re-sending the
    /// same payload cannot succeed.
    #[error("service rejected the payload for operation {operation}: {body}")]
    BadRequest { operation: String, body: String },

    /// A response that should carry a status token did not.
    #[error("no <Status> token in response from {uri}: {body}")]
    MissingStatus { uri: String, body: String },

    /// A status token outside the fixed vocabulary.
    #[error("unrecognized status token '{token}' from {uri}")]
    UnknownStatus { token: String, uri: String },

    /// Connection-level failure below the protocol.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    /// Whether re-issuing the same request may reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::UnexpectedResponse { .. } | ApiError::Transport(_)
        )
    }
}
