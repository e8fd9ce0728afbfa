// ABOUTME: Value type identifying an in-flight asynchronous operation.
// ABOUTME: Created from the request id a begin call returns; polled until terminal.

use std::fmt;

use super::slot::MANAGEMENT_ENDPOINT;

/// Identifies an accepted asynchronous operation: subscription plus the
/// opaque request id returned in the `x-ms-request-id` response header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationRef {
    subscription_id: String,
    request_id: String,
}

impl OperationRef {
    pub fn new(subscription_id: impl Into<String>, request_id: impl Into<String>) -> Self {
        OperationRef {
            subscription_id: subscription_id.into(),
            request_id: request_id.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Canonical status URI for this operation.
    pub fn uri(&self) -> String {
        format!(
            "{}/{}/operations/{}",
            MANAGEMENT_ENDPOINT, self.subscription_id, self.request_id
        )
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}
