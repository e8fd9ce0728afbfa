// ABOUTME: Low-level protocol client for the management endpoint.
// ABOUTME: Maps deployment verbs onto HTTP requests and interprets responses.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::types::{DeploymentPayload, OperationRef, SlotRef};

use super::error::ApiError;
use super::status::{OperationStatus, SlotStatus};
use super::transport::{HttpResponse, Transport};

/// Marker the service embeds in a failed operation body when the submitted
/// payload itself was rejected. Retrying the same payload cannot succeed.
const BAD_REQUEST_MARKER: &str = "<HttpStatusCode>400</HttpStatusCode><Error><Code>BadRequest</Code>";

fn status_token(body: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new("<Status>(.*?)</Status>").expect("status pattern is a compile-time constant")
    });
    pattern
        .captures(body)
        .map(|captures| captures.get(1).unwrap().as_str())
}

/// The deployment verbs the management endpoint understands.
///
/// Implemented by [`ManagementClient`]; the retry-wrapped API is generic over
/// this trait so tests can script responses without a transport.
#[async_trait]
pub trait ManagementOps: Send + Sync {
    /// Current status of the slot's deployment.
    ///
    /// Transport failures and unmodeled HTTP statuses settle as
    /// [`SlotStatus::Failed`] rather than erroring, so pollers treat a broken
    /// check as one more observation. An unrecognized status token is a
    /// protocol bug and errs.
    async fn check_deployment_status(&self, slot: &SlotRef) -> Result<SlotStatus, ApiError>;

    /// Ask the service to suspend the slot's deployment.
    async fn begin_suspend(&self, slot: &SlotRef) -> Result<Option<OperationRef>, ApiError>;

    /// Ask the service to delete the slot's deployment.
    async fn begin_delete(&self, slot: &SlotRef) -> Result<Option<OperationRef>, ApiError>;

    /// Ask the service to create a deployment in the slot.
    async fn begin_create(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError>;

    /// Ask the service to upgrade the slot's deployment in place.
    async fn begin_upgrade(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError>;

    /// Status of an accepted asynchronous operation.
    async fn check_operation_status(&self, op: &OperationRef)
    -> Result<OperationStatus, ApiError>;
}

/// Stateless translator between deployment operations and the wire format.
///
/// The only component that reads HTTP status codes or response bodies. Every
/// `begin_*` call returns `Ok(Some(op))` when the service accepted the
/// operation (202), `Ok(None)` when another operation already holds the slot
/// (409), and errs otherwise.
pub struct ManagementClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ManagementClient<T> {
    pub fn new(transport: T) -> Self {
        ManagementClient { transport }
    }

    /// Interprets a `begin_*` response: 202 yields the operation reference
    /// from the request-id header, 409 yields nothing to wait for.
    fn accepted_operation(
        &self,
        slot: &SlotRef,
        response: HttpResponse,
    ) -> Result<Option<OperationRef>, ApiError> {
        match response.status {
            202 => match response.request_id {
                Some(request_id) => Ok(Some(slot.operation(request_id))),
                // Accepted but no request id to poll; surface the malformed
                // response and let the caller re-issue the begin.
                None => Err(ApiError::UnexpectedResponse {
                    status: response.status,
                    body: "202 Accepted without a request id header".to_string(),
                }),
            },
            409 => {
                tracing::debug!(slot = %slot, "conflict: another operation holds the slot");
                Ok(None)
            }
            status => Err(ApiError::UnexpectedResponse {
                status,
                body: response.body,
            }),
        }
    }
}

#[async_trait]
impl<T: Transport> ManagementOps for ManagementClient<T> {
    async fn check_deployment_status(&self, slot: &SlotRef) -> Result<SlotStatus, ApiError> {
        let uri = slot.uri();
        let response = match self.transport.get(&uri).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, slot = %slot, "deployment status check failed");
                return Ok(SlotStatus::Failed);
            }
        };

        match response.status {
            404 => Ok(SlotStatus::NotFound),
            200 => {
                let token = status_token(&response.body).ok_or_else(|| ApiError::MissingStatus {
                    uri: uri.clone(),
                    body: response.body.clone(),
                })?;
                tracing::debug!(slot = %slot, token, "deployment status");
                match token {
                    "Running" => Ok(SlotStatus::Running),
                    "Suspending" => Ok(SlotStatus::Suspending),
                    "Starting" => Ok(SlotStatus::Starting),
                    "Suspended" => Ok(SlotStatus::Suspended),
                    // The service reports Deleting on a deployment that is
                    // already suspended and on its way out.
                    "Deleting" => Ok(SlotStatus::Suspended),
                    "Deploying" => Ok(SlotStatus::Deploying),
                    "RunningTransitioning" => Ok(SlotStatus::RunningTransitioning),
                    other => Err(ApiError::UnknownStatus {
                        token: other.to_string(),
                        uri,
                    }),
                }
            }
            status => {
                tracing::warn!(slot = %slot, status, "unexpected status-check response");
                Ok(SlotStatus::Failed)
            }
        }
    }

    async fn begin_suspend(&self, slot: &SlotRef) -> Result<Option<OperationRef>, ApiError> {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<UpdateDeploymentStatus xmlns="http://schemas.microsoft.com/windowsazure">
    <Status>Suspended</Status>
</UpdateDeploymentStatus>"#;
        let uri = format!("{}/?comp=status", slot.uri());
        let response = self.transport.post(&uri, body).await?;
        self.accepted_operation(slot, response)
    }

    async fn begin_delete(&self, slot: &SlotRef) -> Result<Option<OperationRef>, ApiError> {
        let response = self.transport.delete(&slot.uri()).await?;
        self.accepted_operation(slot, response)
    }

    async fn begin_create(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError> {
        let response = self
            .transport
            .post(&slot.uri(), &payload.create_request_body())
            .await?;
        self.accepted_operation(slot, response)
    }

    async fn begin_upgrade(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError> {
        let uri = format!("{}/?comp=upgrade", slot.uri());
        let response = self
            .transport
            .post(&uri, &payload.upgrade_request_body())
            .await?;
        self.accepted_operation(slot, response)
    }

    async fn check_operation_status(
        &self,
        op: &OperationRef,
    ) -> Result<OperationStatus, ApiError> {
        let uri = op.uri();
        let response = self.transport.get(&uri).await?;
        if response.status != 200 {
            return Err(ApiError::UnexpectedResponse {
                status: response.status,
                body: response.body,
            });
        }

        let token = status_token(&response.body).ok_or_else(|| ApiError::MissingStatus {
            uri: uri.clone(),
            body: response.body.clone(),
        })?;
        match token {
            "InProgress" => Ok(OperationStatus::InProgress),
            "Succeeded" => Ok(OperationStatus::Succeeded),
            "Failed" => {
                tracing::error!(operation = %op, body = %response.body, "operation failed");
                if response.body.contains(BAD_REQUEST_MARKER) {
                    return Err(ApiError::BadRequest {
                        operation: op.to_string(),
                        body: response.body,
                    });
                }
                Ok(OperationStatus::Failed)
            }
            other => Err(ApiError::UnknownStatus {
                token: other.to_string(),
                uri,
            }),
        }
    }
}
