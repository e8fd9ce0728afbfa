// ABOUTME: Retry-wrapped management API hiding the asynchronous remote protocol.
// ABOUTME: Each call returns only once the remote operation reaches a terminal outcome.

use async_trait::async_trait;

use crate::retry::{Retrier, RetryError, Verdict};
use crate::types::{DeploymentPayload, OperationRef, SlotRef};

use super::error::ApiError;
use super::protocol::ManagementOps;
use super::status::{OperationStatus, SlotStatus};

/// How a reliable-API call ultimately failed.
#[derive(Debug, thiserror::Error)]
pub enum SlotApiError {
    /// The retry budget ran out. `source` is the protocol error from the
    /// final attempt; `None` when the last attempt settled unsuccessfully
    /// without erroring (a polled `Failed` status or a lingering conflict).
    #[error("gave up after {retries} retries")]
    RetriesExhausted {
        retries: u32,
        #[source]
        source: Option<ApiError>,
    },

    /// A protocol error judged not worth retrying.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The slot settled in a status the caller's workflow does not model.
    #[error("deployment slot {slot} is in unexpected status: {status}")]
    UnexpectedStatus { slot: String, status: SlotStatus },
}

impl SlotApiError {
    /// Whether the failure was the service rejecting the payload itself, the
    /// signal to fall back from upgrade to replace.
    pub fn is_payload_rejection(&self) -> bool {
        matches!(self, SlotApiError::Api(ApiError::BadRequest { .. }))
    }
}

impl From<RetryError<ApiError>> for SlotApiError {
    fn from(error: RetryError<ApiError>) -> Self {
        match error {
            RetryError::Aborted(source) => SlotApiError::Api(source),
            RetryError::Exhausted { retries, source } => {
                SlotApiError::RetriesExhausted { retries, source }
            }
        }
    }
}

/// Deployment-slot operations that block until a terminal outcome.
///
/// Implemented by [`RetryingApi`]; the slot controller is generic over this
/// trait so tests can drive it with a simulated service.
#[async_trait(?Send)]
pub trait SlotApi: Send + Sync {
    /// The slot's status once a check settles (i.e. stops reporting
    /// [`SlotStatus::Failed`]).
    async fn observed_status(&self, slot: &SlotRef) -> Result<SlotStatus, SlotApiError>;

    /// Whether a deployment occupies the slot.
    async fn exists(&self, slot: &SlotRef) -> Result<bool, SlotApiError>;

    /// Polls the slot until its observed status equals `target`.
    ///
    /// # Panics
    ///
    /// Waiting for [`SlotStatus::Failed`] is a caller bug and panics before
    /// any network call is made.
    async fn wait_for_status(&self, slot: &SlotRef, target: SlotStatus)
    -> Result<(), SlotApiError>;

    /// Creates a deployment in the slot and waits for the operation to succeed.
    async fn create(&self, slot: &SlotRef, payload: &DeploymentPayload)
    -> Result<(), SlotApiError>;

    /// Suspends the slot's deployment and waits for the operation to succeed.
    async fn suspend(&self, slot: &SlotRef) -> Result<(), SlotApiError>;

    /// Deletes the slot's deployment and waits for the operation to succeed.
    async fn delete(&self, slot: &SlotRef) -> Result<(), SlotApiError>;

    /// Upgrades the slot's deployment in place and waits for the operation to
    /// succeed. A payload rejection surfaces immediately, unretried.
    async fn upgrade(&self, slot: &SlotRef, payload: &DeploymentPayload)
    -> Result<(), SlotApiError>;
}

/// A deployment verb in flight through the begin/poll loop.
enum Operation<'a> {
    Suspend,
    Delete,
    Create(&'a DeploymentPayload),
    Upgrade(&'a DeploymentPayload),
}

impl Operation<'_> {
    fn name(&self) -> &'static str {
        match self {
            Operation::Suspend => "suspend",
            Operation::Delete => "delete",
            Operation::Create(_) => "create",
            Operation::Upgrade(_) => "upgrade",
        }
    }
}

fn transient(error: &ApiError) -> Verdict {
    if error.is_transient() {
        Verdict::Retry
    } else {
        Verdict::Abort
    }
}

/// Wraps [`ManagementOps`] with the retry engine.
///
/// Every `begin_*` verb runs as an outer loop of begin-then-poll: the begin
/// call and the status poll each retry transient protocol failures
/// internally, and an operation that settles `Failed` (or a conflict that
/// yields nothing to poll) sends the whole sequence around the outer loop
/// with a fresh operation reference.
pub struct RetryingApi<M: ManagementOps> {
    ops: M,
    retrier: Retrier,
}

impl<M: ManagementOps> RetryingApi<M> {
    pub fn new(ops: M, retrier: Retrier) -> Self {
        RetryingApi { ops, retrier }
    }

    async fn begin(
        &self,
        slot: &SlotRef,
        operation: &Operation<'_>,
    ) -> Result<Option<OperationRef>, ApiError> {
        match operation {
            Operation::Suspend => self.ops.begin_suspend(slot).await,
            Operation::Delete => self.ops.begin_delete(slot).await,
            Operation::Create(payload) => self.ops.begin_create(slot, payload).await,
            Operation::Upgrade(payload) => self.ops.begin_upgrade(slot, payload).await,
        }
    }

    /// One outer-loop body: begin the operation, then poll it to a terminal
    /// status. Settles `None` when a conflict left nothing to poll.
    async fn begin_and_poll(
        &self,
        slot: &SlotRef,
        operation: &Operation<'_>,
    ) -> Result<Option<OperationStatus>, SlotApiError> {
        let begun = self
            .retrier
            .run(async || self.begin(slot, operation).await, transient)
            .await
            .map_err(SlotApiError::from)?;

        let Some(op) = begun else {
            return Ok(None);
        };

        let status = self
            .retrier
            .run_until(
                async || self.ops.check_operation_status(&op).await,
                transient,
                OperationStatus::is_terminal,
            )
            .await
            .map_err(SlotApiError::from)?;
        tracing::debug!(operation = operation.name(), %op, %status, "operation settled");
        Ok(Some(status))
    }

    async fn execute(
        &self,
        slot: &SlotRef,
        operation: Operation<'_>,
    ) -> Result<(), SlotApiError> {
        tracing::info!(operation = operation.name(), slot = %slot, "executing");
        let outcome = self
            .retrier
            .run_until(
                async || self.begin_and_poll(slot, &operation).await,
                |_| Verdict::Abort,
                |status| matches!(status, Some(OperationStatus::Succeeded)),
            )
            .await;

        match outcome {
            Ok(_) => Ok(()),
            Err(RetryError::Aborted(error)) => Err(error),
            Err(RetryError::Exhausted { retries, source }) => match source {
                // The final attempt erred inside the begin/poll body; keep
                // its own diagnosis rather than double-wrapping it.
                Some(SlotApiError::Api(source)) => Err(SlotApiError::RetriesExhausted {
                    retries,
                    source: Some(source),
                }),
                Some(error) => Err(error),
                None => Err(SlotApiError::RetriesExhausted {
                    retries,
                    source: None,
                }),
            },
        }
    }
}

#[async_trait(?Send)]
impl<M: ManagementOps> SlotApi for RetryingApi<M> {
    async fn observed_status(&self, slot: &SlotRef) -> Result<SlotStatus, SlotApiError> {
        // The protocol client swallows transport failures into Failed, so a
        // settled check is any observation other than that sentinel. Protocol
        // bugs err and abort immediately.
        self.retrier
            .run_until(
                async || self.ops.check_deployment_status(slot).await,
                |_| Verdict::Abort,
                |status| *status != SlotStatus::Failed,
            )
            .await
            .map_err(SlotApiError::from)
    }

    async fn exists(&self, slot: &SlotRef) -> Result<bool, SlotApiError> {
        match self.observed_status(slot).await? {
            SlotStatus::Running | SlotStatus::Suspended | SlotStatus::RunningTransitioning => {
                Ok(true)
            }
            SlotStatus::NotFound => Ok(false),
            status => Err(SlotApiError::UnexpectedStatus {
                slot: slot.to_string(),
                status,
            }),
        }
    }

    async fn wait_for_status(
        &self,
        slot: &SlotRef,
        target: SlotStatus,
    ) -> Result<(), SlotApiError> {
        assert!(
            target != SlotStatus::Failed,
            "waiting for a failed status check is a bug"
        );

        tracing::info!(slot = %slot, %target, "waiting for status");
        self.retrier
            .run_until(
                async || self.ops.check_deployment_status(slot).await,
                |_| Verdict::Abort,
                |status| *status == target,
            )
            .await
            .map_err(SlotApiError::from)?;
        Ok(())
    }

    async fn create(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        self.execute(slot, Operation::Create(payload)).await
    }

    async fn suspend(&self, slot: &SlotRef) -> Result<(), SlotApiError> {
        self.execute(slot, Operation::Suspend).await
    }

    async fn delete(&self, slot: &SlotRef) -> Result<(), SlotApiError> {
        self.execute(slot, Operation::Delete).await
    }

    async fn upgrade(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        self.execute(slot, Operation::Upgrade(payload)).await
    }
}
