// ABOUTME: Protocol-client double replaying scripted verb outcomes.
// ABOUTME: Drives the retry-wrapped API without any transport underneath.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use gantry::management::{ApiError, ManagementOps, OperationStatus, SlotStatus};
use gantry::types::{DeploymentPayload, OperationRef, SlotRef};
use parking_lot::Mutex;

/// Shared call log, usable after the double moves into the API under test.
#[derive(Clone, Default)]
pub struct CallLog {
    begins: Arc<Mutex<Vec<&'static str>>>,
    polled: Arc<Mutex<Vec<OperationRef>>>,
    status_checks: Arc<Mutex<usize>>,
}

impl CallLog {
    pub fn begin_calls(&self) -> Vec<&'static str> {
        self.begins.lock().clone()
    }

    pub fn polled_operations(&self) -> Vec<OperationRef> {
        self.polled.lock().clone()
    }

    pub fn status_check_count(&self) -> usize {
        *self.status_checks.lock()
    }
}

#[derive(Default)]
pub struct ScriptedOps {
    statuses: Mutex<VecDeque<Result<SlotStatus, ApiError>>>,
    begins: Mutex<VecDeque<Result<Option<OperationRef>, ApiError>>>,
    polls: Mutex<VecDeque<Result<OperationStatus, ApiError>>>,
    log: CallLog,
}

impl ScriptedOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, status: SlotStatus) -> Self {
        self.statuses.lock().push_back(Ok(status));
        self
    }

    pub fn with_status_error(self, error: ApiError) -> Self {
        self.statuses.lock().push_back(Err(error));
        self
    }

    pub fn with_begin(self, op: Option<OperationRef>) -> Self {
        self.begins.lock().push_back(Ok(op));
        self
    }

    pub fn with_begin_error(self, error: ApiError) -> Self {
        self.begins.lock().push_back(Err(error));
        self
    }

    pub fn with_poll(self, status: OperationStatus) -> Self {
        self.polls.lock().push_back(Ok(status));
        self
    }

    pub fn with_poll_error(self, error: ApiError) -> Self {
        self.polls.lock().push_back(Err(error));
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn next_begin(&self, verb: &'static str) -> Result<Option<OperationRef>, ApiError> {
        self.log.begins.lock().push(verb);
        self.begins
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted outcome left for begin_{verb}"))
    }
}

#[async_trait]
impl ManagementOps for ScriptedOps {
    async fn check_deployment_status(&self, _slot: &SlotRef) -> Result<SlotStatus, ApiError> {
        *self.log.status_checks.lock() += 1;
        self.statuses
            .lock()
            .pop_front()
            .expect("no scripted outcome left for check_deployment_status")
    }

    async fn begin_suspend(&self, _slot: &SlotRef) -> Result<Option<OperationRef>, ApiError> {
        self.next_begin("suspend")
    }

    async fn begin_delete(&self, _slot: &SlotRef) -> Result<Option<OperationRef>, ApiError> {
        self.next_begin("delete")
    }

    async fn begin_create(
        &self,
        _slot: &SlotRef,
        _payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError> {
        self.next_begin("create")
    }

    async fn begin_upgrade(
        &self,
        _slot: &SlotRef,
        _payload: &DeploymentPayload,
    ) -> Result<Option<OperationRef>, ApiError> {
        self.next_begin("upgrade")
    }

    async fn check_operation_status(
        &self,
        op: &OperationRef,
    ) -> Result<OperationStatus, ApiError> {
        self.log.polled.lock().push(op.clone());
        self.polls
            .lock()
            .pop_front()
            .expect("no scripted outcome left for check_operation_status")
    }
}
