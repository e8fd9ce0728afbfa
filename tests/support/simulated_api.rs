// ABOUTME: Reliable-API double simulating the remote slot's state transitions.
// ABOUTME: Asserts the controller only requests transitions legal in the current state.

use std::sync::Arc;

use async_trait::async_trait;
use gantry::management::{ApiError, SlotApi, SlotApiError, SlotStatus};
use gantry::types::{DeploymentPayload, SlotRef};
use parking_lot::Mutex;

struct SimState {
    current: SlotStatus,
    // Set by waits, cleared by operations: every operation must be followed
    // by a wait before the next operation runs.
    wait_completed: bool,
    deleted_at_least_once: bool,
    last_payload_name: Option<String>,
    calls: Vec<String>,
}

/// Simulates the slot as the reliable API presents it to the controller.
///
/// Each operation asserts the remote service's own precondition (suspend
/// needs a running deployment, delete a suspended one, create an empty slot)
/// and that the prior operation was waited to completion first. Clones share
/// state, so tests keep a handle for assertions after the controller takes
/// ownership.
#[derive(Clone)]
pub struct SimulatedSlotApi {
    expected_slot: SlotRef,
    reject_upgrade: bool,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedSlotApi {
    pub fn new(expected_slot: SlotRef, current: SlotStatus) -> Self {
        SimulatedSlotApi {
            expected_slot,
            reject_upgrade: false,
            state: Arc::new(Mutex::new(SimState {
                current,
                wait_completed: true,
                deleted_at_least_once: false,
                last_payload_name: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Make upgrade fail the way the service rejects a bad payload.
    pub fn rejecting_upgrades(mut self) -> Self {
        self.reject_upgrade = true;
        self
    }

    pub fn current_state(&self) -> SlotStatus {
        self.state.lock().current
    }

    pub fn wait_completed(&self) -> bool {
        self.state.lock().wait_completed
    }

    pub fn deleted_at_least_once(&self) -> bool {
        self.state.lock().deleted_at_least_once
    }

    pub fn last_payload_name(&self) -> Option<String> {
        self.state.lock().last_payload_name.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn check_slot(&self, slot: &SlotRef) {
        assert_eq!(slot, &self.expected_slot, "call targeted the wrong slot");
    }
}

#[async_trait(?Send)]
impl SlotApi for SimulatedSlotApi {
    async fn observed_status(&self, slot: &SlotRef) -> Result<SlotStatus, SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("status".to_string());
        Ok(state.current)
    }

    async fn exists(&self, slot: &SlotRef) -> Result<bool, SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("exists".to_string());
        Ok(matches!(
            state.current,
            SlotStatus::Running | SlotStatus::Suspended | SlotStatus::RunningTransitioning
        ))
    }

    async fn wait_for_status(
        &self,
        slot: &SlotRef,
        target: SlotStatus,
    ) -> Result<(), SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push(format!("wait({target:?})"));
        assert!(
            !state.wait_completed,
            "waited without an operation in flight"
        );
        assert_eq!(target, state.current, "waited for a status the simulated service will never reach");
        state.wait_completed = true;
        Ok(())
    }

    async fn create(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("create".to_string());
        assert!(state.wait_completed, "create before the prior wait finished");
        assert_eq!(
            state.current,
            SlotStatus::NotFound,
            "create into an occupied slot"
        );
        state.last_payload_name = Some(payload.name.clone());
        state.wait_completed = false;
        state.current = SlotStatus::Running;
        Ok(())
    }

    async fn suspend(&self, slot: &SlotRef) -> Result<(), SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("suspend".to_string());
        if state.current != SlotStatus::Suspended {
            assert!(state.wait_completed, "suspend before the prior wait finished");
            assert_eq!(state.current, SlotStatus::Running, "suspend needs a running deployment");
        }
        state.wait_completed = false;
        state.current = SlotStatus::Suspended;
        Ok(())
    }

    async fn delete(&self, slot: &SlotRef) -> Result<(), SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("delete".to_string());
        assert!(state.wait_completed, "delete before the prior wait finished");
        assert_eq!(
            state.current,
            SlotStatus::Suspended,
            "delete needs a suspended deployment"
        );
        state.wait_completed = false;
        state.current = SlotStatus::NotFound;
        state.deleted_at_least_once = true;
        Ok(())
    }

    async fn upgrade(
        &self,
        slot: &SlotRef,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        self.check_slot(slot);
        let mut state = self.state.lock();
        state.calls.push("upgrade".to_string());
        if self.reject_upgrade {
            return Err(SlotApiError::Api(ApiError::BadRequest {
                operation: "upgrade".to_string(),
                body: "<Error><Code>BadRequest</Code></Error>".to_string(),
            }));
        }
        assert!(state.wait_completed, "upgrade before the prior wait finished");
        assert_eq!(state.current, SlotStatus::Running, "upgrade needs a running deployment");
        state.last_payload_name = Some(payload.name.clone());
        state.wait_completed = false;
        Ok(())
    }
}
