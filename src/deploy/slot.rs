// ABOUTME: State machine sequencing deployment-slot transitions.
// ABOUTME: Composes reliable-API calls into replace, delete, and upgrade workflows.

use crate::management::{SlotApi, SlotApiError, SlotStatus};
use crate::types::{DeploymentPayload, SlotRef};

/// Drives one deployment slot through its legal state transitions.
///
/// The remote service enforces the ordering, not this program: a deployment
/// can only be deleted once suspended, and a slot can only be created into
/// once empty. The controller sequences the reliable API accordingly and
/// never interprets states outside that sequence.
pub struct SlotController<A: SlotApi> {
    api: A,
    slot: SlotRef,
}

impl<A: SlotApi> SlotController<A> {
    pub fn new(api: A, slot: SlotRef) -> Self {
        SlotController { api, slot }
    }

    pub fn slot(&self) -> &SlotRef {
        &self.slot
    }

    /// Whether a deployment currently occupies the slot.
    pub async fn deployment_exists(&self) -> Result<bool, SlotApiError> {
        self.api.exists(&self.slot).await
    }

    /// The slot's current observed status, for reporting.
    pub async fn deployment_status(&self) -> Result<SlotStatus, SlotApiError> {
        self.api.observed_status(&self.slot).await
    }

    /// Removes whatever is deployed in the slot. A no-op when the slot is
    /// already empty.
    ///
    /// Delete is only legal on a suspended deployment, so the sequence is
    /// suspend, wait for suspended, delete, wait for gone.
    pub async fn delete_deployment(&self) -> Result<(), SlotApiError> {
        if !self.api.exists(&self.slot).await? {
            tracing::info!(slot = %self.slot, "nothing deployed, nothing to delete");
            return Ok(());
        }

        tracing::info!(slot = %self.slot, "suspending deployment");
        self.api.suspend(&self.slot).await?;
        self.api
            .wait_for_status(&self.slot, SlotStatus::Suspended)
            .await?;

        tracing::info!(slot = %self.slot, "deleting deployment");
        self.api.delete(&self.slot).await?;
        self.api
            .wait_for_status(&self.slot, SlotStatus::NotFound)
            .await?;

        tracing::info!(slot = %self.slot, "deployment deleted");
        Ok(())
    }

    /// Replaces whatever is running in the slot with `payload`.
    ///
    /// Deletes the existing deployment first (a no-op when the slot is
    /// empty), then creates the new one and waits for it to run.
    pub async fn create_or_replace_deployment(
        &self,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        self.delete_deployment().await?;

        tracing::info!(slot = %self.slot, deployment = %payload.name, "creating deployment");
        self.api.create(&self.slot, payload).await?;
        self.api
            .wait_for_status(&self.slot, SlotStatus::Running)
            .await?;

        tracing::info!(slot = %self.slot, "deployment running");
        Ok(())
    }

    /// Upgrades the running deployment in place, without the delete/recreate
    /// cycle.
    ///
    /// A payload rejection surfaces to the caller, which decides whether to
    /// fall back to [`Self::create_or_replace_deployment`].
    pub async fn upgrade_deployment(
        &self,
        payload: &DeploymentPayload,
    ) -> Result<(), SlotApiError> {
        tracing::info!(slot = %self.slot, deployment = %payload.name, "upgrading deployment");
        self.api.upgrade(&self.slot, payload).await?;
        self.api
            .wait_for_status(&self.slot, SlotStatus::Running)
            .await?;

        tracing::info!(slot = %self.slot, "upgrade complete");
        Ok(())
    }
}
