// ABOUTME: Domain value types shared by the management client and controller.
// ABOUTME: Slot and operation references plus the deployment payload.

mod operation;
mod payload;
mod slot;

pub use operation::OperationRef;
pub use payload::{DeploymentPayload, UpgradeMode};
pub use slot::{MANAGEMENT_ENDPOINT, SlotRef};
