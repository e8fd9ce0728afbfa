// ABOUTME: Deployment-slot orchestration over the reliable management API.
// ABOUTME: Exports the controller that sequences replace, delete, and upgrade workflows.

mod slot;

pub use slot::SlotController;
