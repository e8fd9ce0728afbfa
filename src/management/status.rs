// ABOUTME: Observed-state enumerations for deployment slots and async operations.
// ABOUTME: Produced by the protocol client, consumed by the retry-wrapped API.

use std::fmt;

/// Outcome of polling a slot's current deployment status.
///
/// `Failed` is a local sentinel meaning the check itself could not be
/// completed (transport failure or an unmodeled HTTP status). It is never a
/// legal wait target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    NotFound,
    Running,
    RunningTransitioning,
    Starting,
    Suspending,
    Suspended,
    Deploying,
    Failed,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotStatus::NotFound => "not found",
            SlotStatus::Running => "running",
            SlotStatus::RunningTransitioning => "running (transitioning)",
            SlotStatus::Starting => "starting",
            SlotStatus::Suspending => "suspending",
            SlotStatus::Suspended => "suspended",
            SlotStatus::Deploying => "deploying",
            SlotStatus::Failed => "status check failed",
        };
        write!(f, "{name}")
    }
}

/// Outcome of polling an asynchronous operation.
///
/// `Succeeded` and `Failed` are terminal; `InProgress` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Whether polling can stop: the operation settled one way or the other.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationStatus::InProgress)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationStatus::InProgress => "in progress",
            OperationStatus::Succeeded => "succeeded",
            OperationStatus::Failed => "failed",
        };
        write!(f, "{name}")
    }
}
