// ABOUTME: Value type identifying a deployment slot within a hosted service.
// ABOUTME: Renders the canonical management-endpoint URI for the slot.

use std::fmt;

use super::operation::OperationRef;

/// Base URL of the management endpoint all slot and operation URIs hang off.
pub const MANAGEMENT_ENDPOINT: &str = "https://management.core.windows.net";

/// Identifies a deployment slot: subscription, hosted service, slot name.
///
/// Equality is structural over all three fields. The slot name is the
/// service-side slot identifier, e.g. `production` or `staging`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotRef {
    subscription_id: String,
    service_name: String,
    slot_name: String,
}

impl SlotRef {
    pub fn new(
        subscription_id: impl Into<String>,
        service_name: impl Into<String>,
        slot_name: impl Into<String>,
    ) -> Self {
        SlotRef {
            subscription_id: subscription_id.into(),
            service_name: service_name.into(),
            slot_name: slot_name.into(),
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    /// Canonical management URI for this slot.
    pub fn uri(&self) -> String {
        format!(
            "{}/{}/services/hostedservices/{}/deploymentslots/{}",
            MANAGEMENT_ENDPOINT, self.subscription_id, self.service_name, self.slot_name
        )
    }

    /// Reference to an asynchronous operation accepted against this slot.
    pub fn operation(&self, request_id: impl Into<String>) -> OperationRef {
        OperationRef::new(self.subscription_id.clone(), request_id)
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}
