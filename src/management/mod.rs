// ABOUTME: Client stack for the remote management API.
// ABOUTME: Transport seam, protocol client, and the retry-wrapped reliable layer.

mod error;
mod protocol;
mod reliable;
mod status;
mod transport;

pub use error::ApiError;
pub use protocol::{ManagementClient, ManagementOps};
pub use reliable::{RetryingApi, SlotApi, SlotApiError};
pub use status::{OperationStatus, SlotStatus};
pub use transport::{HttpResponse, ManagementTransport, Transport, TransportError};
