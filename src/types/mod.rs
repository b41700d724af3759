// Public modules
pub mod flow_request;
pub mod flow_response;
pub mod io_type;
pub mod turn;
pub mod tweaks;

// Re-exports
pub use flow_request::FlowRequest;
pub use flow_response::{FlowResponse, INVALID_RESPONSE_FORMAT};
pub use io_type::{IoType, IoTypeParseError};
pub use turn::{Role, Turn};
pub use tweaks::Tweaks;
