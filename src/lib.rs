// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod error;
pub mod observability;
pub mod types;

// Re-exports
pub use client::{FlowClient, FlowRunner};
pub use client_logger::FlowLogger;
pub use config::FlowConfig;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
