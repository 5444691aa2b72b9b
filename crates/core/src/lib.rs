// Core types and functionality for kgbridge: endpoint registry, remote query
// execution and result formatting

pub mod config;
pub mod error;
pub mod executor;
pub mod format;
pub mod registry;
pub mod types;

pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use executor::{QueryBackend, QueryExecutor};
pub use format::format_results;
pub use registry::EndpointRegistry;
pub use types::*;
