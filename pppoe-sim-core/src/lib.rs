//! PPPoE Simulator Core Library
//!
//! This crate provides the error type, hardware address type, transport
//! capability and primitive helpers shared by the PPPoE simulator crates.

pub mod error;
pub mod transport;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use error::{Error, Result};
pub use transport::FrameTransport;
pub use types::*;
