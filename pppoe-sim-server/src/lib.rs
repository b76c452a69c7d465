//! PPPoE access concentrator simulator
//!
//! [`SessionEngine`] answers a PPPoE client through discovery, LCP and PAP,
//! records the credentials it submits and tears the session down once the
//! client starts IPv6CP. All I/O goes through a `FrameTransport`, so the
//! engine runs the same against pcap or an in-memory frame queue.

pub mod adapter;
pub mod config;
pub mod session;

#[cfg(test)]
mod tests;

pub use adapter::TransportAdapter;
pub use config::SimulatorConfig;
pub use session::{
    Credentials, SessionEngine, SessionOutcome, SessionReport, SessionState, SessionStats,
};
