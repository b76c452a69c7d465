//! Packet capture transport for the PPPoE simulator
//!
//! This crate binds the simulator to a real network interface through pcap.
//!
//! ## Features
//!
//! - **Interface Management**: List, query, and select network interfaces
//! - **Transport**: [`PcapTransport`] implements `FrameTransport` over a pcap handle
//! - **BPF Filters**: PPPoE discovery and session filters
//! - **Statistics**: Frame and byte counters that survive handing the transport away
//!
//! ## Example
//!
//! ```no_run
//! use pppoe_sim_capture::{CaptureConfig, PcapTransport};
//! use pppoe_sim_core::FrameTransport;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut transport = PcapTransport::open("eth0", &CaptureConfig::default())?;
//! if let Some(frame) = transport.read_frame()? {
//!     println!("Got frame: {} bytes", frame.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod filters;
pub mod interface;
pub mod stats;

// Re-export main types
pub use capture::{CaptureConfig, PcapTransport};
pub use interface::{get_interface, list_capture_interfaces, list_interfaces, InterfaceInfo};
pub use stats::{CaptureStats, StatsAccumulator};
