//! Frame codecs for the PPPoE simulator
//!
//! This crate encodes and decodes the nested layers a PPPoE client speaks
//! while bringing up a link:
//!
//! - **Ethernet II frames** carrying the two PPPoE EtherTypes
//! - **PPPoE** discovery (PADI/PADO/PADR/PADS/PADT) and session packets
//! - **PPP** frames (2-byte protocol field, no HDLC framing)
//! - **LCP** messages with code-dependent option regions
//! - **PAP** authentication messages
//!
//! # Architecture
//!
//! - [`ethernet`] - Ethernet II frame construction and parsing
//! - [`pppoe`] - PPPoE header, discovery tags and the offer tag layout
//! - [`ppp`] - PPP protocol field
//! - [`lcp`] - LCP messages and options
//! - [`pap`] - PAP messages, credentials and results
//! - [`option`] - The [`WireOption`] capability shared by LCP and PAP bodies
//!
//! Every decoder fails with `Error::TruncatedFrame` when a declared length
//! runs past the available bytes; nothing here panics on hostile input.
//!
//! # Quick Start
//!
//! ```rust
//! use pppoe_sim_core::MacAddr;
//! use pppoe_sim_packet::{EtherType, EthernetFrame, LcpPacket, PppFrame, PppProtocol};
//! use pppoe_sim_packet::{PppoeCode, PppoePacket};
//!
//! let lcp = LcpPacket::terminate_request(1);
//! let ppp = PppFrame::new(PppProtocol::Lcp, lcp.to_bytes());
//! let pppoe = PppoePacket::new(PppoeCode::SessionData, 1, ppp.to_bytes());
//! let frame = EthernetFrame::new(
//!     MacAddr::BROADCAST,
//!     MacAddr::ZERO,
//!     EtherType::PPPoESession,
//!     pppoe.to_bytes(),
//! );
//!
//! let bytes = frame.to_bytes();
//! assert_eq!(bytes.len(), EthernetFrame::MIN_FRAME_SIZE);
//!
//! let decoded = EthernetFrame::from_bytes(&bytes).unwrap();
//! let session = PppoePacket::from_bytes(&decoded.payload).unwrap();
//! assert_eq!(session.payload, ppp.to_bytes());
//! ```

pub mod ethernet;
pub mod lcp;
pub mod option;
pub mod pap;
pub mod ppp;
pub mod pppoe;

// Re-export commonly used types for convenience
pub use ethernet::{EtherType, EthernetFrame};
pub use lcp::{
    EchoOption, LcpCode, LcpOption, LcpOptionType, LcpOptions, LcpPacket, TerminateOption,
};
pub use option::WireOption;
pub use pap::{PapBody, PapCode, PapCredentials, PapPacket, PapResult};
pub use ppp::{PppFrame, PppProtocol};
pub use pppoe::{OfferTags, PppoeCode, PppoePacket, PppoeTag, PppoeTagType};
