//! Raw frame transport capability
//!
//! The session engine reaches the wire only through [`FrameTransport`]. The
//! pcap-backed implementation lives in `pppoe-sim-capture`; tests drive the
//! engine through an in-memory implementation.

use crate::{MacAddr, Result};

/// A link-layer frame source and sink bound to one local interface
pub trait FrameTransport {
    /// Block until the next Ethernet frame arrives.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>>;

    /// Inject a complete Ethernet frame. Delivery is not confirmed.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Hardware address of the interface this transport is bound to
    fn local_mac(&self) -> MacAddr;
}
