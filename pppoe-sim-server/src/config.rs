//! Simulator configuration

use pppoe_sim_core::{Error, MacAddr, Result};
pub use pppoe_sim_packet::lcp::DEFAULT_MRU;
use pppoe_sim_packet::pppoe::{PPPOE_HEADER_SIZE, SERVICE_NAME_ANY};
use pppoe_sim_packet::{EthernetFrame, PppoeTag};

use crate::session::{AC_COOKIE_LEN, HOST_UNIQ_LEN};

/// Name advertised in the AC-Name tag of every offer
pub const DEFAULT_AC_NAME: &str = "Simulator";

/// Session id assigned by the session confirmation
pub const DEFAULT_SESSION_ID: u16 = 1;

/// Longest AC-Name that still lets the offer fit in one Ethernet frame
pub const MAX_AC_NAME_LEN: usize = EthernetFrame::MAX_FRAME_SIZE
    - EthernetFrame::HEADER_SIZE
    - PPPOE_HEADER_SIZE
    - SERVICE_NAME_ANY.len()
    - PppoeTag::HEADER_SIZE * 3
    - HOST_UNIQ_LEN
    - AC_COOKIE_LEN;

/// Behaviour of one simulated access concentrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// AC-Name tag value
    pub ac_name: String,
    /// Session id handed out in PADS and used for every session frame
    pub session_id: u16,
    /// MRU proposed when the peer's Configure-Request carries none
    pub default_mru: u16,
    /// Stations whose frames are dropped on arrival
    pub ignored_sources: Vec<MacAddr>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ac_name: DEFAULT_AC_NAME.to_string(),
            session_id: DEFAULT_SESSION_ID,
            default_mru: DEFAULT_MRU,
            ignored_sources: Vec::new(),
        }
    }
}

impl SimulatorConfig {
    pub fn with_ac_name(mut self, name: impl Into<String>) -> Self {
        self.ac_name = name.into();
        self
    }

    pub fn with_session_id(mut self, session_id: u16) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_default_mru(mut self, mru: u16) -> Self {
        self.default_mru = mru;
        self
    }

    pub fn with_ignored_source(mut self, mac: MacAddr) -> Self {
        if !self.ignored_sources.contains(&mac) {
            self.ignored_sources.push(mac);
        }
        self
    }

    /// Whether frames from `mac` are dropped unconditionally
    pub fn is_ignored(&self, mac: &MacAddr) -> bool {
        self.ignored_sources.contains(mac)
    }

    /// Reject values the wire format cannot carry
    pub fn validate(&self) -> Result<()> {
        // 0x0000 and 0xFFFF are reserved (RFC 2516 section 4)
        if self.session_id == 0 || self.session_id == 0xFFFF {
            return Err(Error::invalid_parameter(
                "session_id",
                "0x0000 and 0xFFFF are reserved",
            ));
        }
        if self.ac_name.len() > MAX_AC_NAME_LEN {
            return Err(Error::invalid_parameter(
                "ac_name",
                "offer would not fit in one Ethernet frame",
            ));
        }
        if self.default_mru == 0 {
            return Err(Error::invalid_parameter("default_mru", "must be non-zero"));
        }
        Ok(())
    }
}
