//! Ethernet frame construction and parsing
//!
//! Only Ethernet II framing is handled; PPPoE never uses an 802.3 length
//! field, so everything above 1500 is treated as an EtherType.

use bytes::{BufMut, BytesMut};
use pppoe_sim_core::{ethertypes, Error, MacAddr, Result};
use std::fmt;

/// EtherType values the simulator distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// PPPoE Discovery (0x8863)
    PPPoEDiscovery,
    /// PPPoE Session (0x8864)
    PPPoESession,
    /// Any other EtherType
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::PPPoEDiscovery => ethertypes::PPPOE_DISCOVERY,
            EtherType::PPPoESession => ethertypes::PPPOE_SESSION,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            ethertypes::PPPOE_DISCOVERY => EtherType::PPPoEDiscovery,
            ethertypes::PPPOE_SESSION => EtherType::PPPoESession,
            val => EtherType::Custom(val),
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::PPPoEDiscovery => write!(f, "PPPoE-Discovery"),
            EtherType::PPPoESession => write!(f, "PPPoE-Session"),
            EtherType::Custom(val) => write!(f, "0x{:04X}", val),
        }
    }
}

/// Ethernet II frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    /// Destination MAC address
    pub destination: MacAddr,
    /// Source MAC address
    pub source: MacAddr,
    /// EtherType field
    pub ethertype: EtherType,
    /// Payload data (may include trailing padding on received frames)
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// Minimum Ethernet frame size (without FCS)
    pub const MIN_FRAME_SIZE: usize = 60;

    /// Maximum Ethernet frame size (without FCS)
    pub const MAX_FRAME_SIZE: usize = 1514;

    /// Ethernet header size (dst + src + type)
    pub const HEADER_SIZE: usize = 14;

    /// Create a new Ethernet frame
    pub fn new(
        destination: MacAddr,
        source: MacAddr,
        ethertype: EtherType,
        payload: Vec<u8>,
    ) -> Self {
        EthernetFrame {
            destination,
            source,
            ethertype,
            payload,
        }
    }

    /// Convert the frame to bytes, zero-padding to the minimum frame size
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE + self.payload.len());

        buffer.put_slice(self.destination.as_bytes());
        buffer.put_slice(self.source.as_bytes());
        buffer.put_u16(self.ethertype.to_u16());
        buffer.put_slice(&self.payload);

        if buffer.len() < Self::MIN_FRAME_SIZE {
            buffer.resize(Self::MIN_FRAME_SIZE, 0);
        }

        buffer.to_vec()
    }

    /// Parse an Ethernet frame from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::truncated(
                "Ethernet header",
                Self::HEADER_SIZE,
                data.len(),
            ));
        }

        let destination = MacAddr::from_slice(&data[0..6])
            .ok_or_else(|| Error::truncated("Ethernet header", 6, data.len()))?;
        let source = MacAddr::from_slice(&data[6..12])
            .ok_or_else(|| Error::truncated("Ethernet header", 12, data.len()))?;
        let ethertype = EtherType::from_u16(u16::from_be_bytes([data[12], data[13]]));

        Ok(EthernetFrame {
            destination,
            source,
            ethertype,
            payload: data[Self::HEADER_SIZE..].to_vec(),
        })
    }
}
