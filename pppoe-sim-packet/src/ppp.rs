//! PPP frame (RFC 1661) as carried inside PPPoE session packets
//!
//! No HDLC address/control bytes: the frame is the 2-byte protocol field
//! followed by the protocol payload.

use bytes::{BufMut, BytesMut};
use pppoe_sim_core::util::read_u16;
use pppoe_sim_core::Result;
use std::fmt;

/// PPP header size (protocol field only)
pub const PPP_HEADER_SIZE: usize = 2;

/// PPP protocol numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PppProtocol {
    /// Link Control Protocol (0xC021)
    Lcp,
    /// Password Authentication Protocol (0xC023)
    Pap,
    /// Challenge Handshake Authentication Protocol (0xC223)
    Chap,
    /// Internet Protocol Control Protocol (0x8021)
    Ipcp,
    /// IPv6 Control Protocol (0x8057)
    Ipv6cp,
    /// Anything else
    Other(u16),
}

impl PppProtocol {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0xC021 => Self::Lcp,
            0xC023 => Self::Pap,
            0xC223 => Self::Chap,
            0x8021 => Self::Ipcp,
            0x8057 => Self::Ipv6cp,
            other => Self::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::Lcp => 0xC021,
            Self::Pap => 0xC023,
            Self::Chap => 0xC223,
            Self::Ipcp => 0x8021,
            Self::Ipv6cp => 0x8057,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for PppProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lcp => write!(f, "PPP LCP"),
            Self::Pap => write!(f, "PPP PAP"),
            Self::Chap => write!(f, "PPP CHAP"),
            Self::Ipcp => write!(f, "PPP IPCP"),
            Self::Ipv6cp => write!(f, "PPP IPV6CP"),
            Self::Other(other) => write!(f, "PPP 0x{:04X}", other),
        }
    }
}

/// PPP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PppFrame {
    pub protocol: PppProtocol,
    pub payload: Vec<u8>,
}

impl PppFrame {
    pub fn new(protocol: PppProtocol, payload: Vec<u8>) -> Self {
        Self { protocol, payload }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(PPP_HEADER_SIZE + self.payload.len());
        buffer.put_u16(self.protocol.to_u16());
        buffer.put_slice(&self.payload);
        buffer.to_vec()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let protocol = PppProtocol::from_u16(read_u16(data, 0, "PPP header")?);
        Ok(Self {
            protocol,
            payload: data[PPP_HEADER_SIZE..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pppoe_sim_core::Error;

    #[test]
    fn test_protocol_numbers() {
        assert_eq!(PppProtocol::Lcp.to_u16(), 0xC021);
        assert_eq!(PppProtocol::Pap.to_u16(), 0xC023);
        assert_eq!(PppProtocol::from_u16(0x8057), PppProtocol::Ipv6cp);
        assert_eq!(PppProtocol::from_u16(0x0021), PppProtocol::Other(0x0021));
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = PppFrame::new(PppProtocol::Pap, vec![0x01, 0x07, 0x00, 0x04]);
        let bytes = frame.to_bytes();
        assert_eq!(&bytes[..2], &[0xC0, 0x23]);
        assert_eq!(PppFrame::from_bytes(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_frame_too_short() {
        assert!(matches!(
            PppFrame::from_bytes(&[0xC0]),
            Err(Error::TruncatedFrame { .. })
        ));
    }
}
