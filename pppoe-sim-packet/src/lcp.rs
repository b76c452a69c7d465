//! LCP protocol - RFC 1661
//!
//! Link Control Protocol messages. The layout of the option region depends on
//! the message code, so options are held in [`LcpOptions`], a variant type
//! selected by the code at decode time.

use bytes::{BufMut, BytesMut};
use pppoe_sim_core::util::{read_slice, read_u16, read_u32};
use pppoe_sim_core::{Error, Result};

use crate::option::{options_len, WireOption};

/// LCP header size (code + identifier + length)
pub const LCP_HEADER_SIZE: usize = 4;

/// Generic option header size (type + length)
pub const LCP_OPTION_HEADER_SIZE: usize = 2;

/// MRU proposed when the peer does not announce one
pub const DEFAULT_MRU: u16 = 1492;

/// LCP packet codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcpCode {
    ConfigureRequest,
    ConfigureAck,
    ConfigureNak,
    ConfigureReject,
    TerminateRequest,
    TerminateAck,
    CodeReject,
    ProtocolReject,
    EchoRequest,
    EchoReply,
    DiscardRequest,
    Identification,
    TimeRemaining,
    Unknown(u8),
}

impl LcpCode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Self::ConfigureRequest,
            0x02 => Self::ConfigureAck,
            0x03 => Self::ConfigureNak,
            0x04 => Self::ConfigureReject,
            0x05 => Self::TerminateRequest,
            0x06 => Self::TerminateAck,
            0x07 => Self::CodeReject,
            0x08 => Self::ProtocolReject,
            0x09 => Self::EchoRequest,
            0x0A => Self::EchoReply,
            0x0B => Self::DiscardRequest,
            0x0C => Self::Identification,
            0x0D => Self::TimeRemaining,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::ConfigureRequest => 0x01,
            Self::ConfigureAck => 0x02,
            Self::ConfigureNak => 0x03,
            Self::ConfigureReject => 0x04,
            Self::TerminateRequest => 0x05,
            Self::TerminateAck => 0x06,
            Self::CodeReject => 0x07,
            Self::ProtocolReject => 0x08,
            Self::EchoRequest => 0x09,
            Self::EchoReply => 0x0A,
            Self::DiscardRequest => 0x0B,
            Self::Identification => 0x0C,
            Self::TimeRemaining => 0x0D,
            Self::Unknown(other) => other,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::ConfigureRequest => "Configuration Request",
            Self::ConfigureAck => "Configuration Ack",
            Self::ConfigureNak => "Configuration Nak",
            Self::ConfigureReject => "Configuration Reject",
            Self::TerminateRequest => "Termination Request",
            Self::TerminateAck => "Termination Ack",
            Self::CodeReject => "Code Reject",
            Self::ProtocolReject => "Protocol Reject",
            Self::EchoRequest => "Echo Request",
            Self::EchoReply => "Echo Reply",
            Self::DiscardRequest => "Discard Request",
            Self::Identification => "Identification",
            Self::TimeRemaining => "Time Remaining",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// LCP configuration option types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcpOptionType {
    /// Maximum-Receive-Unit
    Mru,
    /// Async-Control-Character-Map
    Accm,
    AuthenticationProtocol,
    QualityProtocol,
    MagicNumber,
    ProtocolFieldCompression,
    AddressAndControlFieldCompression,
    Identification,
    Callback,
    Custom(u8),
}

impl LcpOptionType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Self::Mru,
            0x02 => Self::Accm,
            0x03 => Self::AuthenticationProtocol,
            0x04 => Self::QualityProtocol,
            0x05 => Self::MagicNumber,
            0x07 => Self::ProtocolFieldCompression,
            0x08 => Self::AddressAndControlFieldCompression,
            0x0C => Self::Identification,
            0x0D => Self::Callback,
            other => Self::Custom(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Mru => 0x01,
            Self::Accm => 0x02,
            Self::AuthenticationProtocol => 0x03,
            Self::QualityProtocol => 0x04,
            Self::MagicNumber => 0x05,
            Self::ProtocolFieldCompression => 0x07,
            Self::AddressAndControlFieldCompression => 0x08,
            Self::Identification => 0x0C,
            Self::Callback => 0x0D,
            Self::Custom(other) => other,
        }
    }
}

/// Generic configuration option (type, length, data)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcpOption {
    pub option_type: LcpOptionType,
    /// Declared length, including the 2-byte header
    pub length: u8,
    pub data: Vec<u8>,
}

impl LcpOption {
    pub fn new(option_type: LcpOptionType, data: Vec<u8>) -> Self {
        Self {
            option_type,
            length: (LCP_OPTION_HEADER_SIZE + data.len()) as u8,
            data,
        }
    }

    pub fn mru(mru: u16) -> Self {
        Self::new(LcpOptionType::Mru, mru.to_be_bytes().to_vec())
    }

    pub fn auth_protocol(protocol: u16) -> Self {
        Self::new(
            LcpOptionType::AuthenticationProtocol,
            protocol.to_be_bytes().to_vec(),
        )
    }

    pub fn magic_number(magic: [u8; 4]) -> Self {
        Self::new(LcpOptionType::MagicNumber, magic.to_vec())
    }

    /// Data interpreted as a 16-bit value (MRU, authentication protocol)
    pub fn value_u16(&self) -> Option<u16> {
        let bytes = self.data.get(..2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Data interpreted as a 32-bit value (magic number)
    pub fn value_u32(&self) -> Option<u32> {
        let bytes = self.data.get(..4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Parse one option, returning it with the number of bytes consumed
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        let header = read_slice(data, 0, LCP_OPTION_HEADER_SIZE, "LCP option header")?;
        let option_type = LcpOptionType::from_u8(header[0]);
        let length = header[1];

        if (length as usize) < LCP_OPTION_HEADER_SIZE {
            return Err(Error::truncated(
                "LCP option length",
                LCP_OPTION_HEADER_SIZE,
                length as usize,
            ));
        }

        let value = read_slice(
            data,
            LCP_OPTION_HEADER_SIZE,
            length as usize - LCP_OPTION_HEADER_SIZE,
            "LCP option data",
        )?;

        Ok((
            Self {
                option_type,
                length,
                data: value.to_vec(),
            },
            length as usize,
        ))
    }

    /// Parse options back to back until `data` is exhausted
    pub fn parse_all(data: &[u8]) -> Result<Vec<Self>> {
        let mut options = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (option, consumed) = Self::from_bytes(&data[offset..])?;
            options.push(option);
            offset += consumed;
        }
        Ok(options)
    }
}

impl WireOption for LcpOption {
    fn encoded_len(&self) -> usize {
        LCP_OPTION_HEADER_SIZE + self.data.len()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        buffer.put_u8(self.option_type.to_u8());
        buffer.put_u8(self.length);
        buffer.put_slice(&self.data);
    }
}

/// Echo-Request/Reply body: magic number plus arbitrary data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoOption {
    pub magic: u32,
    pub data: Vec<u8>,
}

impl EchoOption {
    pub fn new(magic: u32, data: Vec<u8>) -> Self {
        Self { magic, data }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let magic = read_u32(data, 0, "LCP echo magic")?;
        Ok(Self {
            magic,
            data: data[4..].to_vec(),
        })
    }
}

impl WireOption for EchoOption {
    fn encoded_len(&self) -> usize {
        4 + self.data.len()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        buffer.put_u32(self.magic);
        buffer.put_slice(&self.data);
    }
}

/// Terminate-Request/Ack body: opaque data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminateOption {
    pub data: Vec<u8>,
}

impl TerminateOption {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl WireOption for TerminateOption {
    fn encoded_len(&self) -> usize {
        self.data.len()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        buffer.put_slice(&self.data);
    }
}

/// Option region of an LCP message, shaped by the message code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LcpOptions {
    /// No option region (Echo-Request)
    None,
    /// Generic option list (Configure-* and the remaining codes)
    Configure(Vec<LcpOption>),
    /// Echo-Reply body
    Echo(EchoOption),
    /// Terminate-Request/Ack body
    Terminate(TerminateOption),
}

impl LcpOptions {
    /// Decode the option region of a message with the given code
    pub fn decode(code: LcpCode, region: &[u8]) -> Result<Self> {
        match code {
            LcpCode::EchoRequest => Ok(Self::None),
            LcpCode::EchoReply => Ok(Self::Echo(EchoOption::from_bytes(region)?)),
            LcpCode::TerminateRequest | LcpCode::TerminateAck => {
                Ok(Self::Terminate(TerminateOption::new(region.to_vec())))
            }
            _ => Ok(Self::Configure(LcpOption::parse_all(region)?)),
        }
    }

    /// Generic options, empty for the other shapes
    pub fn configure(&self) -> &[LcpOption] {
        match self {
            Self::Configure(options) => options,
            Self::None | Self::Echo(_) | Self::Terminate(_) => &[],
        }
    }

    /// Find a generic option by type
    pub fn find(&self, option_type: LcpOptionType) -> Option<&LcpOption> {
        self.configure()
            .iter()
            .find(|op| op.option_type == option_type)
    }
}

impl WireOption for LcpOptions {
    fn encoded_len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Configure(options) => options_len(options),
            Self::Echo(echo) => echo.encoded_len(),
            Self::Terminate(terminate) => terminate.encoded_len(),
        }
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        match self {
            Self::None => {}
            Self::Configure(options) => {
                for option in options {
                    option.write_to(buffer);
                }
            }
            Self::Echo(echo) => echo.write_to(buffer),
            Self::Terminate(terminate) => terminate.write_to(buffer),
        }
    }
}

/// LCP packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcpPacket {
    pub code: LcpCode,
    pub identifier: u8,
    /// Header plus option region; trailing payload is not counted
    pub length: u16,
    pub options: LcpOptions,
    /// Bytes following the option region
    pub payload: Vec<u8>,
}

impl LcpPacket {
    /// Create a packet, computing the declared length from the options
    pub fn new(code: LcpCode, identifier: u8, options: LcpOptions) -> Self {
        let length = (LCP_HEADER_SIZE + options.encoded_len()) as u16;
        Self {
            code,
            identifier,
            length,
            options,
            payload: Vec::new(),
        }
    }

    pub fn configure_request(identifier: u8, options: Vec<LcpOption>) -> Self {
        Self::new(
            LcpCode::ConfigureRequest,
            identifier,
            LcpOptions::Configure(options),
        )
    }

    pub fn configure_ack(identifier: u8, options: Vec<LcpOption>) -> Self {
        Self::new(
            LcpCode::ConfigureAck,
            identifier,
            LcpOptions::Configure(options),
        )
    }

    pub fn echo_reply(identifier: u8, magic: u32) -> Self {
        Self::new(
            LcpCode::EchoReply,
            identifier,
            LcpOptions::Echo(EchoOption::new(magic, Vec::new())),
        )
    }

    pub fn terminate_request(identifier: u8) -> Self {
        Self::new(
            LcpCode::TerminateRequest,
            identifier,
            LcpOptions::Terminate(TerminateOption::default()),
        )
    }

    pub fn terminate_ack(identifier: u8) -> Self {
        Self::new(
            LcpCode::TerminateAck,
            identifier,
            LcpOptions::Terminate(TerminateOption::default()),
        )
    }

    /// Encode header, options and payload. The stored length is written as is.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(
            LCP_HEADER_SIZE + self.options.encoded_len() + self.payload.len(),
        );
        buffer.put_u8(self.code.to_u8());
        buffer.put_u8(self.identifier);
        buffer.put_u16(self.length);
        self.options.write_to(&mut buffer);
        buffer.put_slice(&self.payload);
        buffer.to_vec()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = read_slice(data, 0, LCP_HEADER_SIZE, "LCP header")?;
        let code = LcpCode::from_u8(header[0]);
        let identifier = header[1];
        let length = read_u16(data, 2, "LCP header")?;

        if (length as usize) < LCP_HEADER_SIZE {
            return Err(Error::truncated(
                "LCP length",
                LCP_HEADER_SIZE,
                length as usize,
            ));
        }

        let region = read_slice(
            data,
            LCP_HEADER_SIZE,
            length as usize - LCP_HEADER_SIZE,
            "LCP options",
        )?;
        let options = LcpOptions::decode(code, region)?;
        let consumed = LCP_HEADER_SIZE + options.encoded_len();

        Ok(Self {
            code,
            identifier,
            length,
            options,
            payload: data[consumed..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer_configure_request() -> Vec<u8> {
        vec![
            0x01, 0x07, 0x00, 0x0E, // Configure-Request, id 7, length 14
            0x01, 0x04, 0x05, 0xD4, // MRU 1492
            0x05, 0x06, 0x12, 0x34, 0x56, 0x78, // Magic-Number
        ]
    }

    #[test]
    fn test_code_conversion() {
        for raw in 0x01..=0x0D {
            assert_eq!(LcpCode::from_u8(raw).to_u8(), raw);
        }
        assert_eq!(LcpCode::from_u8(0x20), LcpCode::Unknown(0x20));
    }

    #[test]
    fn test_decode_configure_request() {
        let packet = LcpPacket::from_bytes(&peer_configure_request()).unwrap();

        assert_eq!(packet.code, LcpCode::ConfigureRequest);
        assert_eq!(packet.identifier, 7);
        assert_eq!(packet.length, 14);
        assert_eq!(packet.options.configure().len(), 2);
        assert_eq!(
            packet.options.find(LcpOptionType::Mru).and_then(LcpOption::value_u16),
            Some(1492)
        );
        assert_eq!(
            packet
                .options
                .find(LcpOptionType::MagicNumber)
                .and_then(LcpOption::value_u32),
            Some(0x12345678)
        );
        assert!(packet.payload.is_empty());
    }

    #[test]
    fn test_configure_roundtrip() {
        let bytes = peer_configure_request();
        let packet = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(packet.to_bytes(), bytes);
    }

    #[test]
    fn test_length_invariant() {
        let packet = LcpPacket::configure_request(
            3,
            vec![
                LcpOption::mru(1480),
                LcpOption::auth_protocol(0xC023),
                LcpOption::magic_number([1, 2, 3, 4]),
            ],
        );
        assert_eq!(packet.length as usize, 4 + 4 + 4 + 6);
        assert_eq!(packet.to_bytes().len(), packet.length as usize);
        assert_eq!(LcpPacket::from_bytes(&packet.to_bytes()).unwrap(), packet);
    }

    #[test]
    fn test_options_stop_at_declared_length() {
        let mut bytes = peer_configure_request();
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let packet = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(packet.options.configure().len(), 2);
        assert_eq!(packet.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_declared_length_past_buffer() {
        let mut bytes = peer_configure_request();
        bytes[3] = 0x20;
        assert!(matches!(
            LcpPacket::from_bytes(&bytes),
            Err(Error::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_option_length_past_region() {
        let bytes = vec![0x01, 0x01, 0x00, 0x08, 0x05, 0x06, 0x12, 0x34];
        assert!(matches!(
            LcpPacket::from_bytes(&bytes),
            Err(Error::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_option_length_below_header() {
        let bytes = vec![0x01, 0x01, 0x00, 0x06, 0x05, 0x01];
        assert!(matches!(
            LcpPacket::from_bytes(&bytes),
            Err(Error::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_declared_length_below_header() {
        let bytes = vec![0x01, 0x01, 0x00, 0x02];
        assert!(LcpPacket::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_empty_configure_ack() {
        let packet = LcpPacket::configure_ack(9, vec![]);
        let bytes = packet.to_bytes();
        assert_eq!(bytes, vec![0x02, 0x09, 0x00, 0x04]);

        let decoded = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.options, LcpOptions::Configure(vec![]));
    }

    #[test]
    fn test_echo_request_is_header_only() {
        let bytes = vec![0x09, 0x02, 0x00, 0x08, 0xAA, 0xBB, 0xCC, 0xDD];
        let packet = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(packet.code, LcpCode::EchoRequest);
        assert_eq!(packet.options, LcpOptions::None);
        assert_eq!(packet.payload, vec![0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_echo_reply_roundtrip() {
        let packet = LcpPacket::echo_reply(4, 0xCAFEBABE);
        let bytes = packet.to_bytes();
        assert_eq!(bytes, vec![0x0A, 0x04, 0x00, 0x08, 0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(LcpPacket::from_bytes(&bytes).unwrap(), packet);
    }

    #[test]
    fn test_echo_reply_with_data() {
        let bytes = vec![0x0A, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x01, 0x68, 0x69];
        let packet = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(
            packet.options,
            LcpOptions::Echo(EchoOption::new(1, b"hi".to_vec()))
        );
    }

    #[test]
    fn test_echo_reply_missing_magic() {
        let bytes = vec![0x0A, 0x04, 0x00, 0x06, 0x00, 0x00];
        assert!(matches!(
            LcpPacket::from_bytes(&bytes),
            Err(Error::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_terminate_roundtrip() {
        let request = LcpPacket::terminate_request(1);
        assert_eq!(request.to_bytes(), vec![0x05, 0x01, 0x00, 0x04]);
        assert_eq!(LcpPacket::from_bytes(&request.to_bytes()).unwrap(), request);

        let bytes = vec![0x05, 0x02, 0x00, 0x07, b'b', b'y', b'e'];
        let decoded = LcpPacket::from_bytes(&bytes).unwrap();
        assert_eq!(
            decoded.options,
            LcpOptions::Terminate(TerminateOption::new(b"bye".to_vec()))
        );

        let ack = LcpPacket::terminate_ack(2);
        assert_eq!(LcpPacket::from_bytes(&ack.to_bytes()).unwrap(), ack);
    }
}
