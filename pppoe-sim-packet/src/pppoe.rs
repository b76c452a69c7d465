//! PPPoE Packet Structures - RFC 2516

use bytes::{BufMut, BytesMut};
use pppoe_sim_core::util::{read_slice, read_u16};
use pppoe_sim_core::{Error, Result};

pub const PPPOE_VERSION: u8 = 1;
pub const PPPOE_TYPE: u8 = 1;
pub const PPPOE_HEADER_SIZE: usize = 6;

/// Empty Service-Name tag written ahead of the tags of an offer
pub const SERVICE_NAME_ANY: [u8; 4] = [0x01, 0x01, 0x00, 0x00];

/// PPPoE Discovery/Session Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PppoeCode {
    /// PADI - PPPoE Active Discovery Initiation (client broadcast)
    PADI,
    /// PADO - PPPoE Active Discovery Offer (server unicast)
    PADO,
    /// PADR - PPPoE Active Discovery Request (client unicast)
    PADR,
    /// PADS - PPPoE Active Discovery Session-confirmation (server unicast)
    PADS,
    /// PADT - PPPoE Active Discovery Terminate (either party)
    PADT,
    /// Session data packet
    SessionData,
    /// Code this implementation does not know
    Unknown(u8),
}

impl PppoeCode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x09 => Self::PADI,
            0x07 => Self::PADO,
            0x19 => Self::PADR,
            0x65 => Self::PADS,
            0xA7 => Self::PADT,
            0x00 => Self::SessionData,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::PADI => 0x09,
            Self::PADO => 0x07,
            Self::PADR => 0x19,
            Self::PADS => 0x65,
            Self::PADT => 0xA7,
            Self::SessionData => 0x00,
            Self::Unknown(other) => other,
        }
    }

    /// Human readable name, as printed in the exchange log
    pub fn describe(self) -> &'static str {
        match self {
            Self::PADI => "Active Discovery Initiation (PADI)",
            Self::PADO => "Active Discovery Offer (PADO)",
            Self::PADR => "Active Discovery Request (PADR)",
            Self::PADS => "Active Discovery Session-confirmation (PADS)",
            Self::PADT => "Active Discovery Terminate (PADT)",
            Self::SessionData => "Session",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// PPPoE Tag Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PppoeTagType {
    EndOfList,
    ServiceName,
    ACName,   // Access Concentrator Name
    HostUniq, // Host unique identifier
    ACCookie,
    VendorSpecific,
    RelaySessionId,
    ServiceNameError,
    ACSystemError,
    GenericError,
    Custom(u16),
}

impl PppoeTagType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => Self::EndOfList,
            0x0101 => Self::ServiceName,
            0x0102 => Self::ACName,
            0x0103 => Self::HostUniq,
            0x0104 => Self::ACCookie,
            0x0105 => Self::VendorSpecific,
            0x0110 => Self::RelaySessionId,
            0x0201 => Self::ServiceNameError,
            0x0202 => Self::ACSystemError,
            0x0203 => Self::GenericError,
            other => Self::Custom(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::EndOfList => 0x0000,
            Self::ServiceName => 0x0101,
            Self::ACName => 0x0102,
            Self::HostUniq => 0x0103,
            Self::ACCookie => 0x0104,
            Self::VendorSpecific => 0x0105,
            Self::RelaySessionId => 0x0110,
            Self::ServiceNameError => 0x0201,
            Self::ACSystemError => 0x0202,
            Self::GenericError => 0x0203,
            Self::Custom(other) => other,
        }
    }
}

/// PPPoE Tag (TLV structure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PppoeTag {
    pub tag_type: PppoeTagType,
    pub value: Vec<u8>,
}

impl PppoeTag {
    pub const HEADER_SIZE: usize = 4;

    pub fn new(tag_type: PppoeTagType, value: Vec<u8>) -> Self {
        Self { tag_type, value }
    }

    pub fn service_name(name: &str) -> Self {
        Self::new(PppoeTagType::ServiceName, name.as_bytes().to_vec())
    }

    pub fn ac_name(name: &str) -> Self {
        Self::new(PppoeTagType::ACName, name.as_bytes().to_vec())
    }

    pub fn host_uniq(data: Vec<u8>) -> Self {
        Self::new(PppoeTagType::HostUniq, data)
    }

    pub fn ac_cookie(data: Vec<u8>) -> Self {
        Self::new(PppoeTagType::ACCookie, data)
    }

    /// Encoded size of the tag (header + value)
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_SIZE + self.value.len()
    }

    /// Encode tag to bytes (Type + Length + Value)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(self.encoded_len());
        self.write_to(&mut buffer);
        buffer.to_vec()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        buffer.put_u16(self.tag_type.to_u16());
        buffer.put_u16(self.value.len() as u16);
        buffer.put_slice(&self.value);
    }

    /// Parse one tag, returning it with the number of bytes consumed
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        let tag_type = PppoeTagType::from_u16(read_u16(data, 0, "PPPoE tag header")?);
        let length = read_u16(data, 2, "PPPoE tag header")? as usize;
        let value = read_slice(data, Self::HEADER_SIZE, length, "PPPoE tag value")?;

        Ok((
            Self {
                tag_type,
                value: value.to_vec(),
            },
            Self::HEADER_SIZE + length,
        ))
    }

    /// Parse a flat tag list until the buffer is exhausted
    pub fn parse_all(data: &[u8]) -> Result<Vec<Self>> {
        let mut tags = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (tag, consumed) = Self::from_bytes(&data[offset..])?;
            tags.push(tag);
            offset += consumed;
        }
        Ok(tags)
    }

    /// Encode a tag list back to back
    pub fn encode_all(tags: &[Self]) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(tags.iter().map(Self::encoded_len).sum());
        for tag in tags {
            tag.write_to(&mut buffer);
        }
        buffer.to_vec()
    }

    /// Find the first tag of the given type
    pub fn find(tags: &[Self], tag_type: PppoeTagType) -> Option<&Self> {
        tags.iter().find(|t| t.tag_type == tag_type)
    }
}

/// Tag payload of an offer: the empty Service-Name prefix followed by tags
pub struct OfferTags;

impl OfferTags {
    /// Encode tags behind the fixed Service-Name prefix
    pub fn encode(tags: &[PppoeTag]) -> Vec<u8> {
        let mut payload = SERVICE_NAME_ANY.to_vec();
        payload.extend_from_slice(&PppoeTag::encode_all(tags));
        payload
    }

    /// Decode the tags that follow the fixed 4-byte prefix
    pub fn decode(payload: &[u8]) -> Result<Vec<PppoeTag>> {
        if payload.len() < SERVICE_NAME_ANY.len() {
            return Err(Error::truncated(
                "PADO tag prefix",
                SERVICE_NAME_ANY.len(),
                payload.len(),
            ));
        }
        PppoeTag::parse_all(&payload[SERVICE_NAME_ANY.len()..])
    }
}

/// PPPoE Packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PppoePacket {
    /// Version (always 1) and Type (always 1)
    pub version: u8,
    pub pppoe_type: u8,
    /// Code (PADI, PADO, PADR, PADS, PADT, or 0x00 for session)
    pub code: PppoeCode,
    /// Session ID (0x0000 during discovery, assigned by PADS)
    pub session_id: u16,
    /// Declared payload length
    pub length: u16,
    /// Tag bytes (discovery) or PPP frame (session)
    pub payload: Vec<u8>,
}

impl PppoePacket {
    /// Create a packet whose declared length is the payload length
    pub fn new(code: PppoeCode, session_id: u16, payload: Vec<u8>) -> Self {
        let length = payload.len() as u16;
        Self::with_length(code, session_id, length, payload)
    }

    /// Create a packet with an explicitly declared length
    pub fn with_length(code: PppoeCode, session_id: u16, length: u16, payload: Vec<u8>) -> Self {
        Self {
            version: PPPOE_VERSION,
            pppoe_type: PPPOE_TYPE,
            code,
            session_id,
            length,
            payload,
        }
    }

    /// Encode packet to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(PPPOE_HEADER_SIZE + self.payload.len());

        // Version (4 bits) and Type (4 bits)
        buffer.put_u8((self.version << 4) | (self.pppoe_type & 0x0F));
        buffer.put_u8(self.code.to_u8());
        buffer.put_u16(self.session_id);
        buffer.put_u16(self.length);
        buffer.put_slice(&self.payload);

        buffer.to_vec()
    }

    /// Parse packet from bytes; bytes past the declared length are dropped
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < PPPOE_HEADER_SIZE {
            return Err(Error::truncated(
                "PPPoE header",
                PPPOE_HEADER_SIZE,
                data.len(),
            ));
        }

        let version = (data[0] >> 4) & 0x0F;
        let pppoe_type = data[0] & 0x0F;
        let code = PppoeCode::from_u8(data[1]);
        let session_id = read_u16(data, 2, "PPPoE header")?;
        let length = read_u16(data, 4, "PPPoE header")?;
        let payload = read_slice(data, PPPOE_HEADER_SIZE, length as usize, "PPPoE payload")?;

        Ok(Self {
            version,
            pppoe_type,
            code,
            session_id,
            length,
            payload: payload.to_vec(),
        })
    }

    /// Check if this is a session packet
    pub fn is_session(&self) -> bool {
        self.code == PppoeCode::SessionData
    }
}
