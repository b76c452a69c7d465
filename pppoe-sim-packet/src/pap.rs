//! PAP protocol - RFC 1334
//!
//! Password Authentication Protocol. The peer sends its identifier and
//! password in clear text inside an Authenticate-Request.

use bytes::{BufMut, BytesMut};
use pppoe_sim_core::util::{read_slice, read_u16};
use pppoe_sim_core::{Error, Result};

use crate::option::{put_short_string, WireOption};

/// PAP header size (code + identifier + length)
pub const PAP_HEADER_SIZE: usize = 4;

/// PAP packet codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PapCode {
    AuthenticateRequest,
    AuthenticateAck,
    AuthenticateNak,
    Unknown(u8),
}

impl PapCode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Self::AuthenticateRequest,
            0x02 => Self::AuthenticateAck,
            0x03 => Self::AuthenticateNak,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::AuthenticateRequest => 0x01,
            Self::AuthenticateAck => 0x02,
            Self::AuthenticateNak => 0x03,
            Self::Unknown(other) => other,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::AuthenticateRequest => "Authentication Request",
            Self::AuthenticateAck => "Authentication Ack",
            Self::AuthenticateNak => "Authentication Nak",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Peer-ID and password of an Authenticate-Request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PapCredentials {
    pub peer_id: Vec<u8>,
    pub secret: Vec<u8>,
}

impl PapCredentials {
    pub fn new(peer_id: impl Into<Vec<u8>>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            peer_id: peer_id.into(),
            secret: secret.into(),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let id_len = read_slice(data, 0, 1, "PAP peer-id length")?[0] as usize;
        let peer_id = read_slice(data, 1, id_len, "PAP peer-id")?;
        let secret_len = read_slice(data, 1 + id_len, 1, "PAP password length")?[0] as usize;
        let secret = read_slice(data, 2 + id_len, secret_len, "PAP password")?;

        Ok(Self {
            peer_id: peer_id.to_vec(),
            secret: secret.to_vec(),
        })
    }

    /// Peer-ID as text, invalid UTF-8 replaced
    pub fn peer_id_lossy(&self) -> String {
        String::from_utf8_lossy(&self.peer_id).into_owned()
    }

    /// Password as text, invalid UTF-8 replaced
    pub fn secret_lossy(&self) -> String {
        String::from_utf8_lossy(&self.secret).into_owned()
    }
}

impl WireOption for PapCredentials {
    fn encoded_len(&self) -> usize {
        2 + self.peer_id.len() + self.secret.len()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        put_short_string(buffer, &self.peer_id);
        put_short_string(buffer, &self.secret);
    }
}

/// Message of an Authenticate-Ack/Nak
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PapResult {
    pub message: Vec<u8>,
}

impl PapResult {
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let len = read_slice(data, 0, 1, "PAP message length")?[0] as usize;
        let message = read_slice(data, 1, len, "PAP message")?;
        Ok(Self {
            message: message.to_vec(),
        })
    }
}

impl WireOption for PapResult {
    fn encoded_len(&self) -> usize {
        1 + self.message.len()
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        put_short_string(buffer, &self.message);
    }
}

/// Body of a PAP message, shaped by the message code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PapBody {
    Credentials(PapCredentials),
    Result(PapResult),
    Empty,
}

impl PapBody {
    pub fn decode(code: PapCode, region: &[u8]) -> Result<Self> {
        match code {
            PapCode::AuthenticateRequest => {
                Ok(Self::Credentials(PapCredentials::from_bytes(region)?))
            }
            PapCode::AuthenticateNak => Ok(Self::Result(PapResult::from_bytes(region)?)),
            PapCode::AuthenticateAck if !region.is_empty() => {
                Ok(Self::Result(PapResult::from_bytes(region)?))
            }
            PapCode::AuthenticateAck | PapCode::Unknown(_) => Ok(Self::Empty),
        }
    }

    pub fn credentials(&self) -> Option<&PapCredentials> {
        match self {
            Self::Credentials(credentials) => Some(credentials),
            Self::Result(_) | Self::Empty => None,
        }
    }
}

impl WireOption for PapBody {
    fn encoded_len(&self) -> usize {
        match self {
            Self::Credentials(credentials) => credentials.encoded_len(),
            Self::Result(result) => result.encoded_len(),
            Self::Empty => 0,
        }
    }

    fn write_to(&self, buffer: &mut BytesMut) {
        match self {
            Self::Credentials(credentials) => credentials.write_to(buffer),
            Self::Result(result) => result.write_to(buffer),
            Self::Empty => {}
        }
    }
}

/// PAP packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PapPacket {
    pub code: PapCode,
    pub identifier: u8,
    pub length: u16,
    pub body: PapBody,
    /// Bytes following the body
    pub payload: Vec<u8>,
}

impl PapPacket {
    pub fn new(code: PapCode, identifier: u8, body: PapBody) -> Self {
        let length = (PAP_HEADER_SIZE + body.encoded_len()) as u16;
        Self {
            code,
            identifier,
            length,
            body,
            payload: Vec::new(),
        }
    }

    pub fn authenticate_request(identifier: u8, credentials: PapCredentials) -> Self {
        Self::new(
            PapCode::AuthenticateRequest,
            identifier,
            PapBody::Credentials(credentials),
        )
    }

    /// Authenticate-Ack carrying an empty message
    pub fn authenticate_ack(identifier: u8) -> Self {
        Self::new(
            PapCode::AuthenticateAck,
            identifier,
            PapBody::Result(PapResult::default()),
        )
    }

    pub fn authenticate_nak(identifier: u8, message: impl Into<Vec<u8>>) -> Self {
        Self::new(
            PapCode::AuthenticateNak,
            identifier,
            PapBody::Result(PapResult::new(message)),
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(
            PAP_HEADER_SIZE + self.body.encoded_len() + self.payload.len(),
        );
        buffer.put_u8(self.code.to_u8());
        buffer.put_u8(self.identifier);
        buffer.put_u16(self.length);
        self.body.write_to(&mut buffer);
        buffer.put_slice(&self.payload);
        buffer.to_vec()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = read_slice(data, 0, PAP_HEADER_SIZE, "PAP header")?;
        let code = PapCode::from_u8(header[0]);
        let identifier = header[1];
        let length = read_u16(data, 2, "PAP header")?;

        if (length as usize) < PAP_HEADER_SIZE {
            return Err(Error::truncated(
                "PAP length",
                PAP_HEADER_SIZE,
                length as usize,
            ));
        }

        let region = read_slice(
            data,
            PAP_HEADER_SIZE,
            length as usize - PAP_HEADER_SIZE,
            "PAP body",
        )?;
        let body = PapBody::decode(code, region)?;
        let consumed = PAP_HEADER_SIZE + body.encoded_len();

        Ok(Self {
            code,
            identifier,
            length,
            body,
            payload: data[consumed..].to_vec(),
        })
    }
}
