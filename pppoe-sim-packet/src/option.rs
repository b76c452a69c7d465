//! Shared option capability for LCP and PAP messages
//!
//! Each message keeps its option region as a variant type chosen by the
//! message code; every concrete shape implements [`WireOption`] so length
//! computation and serialization go through one path.

use bytes::{BufMut, BytesMut};

/// A serializable option carried after an LCP or PAP header
pub trait WireOption {
    /// Number of bytes [`WireOption::to_bytes`] produces
    fn encoded_len(&self) -> usize;

    /// Append the wire representation to `buffer`
    fn write_to(&self, buffer: &mut BytesMut);

    /// Wire representation of the option
    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(self.encoded_len());
        self.write_to(&mut buffer);
        buffer.to_vec()
    }
}

/// Sum of the encoded lengths of a list of options
pub fn options_len<O: WireOption>(options: &[O]) -> usize {
    options.iter().map(WireOption::encoded_len).sum()
}

/// Length-prefixed byte string (1-byte length), as used by PAP fields
pub(crate) fn put_short_string(buffer: &mut BytesMut, value: &[u8]) {
    buffer.put_u8(value.len() as u8);
    buffer.put_slice(value);
}
