//! Primitive helpers: big-endian field access, nonces and clock formatting

use chrono::{DateTime, Local};
use rand::{Rng, RngCore};

use crate::{Error, Result};

/// Format used for wall-clock timestamps (`HH:MM:SS.mmm`)
pub const CLOCK_FORMAT: &str = "%H:%M:%S%.3f";

/// Generate `n` bytes from a non-cryptographic random source
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a random 32-bit value
pub fn random_u32() -> u32 {
    rand::thread_rng().gen()
}

/// Read a big-endian u16 at `offset`
pub fn read_u16(data: &[u8], offset: usize, context: &'static str) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or_else(|| Error::truncated(context, offset + 2, data.len()))?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Read a big-endian u32 at `offset`
pub fn read_u32(data: &[u8], offset: usize, context: &'static str) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or_else(|| Error::truncated(context, offset + 4, data.len()))?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Borrow `len` bytes at `offset`, failing with `TruncatedFrame` past the end
pub fn read_slice<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    context: &'static str,
) -> Result<&'a [u8]> {
    data.get(offset..offset + len)
        .ok_or_else(|| Error::truncated(context, offset + len, data.len()))
}

/// Format a timestamp as `HH:MM:SS.mmm`
pub fn clock_time(time: &DateTime<Local>) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Current local time as `HH:MM:SS.mmm`
pub fn clock_now() -> String {
    clock_time(&Local::now())
}
