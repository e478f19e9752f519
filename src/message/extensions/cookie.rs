//! Cookie extension (RFC 8446 Section 4.2.2)
//!
//! The server puts a cookie in its HelloRetryRequest and the client echoes it
//! verbatim in the retried ClientHello. The cookie is opaque to the client.

use crate::buffer::Buf;
use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::be_u16;
use nom::{Err, IResult};
use std::ops::Range;

/// Cookie extension data.
///
/// In HelloRetryRequest: server sends a cookie to the client.
/// In ClientHello (retry): client echoes the cookie back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieExtension {
    /// Range into the source buffer containing the cookie bytes.
    pub cookie_range: Range<usize>,
}

impl CookieExtension {
    /// Get the cookie bytes from a buffer.
    pub fn cookie<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.cookie_range.clone()]
    }

    /// Parse the extension data. `cookie<1..2^16-1>`
    pub fn parse(input: &[u8], base_offset: usize) -> IResult<&[u8], Self> {
        let (input, cookie_len) = be_u16(input)?;
        if cookie_len == 0 {
            return Err(Err::Failure(Error::new(input, ErrorKind::LengthValue)));
        }
        let (input, _cookie_bytes) = take(cookie_len)(input)?;

        // Cookie data starts after the 2-byte length
        let cookie_start = base_offset + 2;
        let cookie_range = cookie_start..(cookie_start + cookie_len as usize);

        Ok((input, Self { cookie_range }))
    }

    /// Serialize a cookie directly from bytes.
    pub fn serialize_from_bytes(cookie: &[u8], output: &mut Buf) {
        output.extend_from_slice(&(cookie.len() as u16).to_be_bytes());
        output.extend_from_slice(cookie);
    }
}
