//! Plaintext TLS records (RFC 8446 Section 5.1).
//!
//! The first flight is never protected, so this is all the record layer the
//! retry path needs: read the ClientHello out of one or more handshake records,
//! and frame the HelloRetryRequest for transmission.

use crate::buffer::Buf;
use crate::types::{ContentType, ProtocolVersion};
use crate::Error;
use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;

/// Record header length.
pub const RECORD_HEADER_LEN: usize = 5;

/// Maximum plaintext fragment length (2^14).
pub const MAX_FRAGMENT_LEN: usize = 16_384;

#[derive(Debug, PartialEq, Eq)]
pub struct TlsPlaintext<'a> {
    pub content_type: ContentType,
    pub legacy_record_version: ProtocolVersion,
    pub fragment: &'a [u8],
}

impl<'a> TlsPlaintext<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], TlsPlaintext<'a>> {
        let (input, content_type) = ContentType::parse(input)?;
        let (input, legacy_record_version) = ProtocolVersion::parse(input)?;
        let (input, length) = be_u16(input)?;
        let (input, fragment) = take(length as usize)(input)?;

        Ok((
            input,
            TlsPlaintext {
                content_type,
                legacy_record_version,
                fragment,
            },
        ))
    }

    pub fn serialize(&self, output: &mut Buf) {
        output.push(self.content_type.as_u8());
        self.legacy_record_version.serialize(output);
        output.extend_from_slice(&(self.fragment.len() as u16).to_be_bytes());
        output.extend_from_slice(self.fragment);
    }
}

/// Concatenate the fragments of consecutive handshake records.
///
/// Every byte of `input` must belong to a complete handshake record.
pub fn read_handshake_records(mut input: &[u8]) -> Result<Buf, Error> {
    if input.is_empty() {
        return Err(Error::Malformed("no records".to_string()));
    }

    let mut payload = Buf::with_capacity(input.len());
    while !input.is_empty() {
        let (rest, record) = TlsPlaintext::parse(input)?;

        if record.content_type != ContentType::Handshake {
            return Err(Error::Malformed(format!(
                "unexpected content type {}",
                record.content_type
            )));
        }
        if record.fragment.is_empty() {
            return Err(Error::Malformed("empty handshake record".to_string()));
        }
        if record.fragment.len() > MAX_FRAGMENT_LEN {
            return Err(Error::Malformed(format!(
                "record too long: {}",
                record.fragment.len()
            )));
        }

        trace!(
            "Handshake record ({}) with {} bytes",
            record.legacy_record_version,
            record.fragment.len()
        );
        payload.extend_from_slice(record.fragment);
        input = rest;
    }

    Ok(payload)
}

/// Frame `data` into records of at most [`MAX_FRAGMENT_LEN`] bytes.
pub fn write_records(content_type: ContentType, data: &[u8], output: &mut Buf) {
    for chunk in data.chunks(MAX_FRAGMENT_LEN) {
        let record = TlsPlaintext {
            content_type,
            legacy_record_version: ProtocolVersion::TLS1_2,
            fragment: chunk,
        };
        record.serialize(output);
    }
}
