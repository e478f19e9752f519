use nom::number::complete::be_u24;
use nom::IResult;

use crate::buffer::Buf;
use crate::types::MessageType;

/// Handshake header length.
pub const HANDSHAKE_HEADER_LEN: usize = 4;

/// Handshake message header (RFC 8446 Section 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub msg_type: MessageType,
    pub length: u32,
}

impl Header {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Header> {
        let (input, msg_type) = MessageType::parse(input)?;
        let (input, length) = be_u24(input)?;
        Ok((input, Header { msg_type, length }))
    }

    pub fn serialize(&self, output: &mut Buf) {
        output.push(self.msg_type.as_u8());
        output.extend_from_slice(&self.length.to_be_bytes()[1..]);
    }
}

/// Write one handshake message, filling in the length once `body` has run.
pub fn write_handshake<F>(msg_type: MessageType, output: &mut Buf, body: F)
where
    F: FnOnce(&mut Buf),
{
    let start = output.len();
    Header {
        msg_type,
        length: 0,
    }
    .serialize(output);

    let body_start = output.len();
    body(output);
    let length = (output.len() - body_start) as u32;

    output.set_u24(start + 1, length);
}
