use super::{Extension, ExtensionType, Random, SessionId};
use crate::buffer::Buf;
use crate::types::{CipherSuite, ProtocolVersion};
use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::{be_u16, be_u8};
use nom::{Err, IResult};

/// Magic random value indicating HelloRetryRequest (RFC 8446 Section 4.1.3).
pub const HRR_RANDOM: [u8; 32] = [
    0xCF, 0x21, 0xAD, 0x74, 0xE5, 0x9A, 0x61, 0x11, 0xBE, 0x1D, 0x8C, 0x02, 0x1E, 0x65, 0xB8, 0x91,
    0xC2, 0xA2, 0x11, 0x16, 0x7A, 0xBB, 0x8C, 0x5E, 0x07, 0x9E, 0x09, 0xE2, 0xC8, 0xA8, 0x33, 0x9C,
];

/// ServerHello body. A HelloRetryRequest is a ServerHello carrying [`HRR_RANDOM`].
#[derive(Debug, PartialEq, Eq)]
pub struct ServerHello {
    pub legacy_version: ProtocolVersion,
    pub random: Random,
    pub legacy_session_id_echo: SessionId,
    pub cipher_suite: CipherSuite,
    pub legacy_compression_method: u8,
    pub extensions: Vec<Extension>,
}

impl ServerHello {
    pub fn hello_retry_request(
        legacy_session_id_echo: SessionId,
        cipher_suite: CipherSuite,
        extensions: Vec<Extension>,
    ) -> Self {
        ServerHello {
            legacy_version: ProtocolVersion::TLS1_2,
            random: Random { bytes: HRR_RANDOM },
            legacy_session_id_echo,
            cipher_suite,
            legacy_compression_method: 0,
            extensions,
        }
    }

    pub fn is_hello_retry_request(&self) -> bool {
        self.random.bytes == HRR_RANDOM
    }

    pub fn extension(&self, extension_type: ExtensionType) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.extension_type == extension_type)
    }

    pub fn parse(input: &[u8], base_offset: usize) -> IResult<&[u8], ServerHello> {
        let original_input = input;
        let (input, legacy_version) = ProtocolVersion::parse(input)?;
        let (input, random) = Random::parse(input)?;
        let (input, legacy_session_id_echo) = SessionId::parse(input)?;
        let (input, cipher_suite) = CipherSuite::parse(input)?;
        let (input, legacy_compression_method) = be_u8(input)?;

        let (input, extensions_len) = be_u16(input)?;
        let (rest, input_ext) = take(extensions_len)(input)?;
        if !rest.is_empty() {
            return Err(Err::Failure(Error::new(rest, ErrorKind::LengthValue)));
        }

        let consumed = input_ext.as_ptr() as usize - original_input.as_ptr() as usize;
        let mut current_offset = base_offset + consumed;
        let mut current_input = input_ext;
        let mut extensions = Vec::new();
        while !current_input.is_empty() {
            let before_len = current_input.len();
            let (new_rest, ext) = Extension::parse(current_input, current_offset)?;
            current_offset += before_len - new_rest.len();
            extensions.push(ext);
            current_input = new_rest;
        }

        Ok((
            rest,
            ServerHello {
                legacy_version,
                random,
                legacy_session_id_echo,
                cipher_suite,
                legacy_compression_method,
                extensions,
            },
        ))
    }

    pub fn serialize(&self, source_buf: &[u8], output: &mut Buf) {
        self.legacy_version.serialize(output);
        self.random.serialize(output);
        self.legacy_session_id_echo.serialize(output);
        self.cipher_suite.serialize(output);
        output.push(self.legacy_compression_method);

        let extensions_len: usize = self
            .extensions
            .iter()
            .map(|ext| 2 + 2 + ext.extension_data(source_buf).len())
            .sum();
        output.extend_from_slice(&(extensions_len as u16).to_be_bytes());

        for ext in &self.extensions {
            ext.serialize(source_buf, output);
        }
    }
}
