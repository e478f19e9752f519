use super::extensions::cookie::CookieExtension;
use super::extensions::key_share::KeyShareClientHello;
use super::extensions::supported_groups::SupportedGroupsExtension;
use super::extensions::supported_versions::SupportedVersionsClientHello;
use super::handshake::{Header, HANDSHAKE_HEADER_LEN};
use super::record::read_handshake_records;
use super::{Extension, ExtensionType, Random, SessionId};
use nom::bytes::complete::take;
use nom::error::{Error as NomError, ErrorKind};
use nom::number::complete::{be_u16, be_u8};
use nom::{Err, IResult};

use crate::buffer::Buf;
use crate::types::{CipherSuite, MessageType, ProtocolVersion};
use crate::Error;

#[derive(Debug, PartialEq, Eq)]
pub struct ClientHello {
    pub legacy_version: ProtocolVersion,
    pub random: Random,
    pub legacy_session_id: SessionId,
    pub cipher_suites: Vec<CipherSuite>,
    pub legacy_compression_methods: Vec<u8>,
    pub extensions: Vec<Extension>,
}

impl ClientHello {
    pub fn parse(input: &[u8], base_offset: usize) -> IResult<&[u8], ClientHello> {
        let original_input = input;
        let (input, legacy_version) = ProtocolVersion::parse(input)?;
        let (input, random) = Random::parse(input)?;
        let (input, legacy_session_id) = SessionId::parse(input)?;

        let (input, cipher_suites_len) = be_u16(input)?;
        if cipher_suites_len < 2 || cipher_suites_len % 2 != 0 {
            return Err(Err::Failure(NomError::new(input, ErrorKind::LengthValue)));
        }
        let (input, mut input_cipher) = take(cipher_suites_len)(input)?;
        let mut cipher_suites = Vec::with_capacity(cipher_suites_len as usize / 2);
        while !input_cipher.is_empty() {
            let (rest, suite) = CipherSuite::parse(input_cipher)?;
            cipher_suites.push(suite);
            input_cipher = rest;
        }

        let (input, compression_methods_len) = be_u8(input)?;
        if compression_methods_len == 0 {
            return Err(Err::Failure(NomError::new(input, ErrorKind::LengthValue)));
        }
        let (input, compression) = take(compression_methods_len)(input)?;
        let legacy_compression_methods = compression.to_vec();

        let consumed = input.as_ptr() as usize - original_input.as_ptr() as usize;
        let extensions_base_offset = base_offset + consumed;

        let (remaining_input, extensions) = Self::parse_extensions(input, extensions_base_offset)?;

        Ok((
            remaining_input,
            ClientHello {
                legacy_version,
                random,
                legacy_session_id,
                cipher_suites,
                legacy_compression_methods,
                extensions,
            },
        ))
    }

    fn parse_extensions(input: &[u8], base_offset: usize) -> IResult<&[u8], Vec<Extension>> {
        let mut extensions: Vec<Extension> = Vec::new();

        // Pre TLS 1.3 clients may omit the block entirely.
        if input.is_empty() {
            return Ok((input, extensions));
        }

        let original_input = input;
        let (remaining, extensions_len) = be_u16(input)?;
        let (remaining, extensions_data) = take(extensions_len)(remaining)?;

        let consumed = extensions_data.as_ptr() as usize - original_input.as_ptr() as usize;
        let mut current_offset = base_offset + consumed;

        // RFC 8446 Section 4.2: at most one extension of each type.
        // One bit per possible type keeps the check linear in the block size.
        let mut seen = [0u64; 1024];

        let mut extensions_rest = extensions_data;
        while !extensions_rest.is_empty() {
            let before_len = extensions_rest.len();
            let (rest, extension) = Extension::parse(extensions_rest, current_offset)?;
            current_offset += before_len - rest.len();

            let t = extension.extension_type.as_u16() as usize;
            let (word, bit) = (t / 64, 1u64 << (t % 64));
            if seen[word] & bit != 0 {
                return Err(Err::Failure(NomError::new(
                    extensions_rest,
                    ErrorKind::Verify,
                )));
            }
            seen[word] |= bit;

            extensions.push(extension);
            extensions_rest = rest;
        }

        Ok((remaining, extensions))
    }

    pub fn extension(&self, extension_type: ExtensionType) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.extension_type == extension_type)
    }

}

/// A ClientHello read from the wire, together with the bytes its ranges index.
#[derive(Debug)]
pub struct ClientHelloMessage {
    payload: Buf,
    client_hello: ClientHello,
}

impl ClientHelloMessage {
    /// Read exactly one ClientHello from one or more plaintext handshake records.
    pub fn read(records: &[u8]) -> Result<ClientHelloMessage, Error> {
        let payload = read_handshake_records(records)?;

        let (body, header) = Header::parse(&payload)?;
        if header.msg_type != MessageType::ClientHello {
            return Err(Error::Malformed(format!(
                "expected ClientHello, got {:?}",
                header.msg_type
            )));
        }
        let length = header.length as usize;
        if body.len() < length {
            return Err(Error::Malformed(format!(
                "truncated ClientHello: {} of {} bytes",
                body.len(),
                length
            )));
        }
        if body.len() > length {
            return Err(Error::Malformed(
                "data after ClientHello".to_string(),
            ));
        }

        let (rest, client_hello) = ClientHello::parse(body, HANDSHAKE_HEADER_LEN)?;
        if !rest.is_empty() {
            return Err(Error::Malformed(format!(
                "{} bytes after ClientHello extensions",
                rest.len()
            )));
        }

        Ok(ClientHelloMessage {
            payload,
            client_hello,
        })
    }

    pub fn client_hello(&self) -> &ClientHello {
        &self.client_hello
    }

    fn extension_data(&self, extension_type: ExtensionType) -> Option<(&[u8], usize)> {
        self.client_hello.extension(extension_type).map(|ext| {
            (
                ext.extension_data(&self.payload),
                ext.extension_data_range.start,
            )
        })
    }

    /// The echoed cookie, if the client sent one.
    pub fn cookie(&self) -> Result<Option<&[u8]>, Error> {
        let Some((data, offset)) = self.extension_data(ExtensionType::Cookie) else {
            return Ok(None);
        };
        let (rest, ext) = CookieExtension::parse(data, offset)?;
        expect_consumed(rest, "cookie")?;
        Ok(Some(ext.cookie(&self.payload)))
    }

    pub fn supported_versions(&self) -> Result<Option<SupportedVersionsClientHello>, Error> {
        let Some((data, _)) = self.extension_data(ExtensionType::SupportedVersions) else {
            return Ok(None);
        };
        let (rest, ext) = SupportedVersionsClientHello::parse(data)?;
        expect_consumed(rest, "supported_versions")?;
        Ok(Some(ext))
    }

    pub fn supported_groups(&self) -> Result<Option<SupportedGroupsExtension>, Error> {
        let Some((data, _)) = self.extension_data(ExtensionType::SupportedGroups) else {
            return Ok(None);
        };
        let (rest, ext) = SupportedGroupsExtension::parse(data)?;
        expect_consumed(rest, "supported_groups")?;
        Ok(Some(ext))
    }

    pub fn key_share(&self) -> Result<Option<KeyShareClientHello>, Error> {
        let Some((data, offset)) = self.extension_data(ExtensionType::KeyShare) else {
            return Ok(None);
        };
        let (rest, ext) = KeyShareClientHello::parse(data, offset)?;
        expect_consumed(rest, "key_share")?;
        Ok(Some(ext))
    }
}

fn expect_consumed(rest: &[u8], name: &str) -> Result<(), Error> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::Malformed(format!(
            "{} trailing bytes in {} extension",
            rest.len(),
            name
        )))
    }
}
