use crate::types::NamedGroup;
use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::be_u16;
use nom::{Err, IResult};

/// SupportedGroups extension (RFC 8446 Section 4.2.7).
///
/// Groups are kept in the client's order, unknown values included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupportedGroupsExtension {
    pub groups: Vec<NamedGroup>,
}

impl SupportedGroupsExtension {
    pub fn parse(input: &[u8]) -> IResult<&[u8], SupportedGroupsExtension> {
        let (input, list_len) = be_u16(input)?;
        if list_len % 2 != 0 {
            return Err(Err::Failure(Error::new(input, ErrorKind::LengthValue)));
        }
        let (input, mut data) = take(list_len)(input)?;

        let mut groups = Vec::with_capacity(list_len as usize / 2);
        while !data.is_empty() {
            let (rest, group) = NamedGroup::parse(data)?;
            groups.push(group);
            data = rest;
        }

        Ok((input, SupportedGroupsExtension { groups }))
    }
}
