use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::{RepositoryError, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) marker: String,
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn empty() -> Self {
        IndexHeader {
            marker: String::from(SIGNATURE),
            version: VERSION,
            entries_count: 0,
        }
    }

    pub(crate) fn serialize(&self) -> Result<Bytes> {
        // pack!(self.marker, self.version, self.entries_count => "a4N2")
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(self.marker.as_bytes());
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }

    pub(crate) fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(RepositoryError::corrupt("index header is truncated"));
        }

        let marker = String::from_utf8(bytes[0..4].to_vec())
            .map_err(|_| RepositoryError::corrupt("invalid marker in index header"))?;
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_layout_is_network_order() {
        let header = IndexHeader::new(SIGNATURE.to_string(), VERSION, 3);
        let bytes = header.serialize().unwrap();

        assert_eq!(&bytes[..], b"MIDX\0\0\0\x01\0\0\0\x03");
        assert_eq!(IndexHeader::deserialize(&bytes).unwrap(), header);
    }
}
