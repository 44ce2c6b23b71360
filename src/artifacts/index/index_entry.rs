//! Staging index entry
//!
//! Each entry binds a repository-relative path (always `/`-separated) to the blob id of the
//! content staged for it.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;

/// Maximum path length supported in index entries
pub const MAX_PATH_SIZE: usize = u16::MAX as usize;

/// Size of the fixed part of an entry: packed id plus path length
pub const ENTRY_FIXED_SIZE: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to the repository root
    pub path: String,
    /// Id of the staged blob
    pub oid: ObjectId,
}

impl IndexEntry {
    pub(crate) fn serialize(&self) -> Result<Bytes> {
        if self.path.len() > MAX_PATH_SIZE {
            return Err(RepositoryError::corrupt(format!(
                "path too long for the staging index: {}",
                self.path
            )));
        }

        let mut bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + self.path.len());
        self.oid.write_h40_to(&mut bytes)?;
        bytes.write_u16::<byteorder::NetworkEndian>(self.path.len() as u16)?;
        bytes.extend_from_slice(self.path.as_bytes());

        Ok(Bytes::from(bytes))
    }

    /// Length of the path that follows the fixed part of an entry
    pub(crate) fn path_len(fixed: &[u8]) -> usize {
        byteorder::NetworkEndian::read_u16(&fixed[20..ENTRY_FIXED_SIZE]) as usize
    }

    pub(crate) fn deserialize(fixed: &[u8], path: &[u8]) -> Result<Self> {
        let oid = ObjectId::read_h40_from(&mut &fixed[..20])?;
        let path = String::from_utf8(path.to_vec())
            .map_err(|_| RepositoryError::corrupt("index entry path is not valid UTF-8"))?;

        Ok(IndexEntry { path, oid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_reads_back_from_its_parts() {
        let entry = IndexEntry::new("dir/file name.txt".to_string(), ObjectId::digest(b"x"));
        let bytes = entry.serialize().unwrap();

        let (fixed, path) = bytes.split_at(ENTRY_FIXED_SIZE);
        assert_eq!(IndexEntry::path_len(fixed), path.len());
        assert_eq!(IndexEntry::deserialize(fixed, path).unwrap(), entry);
    }
}
