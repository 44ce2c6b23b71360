//! Object identifier (SHA-1 digest)
//!
//! Object ids are 40-character lowercase hexadecimal strings. They identify blobs by their
//! content and commits by their message, timestamp and file map.
//!
//! ## Storage
//!
//! Objects are stored in `<shelf>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::{RepositoryError, Result};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId, or `Corrupt` if the length or characters are wrong
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(RepositoryError::corrupt(format!(
                "invalid object id length: {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::corrupt(format!(
                "invalid object id characters: {id}"
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether `candidate` has the shape of a full object id
    pub fn is_full_hex(candidate: &str) -> bool {
        candidate.len() == OBJECT_ID_LENGTH && candidate.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Digest arbitrary bytes into an object id
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Write the object id in binary format (20 bytes)
    ///
    /// Used by the staging index, which stores ids packed.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| RepositoryError::corrupt("invalid hex digit in object id"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object id from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut bytes)?;

        let hex40 = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        Self::try_parse(hex40)
    }

    /// Convert to file system path for object storage
    ///
    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    #[test]
    fn digest_is_deterministic_and_content_sensitive() {
        assert_eq!(ObjectId::digest(b"hello"), ObjectId::digest(b"hello"));
        assert_ne!(ObjectId::digest(b"hello"), ObjectId::digest(b"hello\n"));
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(ObjectId::try_parse("abc".to_string()).is_err());
        assert!(ObjectId::try_parse("z".repeat(OBJECT_ID_LENGTH)).is_err());
    }

    #[test]
    fn splits_into_fan_out_path() {
        let oid = ObjectId::digest(b"content");
        let path = oid.to_path();

        assert_eq!(path.parent().unwrap().to_string_lossy(), &oid.as_ref()[..2]);
        assert_eq!(oid.to_short_oid().len(), 7);
    }

    proptest! {
        #[test]
        fn packed_form_reads_back(content in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
            let oid = ObjectId::digest(&content);
            let mut packed = Vec::new();
            oid.write_h40_to(&mut packed).unwrap();

            assert_eq!(packed.len(), OBJECT_ID_LENGTH / 2);
            assert_eq!(ObjectId::read_h40_from(&mut packed.as_slice()).unwrap(), oid);
        }
    }
}
