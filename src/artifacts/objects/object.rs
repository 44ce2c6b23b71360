use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;
use std::io::BufRead;
use std::path::PathBuf;

pub trait Packable {
    /// Full on-disk form, framing header included
    fn serialize(&self) -> Bytes;
}

pub trait Unpackable {
    /// Parse an object whose framing header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Bytes the object id is computed over
    ///
    /// Defaults to the serialized form; commits narrow it down to their identity fields.
    fn identity(&self) -> Bytes {
        self.serialize()
    }

    fn object_id(&self) -> ObjectId {
        ObjectId::digest(&self.identity())
    }

    fn object_path(&self) -> PathBuf {
        self.object_id().to_path()
    }
}

/// Prefix `content` with the `<type> <size>\0` framing header
pub fn frame(object_type: ObjectType, content: &[u8]) -> Bytes {
    let mut framed = object_type.header(content.len()).into_bytes();
    framed.extend_from_slice(content);

    Bytes::from(framed)
}
