//! Blob object
//!
//! Blobs store file content and nothing else; the path a blob is bound to lives in the commit
//! file map or the staging index.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    #[new(into)]
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Bytes {
        frame(self.object_type(), &self.content)
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
