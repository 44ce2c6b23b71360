use crate::errors::{RepositoryError, Result};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<type> <size>\0` framing and return the type and declared size
    pub fn parse_header(data_reader: &mut impl BufRead) -> Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;

        let object_type = String::from_utf8(object_type)
            .map_err(|_| RepositoryError::corrupt("object type is not valid UTF-8"))?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        size.pop();

        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| RepositoryError::corrupt("object header has an invalid size"))?;

        Ok((ObjectType::try_from(object_type.trim())?, size))
    }

    pub fn header(&self, size: usize) -> String {
        format!("{} {}\0", self.as_str(), size)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = RepositoryError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            other => Err(RepositoryError::corrupt(format!(
                "invalid object type '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
