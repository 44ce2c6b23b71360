//! Commit object
//!
//! Commits are immutable snapshots of the tracked files. Unlike trees-of-trees, the snapshot is
//! a flat `path -> blob id` map, kept sorted so serialization is deterministic.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-id>          (0 to 2 lines)
//! timestamp <seconds>
//! file <blob-id> <path>       (one line per tracked path, path order)
//!
//! <commit message>
//! ```
//!
//! The commit id digests everything except the `parent` lines, so it depends only on the
//! message, timestamp and file map.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Snapshot of tracked files, ordered by path
pub type FileMap = BTreeMap<String, ObjectId>;

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "MINIGIT_COMMIT_DATE";

/// Maximum number of parents a commit may have
pub const MAX_PARENTS: usize = 2;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    oid: ObjectId,
    parents: Vec<ObjectId>,
    message: String,
    timestamp: i64,
    files: FileMap,
}

impl Commit {
    pub fn new(parents: Vec<ObjectId>, files: FileMap, message: String, timestamp: i64) -> Self {
        let oid = ObjectId::digest(&Self::identity_bytes(&message, timestamp, &files));

        Commit {
            oid,
            parents,
            message,
            timestamp,
            files,
        }
    }

    fn identity_bytes(message: &str, timestamp: i64, files: &FileMap) -> Bytes {
        frame(
            ObjectType::Commit,
            Self::render_body(&[], message, timestamp, files).as_bytes(),
        )
    }

    fn render_body(parents: &[ObjectId], message: &str, timestamp: i64, files: &FileMap) -> String {
        let mut lines = parents
            .iter()
            .map(|parent| format!("parent {parent}"))
            .collect::<Vec<_>>();

        lines.push(format!("timestamp {timestamp}"));
        lines.extend(files.iter().map(|(path, oid)| format!("file {oid} {path}")));
        lines.push(String::new());
        lines.push(message.to_string());

        lines.join("\n")
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&ObjectId> {
        self.files.get(path)
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|datetime| {
                datetime
                    .fixed_offset()
                    .format("%a %b %-d %H:%M:%S %Y %z")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Whether `path` can be recorded in a commit
///
/// Records are line-oriented, so paths holding control characters (newlines among them) are
/// refused.
pub fn is_recordable_path(path: &str) -> bool {
    !path.is_empty() && !path.chars().any(char::is_control)
}

/// Timestamp for a new commit
///
/// Reads `MINIGIT_COMMIT_DATE` (RFC 2822, `%Y-%m-%d %H:%M:%S %z` or plain seconds since the
/// epoch); falls back to the current time when unset or unparseable.
pub fn commit_timestamp() -> i64 {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date| parse_commit_date(&date))
        .unwrap_or_else(|| chrono::Utc::now().timestamp())
}

fn parse_commit_date(date: &str) -> Option<i64> {
    let date = date.trim();

    date.parse::<i64>().ok().or_else(|| {
        chrono::DateTime::parse_from_rfc2822(date)
            .or_else(|_| chrono::DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
            .map(|datetime| datetime.timestamp())
            .ok()
    })
}

impl Packable for Commit {
    fn serialize(&self) -> Bytes {
        let body = Self::render_body(&self.parents, &self.message, self.timestamp, &self.files);

        frame(self.object_type(), body.as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| RepositoryError::corrupt("commit object is not valid UTF-8"))?;

        let mut lines = content.split('\n');
        let mut parents = Vec::new();

        let mut next_line = lines
            .next()
            .ok_or_else(|| RepositoryError::corrupt("commit object is empty"))?;

        while let Some(parent) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent.to_string())?);
            next_line = lines
                .next()
                .ok_or_else(|| RepositoryError::corrupt("commit object: missing timestamp line"))?;
        }

        let timestamp = next_line
            .strip_prefix("timestamp ")
            .and_then(|timestamp| timestamp.parse::<i64>().ok())
            .ok_or_else(|| RepositoryError::corrupt("commit object: invalid timestamp line"))?;

        let mut files = FileMap::new();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            let (oid, path) = line
                .strip_prefix("file ")
                .and_then(|entry| entry.split_once(' '))
                .ok_or_else(|| {
                    RepositoryError::corrupt(format!("commit object: invalid file line '{line}'"))
                })?;
            files.insert(path.to_string(), ObjectId::try_parse(oid.to_string())?);
        }

        let message = lines.collect::<Vec<_>>().join("\n");

        Ok(Self::new(parents, files, message, timestamp))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        Self::render_body(&self.parents, &self.message, self.timestamp, &self.files)
    }

    fn identity(&self) -> Bytes {
        Self::identity_bytes(&self.message, self.timestamp, &self.files)
    }

    fn object_id(&self) -> ObjectId {
        self.oid.clone()
    }
}
