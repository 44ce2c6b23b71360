//! Stored object types
//!
//! Two kinds of objects are kept in the repository database, each identified by a SHA-1 digest
//! rendered as 40 hex characters:
//!
//! - **Blob**: raw file content
//! - **Commit**: a flat snapshot (`path -> blob id`) plus lineage, message and timestamp
//!
//! Both serialize to the `<type> <size>\0<content>` framing before being compressed to disk.
//! The digest is used for deduplication only, never as a security boundary.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of an object id in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest hash prefix accepted when resolving abbreviated ids
pub const MIN_PREFIX_LENGTH: usize = 4;
