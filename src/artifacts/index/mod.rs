//! Staging index file format
//!
//! The staging index records the pending `path -> blob id` bindings that the next commit will
//! lay over its parent's snapshot.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "MIDX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Blob id, packed (20 bytes)
//!   - Path length (2 bytes)
//!   - Path bytes
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "MIDX";

/// Index file format version
pub const VERSION: u32 = 1;
