//! Data structures and algorithms
//!
//! - `branch`: Branch name validation
//! - `checkout`: Working directory updates guarded against local changes
//! - `core`: Shared utilities (pager wrapper)
//! - `diff`: Line diffs between commits
//! - `index`: Staging index file format
//! - `log`: Commit history traversal
//! - `merge`: Merge base, three-way merge and pending merge state
//! - `objects`: Blob and commit objects

pub mod branch;
pub mod checkout;
pub mod core;
pub mod diff;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
