//! Core repository components
//!
//! - `database`: content-addressable storage for blobs and commits
//! - `index`: staging area of pending file bindings
//! - `lock`: exclusive lock serializing mutating operations
//! - `refs`: branches and HEAD
//! - `repository`: the aggregate owning all of the above
//! - `workspace`: working directory file system operations

pub mod database;
pub mod index;
pub mod lock;
pub mod refs;
pub mod repository;
pub mod workspace;
