//! Plumbing commands (low-level object operations)
//!
//! Plumbing commands provide direct access to the object store. They're primarily used
//! for scripting and for inspecting what the porcelain commands wrote.
//!
//! ## Commands
//!
//! - `cat-file`: Print the content of a blob
//! - `hash-object`: Compute a blob id and optionally store the blob

pub mod cat_file;
pub mod hash_object;
