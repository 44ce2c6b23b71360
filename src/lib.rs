//! minigit: a small local version-control core
//!
//! The crate is split the same way the on-disk repository is:
//!
//! - `areas`: the stateful parts of a repository (object database, refs, staging index,
//!   working directory, repository lock) and the `Repository` aggregate tying them together
//! - `artifacts`: the data types and algorithms operating on those areas (objects, branch
//!   names, ancestry walks, merge base finding, three-way merge, line diffs)
//! - `commands`: the user-facing commands and the interactive command loop
//! - `errors`: the typed error returned by every core operation

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
