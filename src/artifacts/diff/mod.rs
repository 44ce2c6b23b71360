//! Line diffs between commits
//!
//! - `diff_algorithm`: LCS edit script between two line sequences
//! - `tree_diff`: lazy per-path diff between two commit snapshots
//!
//! Paths are compared by blob id first; only paths whose ids differ, or that exist on one side
//! only, have their content loaded and diffed.

pub mod diff_algorithm;
pub mod tree_diff;
