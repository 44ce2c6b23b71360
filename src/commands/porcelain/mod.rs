//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level user interface for version control.
//! They compose the repository areas and the merge and diff engines into workflows.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `status`: Show HEAD, staged files and pending conflicts
//! - `diff`: Show changes between two commits
//! - `log`: Show commit history
//! - `branch`: Create or list branches
//! - `checkout`: Switch branches or detach HEAD
//! - `merge`: Merge a branch, then continue or abort a conflicted merge

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;
