//! Working directory updates
//!
//! Checkout and merge move the working directory from one snapshot to another. The move is
//! planned first and checked against local changes, so a refused update leaves every file as
//! it was.

pub mod conflict;
pub mod migration;
