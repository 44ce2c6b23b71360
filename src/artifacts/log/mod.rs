//! Commit history traversal
//!
//! - `rev_list`: first-parent history walk backing `log`, and the full multi-parent ancestor
//!   walk backing merge-base computation
//!
//! Both walks load commits lazily through the object database, so a history is never held in
//! memory all at once.

pub mod rev_list;
