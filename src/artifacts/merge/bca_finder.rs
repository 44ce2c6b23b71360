//! Best common ancestor finder for merge operations
//!
//! The merge base of two commits is the common ancestor nearest to the commit being merged in.
//!
//! ## Algorithm
//!
//! The search runs in two phases over a parent loader, so it works the same against the object
//! database and against an in-memory graph:
//!
//! ### Phase 1: Mark the source side
//!
//! Every commit reachable from the source (`ours`) through any parent edge is marked
//! `VISITED_FROM_SOURCE`, the source included.
//!
//! ### Phase 2: Walk the target side nearest first
//!
//! Commits reachable from the target (`theirs`) are visited breadth-first, one generation at a
//! time. The first visited commit that already carries the source mark is the answer; it gets
//! the `RESULT` flag and the walk stops.
//!
//! Merge commits contribute all their parents to both phases, so a branch that merged the other
//! side earlier finds the merged commit rather than falling back to the root.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const RESULT = 0b100;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds the best common ancestor of two commits
///
/// # Type Parameters
///
/// * `ParentsLoaderFn` - Maps a commit id to its parent ids; an empty vector marks a root.
///   Load failures abort the search and are returned to the caller.
pub struct BCAFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Result<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> BCAFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Result<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// Find the common ancestor of `source_commit_id` and `target_commit_id` nearest to the
    /// target
    ///
    /// # Returns
    ///
    /// - `Some(ObjectId)` - The merge base; a commit is its own merge base with itself
    /// - `None` - The two histories share no commit (different roots)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Branched history:
    /// //     A
    /// //    / \
    /// //   B   C
    /// let bca = finder.find_best_common_ancestor(&b, &c)?;
    /// assert_eq!(bca, Some(a));
    /// ```
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        let mut ancestors_states = self.mark_source_ancestors(source_commit_id)?;

        let mut queue = VecDeque::from([target_commit_id.clone()]);
        ancestors_states
            .entry(target_commit_id.clone())
            .and_modify(|state| *state |= VisitState::VISITED_FROM_TARGET)
            .or_insert(VisitState::VISITED_FROM_TARGET);

        while let Some(commit_id) = queue.pop_front() {
            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);

            tracing::trace!(commit = %commit_id, state = %current_state, "visiting commit");

            if current_state.contains(VisitState::VISITED_FROM_BOTH) {
                ancestors_states.insert(commit_id.clone(), current_state | VisitState::RESULT);
                tracing::debug!(
                    source = %source_commit_id,
                    target = %target_commit_id,
                    base = %commit_id,
                    "found best common ancestor"
                );

                return Ok(Some(commit_id));
            }

            for parent_id in (self.parents_loader)(&commit_id)? {
                let parent_state = ancestors_states
                    .get(&parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                // Only enqueue parents not yet reached from the target side
                if !parent_state.contains(VisitState::VISITED_FROM_TARGET) {
                    ancestors_states
                        .insert(parent_id.clone(), parent_state | VisitState::VISITED_FROM_TARGET);
                    queue.push_back(parent_id);
                }
            }
        }

        tracing::debug!(
            source = %source_commit_id,
            target = %target_commit_id,
            "no common ancestor"
        );

        Ok(None)
    }

    fn mark_source_ancestors(
        &self,
        source_commit_id: &ObjectId,
    ) -> Result<HashMap<ObjectId, VisitState>> {
        let mut ancestors_states =
            HashMap::from([(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE)]);
        let mut queue = VecDeque::from([source_commit_id.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            for parent_id in (self.parents_loader)(&commit_id)? {
                if !ancestors_states.contains_key(&parent_id) {
                    ancestors_states.insert(parent_id.clone(), VisitState::VISITED_FROM_SOURCE);
                    queue.push_back(parent_id);
                }
            }
        }

        tracing::debug!(
            source = %source_commit_id,
            ancestors = ancestors_states.len(),
            "marked source ancestors"
        );

        Ok(ancestors_states)
    }
}
