use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;
use std::collections::{HashSet, VecDeque};

/// First-parent history, newest first
///
/// Finite: ends after the root commit. Restartable: cloning the list before iterating yields
/// the same walk again. A commit that fails to load is yielded as an error and ends the walk.
#[derive(Clone, new)]
pub struct RevList<'d> {
    database: &'d Database,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevList<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                // Move to the first parent for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok(commit))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Breadth-first closure of `start` under every parent edge, `start` included
///
/// `load_parents` maps a commit to its parents; it is called once per reachable commit.
pub fn ancestors_with<F>(start: &ObjectId, load_parents: F) -> Result<HashSet<ObjectId>>
where
    F: Fn(&ObjectId) -> Result<Vec<ObjectId>>,
{
    let mut visited = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(oid) = queue.pop_front() {
        for parent in load_parents(&oid)? {
            if visited.insert(parent.clone()) {
                queue.push_back(parent);
            }
        }
    }

    Ok(visited)
}
