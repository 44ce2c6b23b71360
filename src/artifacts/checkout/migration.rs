//! Migration of the working directory between two snapshots
//!
//! Removals and writes are planned up front. [`Migration::check`] then compares every planned
//! path with what is on disk: a path may only be touched if its content still matches the
//! current snapshot, or already matches the target. Stale or untracked content refuses the
//! whole migration before any file is changed.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::{ConflictType, WorkspaceConflicts};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    /// Snapshot the working directory is expected to hold
    from: &'r FileMap,
    /// Tracked paths absent from the target
    removals: Vec<String>,
    /// Paths whose binding changes, with their target blob
    writes: Vec<(String, ObjectId)>,
    /// Paths the caller overwrites itself after applying the migration
    overwrites: Vec<String>,
}

impl<'r> Migration<'r> {
    pub fn new(
        database: &'r Database,
        workspace: &'r Workspace,
        from: &'r FileMap,
        to: &FileMap,
    ) -> Self {
        let removals = from
            .keys()
            .filter(|path| !to.contains_key(*path))
            .cloned()
            .collect();
        let writes = to
            .iter()
            .filter(|(path, oid)| from.get(*path) != Some(*oid))
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .collect();

        Migration {
            database,
            workspace,
            from,
            removals,
            writes,
            overwrites: Vec::new(),
        }
    }

    /// Also guard `paths`, which the caller writes once the migration is applied
    pub fn overwriting(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.overwrites.extend(paths);
        self
    }

    /// Refuse the migration if it would destroy local work
    ///
    /// Fails with `WorkspaceConflict` listing every offending path.
    pub fn check(&self) -> Result<()> {
        let mut planned = BTreeMap::<&str, Option<&ObjectId>>::new();
        for path in &self.removals {
            planned.insert(path, None);
        }
        for (path, oid) in &self.writes {
            planned.insert(path, Some(oid));
        }
        for path in &self.overwrites {
            planned.entry(path).or_insert(None);
        }

        let mut conflicts = WorkspaceConflicts::default();
        for (path, target) in planned {
            let Some(on_disk) = self.on_disk_oid(path)? else {
                continue;
            };

            if self.from.get(path) == Some(&on_disk) || target == Some(&on_disk) {
                continue;
            }

            let kind = if self.from.contains_key(path) {
                ConflictType::StaleFile
            } else {
                ConflictType::UntrackedOverwritten
            };
            conflicts.record(kind, path.to_string());
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            tracing::warn!(%conflicts, "refusing to update the working directory");
            Err(RepositoryError::WorkspaceConflict(conflicts))
        }
    }

    /// Remove and rewrite the planned paths
    pub fn apply(&self) -> Result<()> {
        for path in &self.removals {
            self.workspace.remove_path(path)?;
        }

        for (path, oid) in &self.writes {
            let content = self.database.get(oid)?;
            self.workspace.write_path(path, &content)?;
        }

        Ok(())
    }

    fn on_disk_oid(&self, path: &str) -> Result<Option<ObjectId>> {
        match self.workspace.read_path(path) {
            Ok(content) => Ok(Some(Blob::new(content).object_id())),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}
