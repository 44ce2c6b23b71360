use crate::areas::lock::RepositoryLock;
use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::merge::merger::Merger;
use crate::artifacts::merge::resolution::Conflict;
use crate::artifacts::merge::{ConflictReport, MergeOutcome, merge_message};
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::collections::BTreeSet;

impl Repository {
    /// Merge `target` into the current branch
    ///
    /// A clean merge commits, advances the branch and updates the working directory. A
    /// conflicted merge writes conflict markers, records the pending merge and returns the
    /// report; the user then stages resolutions and completes or aborts it.
    ///
    /// Local edits or untracked files on paths the merge would write refuse it with
    /// `WorkspaceConflict` before anything is recorded.
    pub fn merge(&self, target: &str) -> Result<MergeOutcome> {
        let _lock = self.lock()?;

        if MergeState::load(&self.merge_state_path())?.is_some() {
            return Err(RepositoryError::MergeInProgress);
        }

        let ours_branch = self
            .refs()
            .current_branch()?
            .ok_or(RepositoryError::DetachedHeadCommitForbidden)?;
        let ours = self
            .refs()
            .head_oid()?
            .ok_or_else(|| RepositoryError::UnknownRef(HEAD_REF_NAME.to_string()))?;
        let theirs = self.resolve(target)?;

        let merger = Merger::new(self.database());
        let Some(pending) = merger.prepare(&ours, &theirs)? else {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(MergeOutcome::UpToDate);
        };

        let ours_files = self.database().load_commit(&ours)?.files().clone();
        let migration = Migration::new(
            self.database(),
            self.workspace(),
            &ours_files,
            &pending.resolution.merged,
        )
        .overwriting(
            pending
                .resolution
                .conflicts
                .iter()
                .map(|conflict| conflict.path.clone()),
        );
        migration.check()?;

        let outcome = merger.conclude(pending, ours_branch.as_ref(), target, commit_timestamp())?;

        match &outcome {
            MergeOutcome::Merged(commit) => {
                migration.apply()?;
                self.refs().update_current(commit.oid(), false)?;

                self.print_commit_summary(commit)?;
            }
            MergeOutcome::UpToDate => {
                writeln!(self.writer(), "Already up to date.")?;
            }
            MergeOutcome::Conflicted(report) => {
                self.stop_on_conflicts(&migration, report, ours_branch.as_ref(), target)?;
            }
        }

        Ok(outcome)
    }

    fn stop_on_conflicts(
        &self,
        migration: &Migration<'_>,
        report: &ConflictReport,
        ours_ref: &str,
        theirs_ref: &str,
    ) -> Result<()> {
        migration.apply()?;

        for conflict in &report.conflicts {
            let content = self.conflict_markers(conflict, ours_ref, theirs_ref)?;
            self.workspace().write_path(&conflict.path, &content)?;
        }

        MergeState {
            ours: report.ours.clone(),
            ours_ref: ours_ref.to_string(),
            theirs: report.theirs.clone(),
            theirs_ref: theirs_ref.to_string(),
            base: report.base.clone(),
            merged: report.merged.clone(),
            conflicts: report.conflicts.clone(),
        }
        .save(&self.merge_state_path())?;

        for conflict in &report.conflicts {
            writeln!(
                self.writer(),
                "CONFLICT (content): Merge conflict in {}",
                conflict.path
            )?;
        }
        writeln!(
            self.writer(),
            "Automatic merge failed; fix conflicts and add the results, then run 'merge --continue'."
        )?;

        Ok(())
    }

    fn conflict_markers(&self, conflict: &Conflict, ours_ref: &str, theirs_ref: &str) -> Result<Vec<u8>> {
        let mut content = format!("<<<<<<< {ours_ref}\n").into_bytes();
        self.append_side(&mut content, conflict.ours.as_ref())?;
        content.extend_from_slice(b"=======\n");
        self.append_side(&mut content, conflict.theirs.as_ref())?;
        content.extend_from_slice(format!(">>>>>>> {theirs_ref}\n").as_bytes());

        Ok(content)
    }

    fn append_side(&self, content: &mut Vec<u8>, oid: Option<&ObjectId>) -> Result<()> {
        let Some(oid) = oid else {
            return Ok(());
        };

        let side = self.database().get(oid)?;
        content.extend_from_slice(&side);
        if !side.is_empty() && !side.ends_with(b"\n") {
            content.push(b'\n');
        }

        Ok(())
    }

    /// Commit a conflicted merge once every conflicted path has been staged
    ///
    /// The merge commit takes the cleanly merged files with the staged files laid over them.
    /// Without a message it gets the usual `Merge <theirs> into <ours>` one.
    pub fn complete_merge(&self, message: Option<&str>) -> Result<Commit> {
        let lock = self.lock()?;
        self.complete_merge_locked(&lock, message)
    }

    /// [`Repository::complete_merge`] for a caller already holding the repository lock
    pub(crate) fn complete_merge_locked(
        &self,
        _lock: &RepositoryLock,
        message: Option<&str>,
    ) -> Result<Commit> {
        let state = MergeState::load(&self.merge_state_path())?
            .ok_or(RepositoryError::NoMergeInProgress)?;

        let mut index = self.index();
        index.rehydrate()?;

        let unresolved = state
            .conflicted_paths()
            .into_iter()
            .filter(|path| !index.is_staged(path))
            .collect::<Vec<_>>();
        if !unresolved.is_empty() {
            return Err(RepositoryError::UnresolvedConflicts(unresolved));
        }

        let mut files = state.merged.clone();
        files.extend(index.snapshot());

        let message = message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| merge_message(&state.theirs_ref, &state.ours_ref));

        let commit = self.database().create_commit(
            vec![state.ours.clone(), state.theirs.clone()],
            files,
            message,
            commit_timestamp(),
        )?;
        self.refs().update_current(commit.oid(), false)?;

        index.clear();
        index.write_updates()?;
        drop(index);
        MergeState::remove(&self.merge_state_path())?;

        self.print_commit_summary(&commit)?;

        Ok(commit)
    }

    /// Drop a conflicted merge and restore the working directory to the current commit
    pub fn abort_merge(&self) -> Result<()> {
        let _lock = self.lock()?;

        let state = MergeState::load(&self.merge_state_path())?
            .ok_or(RepositoryError::NoMergeInProgress)?;
        let ours_commit = self.database().load_commit(&state.ours)?;

        let touched_paths = state
            .merged
            .keys()
            .cloned()
            .chain(state.conflicted_paths())
            .chain(ours_commit.files().keys().cloned())
            .collect::<BTreeSet<_>>();

        for path in &touched_paths {
            match ours_commit.file(path) {
                Some(oid) => {
                    let content = self.database().get(oid)?;
                    self.workspace().write_path(path, &content)?;
                }
                None => self.workspace().remove_path(path)?,
            }
        }

        let mut index = self.index();
        index.rehydrate()?;
        index.clear();
        index.write_updates()?;
        drop(index);

        MergeState::remove(&self.merge_state_path())?;
        tracing::info!(ours = %state.ours, theirs = %state.theirs, "aborted merge");

        writeln!(
            self.writer(),
            "Merge of '{}' aborted, HEAD is at {}",
            state.theirs_ref,
            state.ours.to_short_oid()
        )?;

        Ok(())
    }
}
