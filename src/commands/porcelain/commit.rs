use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::commit::{Commit, FileMap, commit_timestamp};
use crate::errors::{RepositoryError, Result};

impl Repository {
    /// Freeze the staged files laid over the current commit into a new commit
    ///
    /// The current branch advances to the new commit and the staging area is cleared. While a
    /// merge is pending this completes it instead.
    pub fn commit(&self, message: &str, allow_detached: bool) -> Result<Commit> {
        let lock = self.lock()?;

        if MergeState::load(&self.merge_state_path())?.is_some() {
            return self.complete_merge_locked(&lock, Some(message));
        }

        let mut index = self.index();
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit);
        }

        let head = self.refs().read_head()?;
        if matches!(head, Head::Detached(_)) && !allow_detached {
            return Err(RepositoryError::DetachedHeadCommitForbidden);
        }

        let parent = self.refs().head_oid()?;
        let mut files = match &parent {
            Some(parent) => self.database().load_commit(parent)?.files().clone(),
            None => FileMap::new(),
        };
        files.extend(index.snapshot());

        let commit = self.database().create_commit(
            parent.into_iter().collect(),
            files,
            message.trim().to_string(),
            commit_timestamp(),
        )?;
        self.refs().update_current(commit.oid(), allow_detached)?;

        index.clear();
        index.write_updates()?;
        drop(index);

        self.print_commit_summary(&commit)?;

        Ok(commit)
    }

    pub(crate) fn print_commit_summary(&self, commit: &Commit) -> Result<()> {
        let location = match self.refs().current_branch()? {
            Some(branch) => branch.to_string(),
            None => "detached HEAD".to_string(),
        };
        let is_root = if commit.parents().is_empty() {
            " (root-commit)"
        } else {
            ""
        };

        writeln!(
            self.writer(),
            "[{location}{is_root} {}] {}",
            commit.oid().to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
