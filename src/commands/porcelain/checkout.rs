use crate::areas::refs::{HEAD_REF_NAME, Head};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::commit::{Commit, FileMap};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around and make experimental
changes, but committing on top of them requires 'commit --allow-detached'.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    minigit branch <new-branch-name>
"#;

impl Repository {
    /// Materialize the target commit in the working directory and move HEAD to it
    ///
    /// A branch name attaches HEAD to that branch; any other reference detaches it. Tracked
    /// files absent from the target are removed. The staging area is left untouched.
    ///
    /// Fails with `WorkspaceConflict`, before touching anything, if local edits or untracked
    /// files stand where the target differs from HEAD.
    pub fn checkout(&self, target: &str) -> Result<ObjectId> {
        let _lock = self.lock()?;

        if MergeState::load(&self.merge_state_path())?.is_some() {
            return Err(RepositoryError::MergeInProgress);
        }

        let target_oid = self.resolve(target)?;
        let target_commit = self.database().load_commit(&target_oid)?;

        let current_files = self.head_files()?;
        let migration = Migration::new(
            self.database(),
            self.workspace(),
            &current_files,
            target_commit.files(),
        );
        migration.check()?;
        migration.apply()?;

        let was_attached = matches!(self.refs().read_head()?, Head::Attached(_));
        let target_branch = BranchName::try_parse(target.to_string())
            .ok()
            .filter(|branch| self.refs().branch_exists(branch));

        match &target_branch {
            Some(branch) => self.refs().set_head_to_branch(branch)?,
            None if target == HEAD_REF_NAME => {}
            None => self.refs().set_head_detached(&target_oid)?,
        }
        tracing::info!(target, oid = %target_oid, "checked out");

        match target_branch {
            Some(branch) => writeln!(self.writer(), "Switched to branch '{branch}'")?,
            None => {
                if was_attached && target != HEAD_REF_NAME {
                    writeln!(
                        self.writer(),
                        "Note: checking out '{target}'.\n{DETACHMENT_NOTICE}"
                    )?;
                }
                self.print_head_position(&target_commit)?;
            }
        }

        Ok(target_oid)
    }

    /// Files of the commit HEAD designates, empty before the first commit
    pub(crate) fn head_files(&self) -> Result<FileMap> {
        match self.refs().head_oid()? {
            Some(oid) => Ok(self.database().load_commit(&oid)?.files().clone()),
            None => Ok(FileMap::new()),
        }
    }

    fn print_head_position(&self, commit: &Commit) -> Result<()> {
        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            commit.oid().to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
