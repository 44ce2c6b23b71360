use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{RepositoryError, Result};
use colored::Colorize;

impl Repository {
    /// Bind a new branch to the current commit
    ///
    /// HEAD stays where it is. Fails with `UnknownRef` while the current branch has no
    /// commits, since a branch may never point at nothing.
    pub fn create_branch(&self, name: &str) -> Result<BranchName> {
        let branch = BranchName::try_parse(name.to_string())?;

        let _lock = self.lock()?;

        let source_oid = self
            .refs()
            .head_oid()?
            .ok_or_else(|| RepositoryError::UnknownRef(HEAD_REF_NAME.to_string()))?;
        self.refs().create_branch(&branch, &source_oid)?;

        writeln!(
            self.writer(),
            "Created branch '{branch}' at {}",
            source_oid.to_short_oid()
        )?;

        Ok(branch)
    }

    /// Print every branch, the checked out one marked with `*`
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let current = self.refs().current_branch()?;
        let branches = self.refs().list_branches()?;

        for branch in &branches {
            if current.as_ref() == Some(branch) {
                writeln!(self.writer(), "* {}", branch.to_string().green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(branches)
    }
}
