use crate::areas::repository::{DEFAULT_BRANCH, Repository};
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{RepositoryError, Result};
use std::fs;

impl Repository {
    /// Bootstrap `.minigit` with an empty `main` branch and HEAD attached to it
    ///
    /// Running it against an initialized repository fails with `AlreadyExists` and leaves
    /// everything untouched.
    pub fn init(&self) -> Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyExists(format!(
                "repository in {}",
                self.path().display()
            )));
        }

        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.database().commits_path())?;
        fs::create_dir_all(self.refs().heads_path())?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs().init_default_branch(&default_branch)?;

        tracing::info!(path = %self.path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty minigit repository in {}",
            self.repository_path().display()
        )?;

        Ok(())
    }
}
