use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::merge::merge_state::MergeState;
use crate::errors::Result;
use colored::Colorize;

impl Repository {
    /// Print where HEAD is, what is staged and which conflicts are pending
    pub fn status(&self) -> Result<()> {
        let mut index = self.index();
        index.rehydrate()?;
        let staged = index.snapshot();
        drop(index);

        match self.refs().read_head()? {
            Head::Attached(branch) => writeln!(self.writer(), "On branch {branch}")?,
            Head::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?
            }
        }
        if self.refs().head_oid()?.is_none() {
            writeln!(self.writer(), "No commits yet")?;
        }

        let head_files = self.head_files()?;
        if staged.is_empty() {
            writeln!(self.writer(), "Nothing staged")?;
        } else {
            writeln!(self.writer(), "Changes to be committed:")?;
            for (path, oid) in &staged {
                let label = match head_files.get(path) {
                    None => "new file:",
                    Some(head_oid) if head_oid != oid => "modified:",
                    Some(_) => "unchanged:",
                };
                writeln!(self.writer(), "  {}", format!("{label:<11}{path}").green())?;
            }
        }

        if let Some(state) = MergeState::load(&self.merge_state_path())? {
            writeln!(
                self.writer(),
                "Merging '{}' into '{}'",
                state.theirs_ref, state.ours_ref
            )?;
            writeln!(self.writer(), "Unmerged paths:")?;
            for path in state.conflicted_paths() {
                if staged.contains_key(&path) {
                    writeln!(self.writer(), "  {}", format!("{:<11}{path}", "resolved:").green())?;
                } else {
                    writeln!(self.writer(), "  {}", format!("{:<11}{path}", "conflict:").red())?;
                }
            }
        }

        Ok(())
    }
}
