use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_algorithm::Edit;
use crate::artifacts::diff::tree_diff::{ChangeKind, FileDiff};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use colored::Colorize;

const NULL_PATH: &str = "/dev/null";

impl Repository {
    /// Print the line changes between two commits, one block per changed path
    pub fn diff(&self, old: &str, new: &str) -> Result<Vec<FileDiff>> {
        let old_oid = self.resolve(old)?;
        let new_oid = self.resolve(new)?;

        let diffs = self
            .database()
            .tree_diff(&old_oid, &new_oid)?
            .collect::<Result<Vec<_>>>()?;

        for file_diff in &diffs {
            self.print_diff(file_diff)?;
        }

        Ok(diffs)
    }

    fn print_diff(&self, file_diff: &FileDiff) -> Result<()> {
        let path = &file_diff.path;

        writeln!(
            self.writer(),
            "{}",
            format!("diff --minigit a/{path} b/{path}").bold()
        )?;
        match file_diff.kind {
            ChangeKind::Added => writeln!(self.writer(), "{}", "new file".bold())?,
            ChangeKind::Deleted => writeln!(self.writer(), "{}", "deleted file".bold())?,
            ChangeKind::Modified => {}
        }
        writeln!(
            self.writer(),
            "{}",
            format!(
                "index {}..{}",
                Self::short_oid_or_zero(file_diff.old_oid.as_ref()),
                Self::short_oid_or_zero(file_diff.new_oid.as_ref())
            )
            .bold()
        )?;

        let old_path = match file_diff.old_oid {
            Some(_) => format!("a/{path}"),
            None => NULL_PATH.to_string(),
        };
        let new_path = match file_diff.new_oid {
            Some(_) => format!("b/{path}"),
            None => NULL_PATH.to_string(),
        };
        writeln!(self.writer(), "{}", format!("--- {old_path}").bold())?;
        writeln!(self.writer(), "{}", format!("+++ {new_path}").bold())?;

        for edit in &file_diff.edits {
            self.print_edit(edit)?;
        }

        Ok(())
    }

    fn print_edit(&self, edit: &Edit<String>) -> Result<()> {
        match edit {
            Edit::Delete { .. } => writeln!(self.writer(), "{}", edit.as_string().red())?,
            Edit::Insert { .. } => writeln!(self.writer(), "{}", edit.as_string().green())?,
            Edit::Equal { .. } => writeln!(self.writer(), "{edit}")?,
        }

        Ok(())
    }

    fn short_oid_or_zero(oid: Option<&ObjectId>) -> String {
        oid.map(ObjectId::to_short_oid)
            .unwrap_or_else(|| "0".repeat(7))
    }
}
