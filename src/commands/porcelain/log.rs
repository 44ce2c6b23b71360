use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use colored::Colorize;
use std::collections::HashMap;

impl Repository {
    /// Print the first-parent history of HEAD, newest first
    pub fn log(&self) -> Result<Vec<Commit>> {
        let Some(head_oid) = self.refs().head_oid()? else {
            writeln!(
                self.writer(),
                "your current branch '{}' does not have any commits yet",
                self.refs().read_head()?
            )?;
            return Ok(Vec::new());
        };

        let decorations = self.ref_decorations()?;
        let commits = self.database().log(&head_oid).collect::<Result<Vec<_>>>()?;

        for commit in &commits {
            self.show_commit(commit, &decorations)?;
        }

        Ok(commits)
    }

    fn show_commit(&self, commit: &Commit, decorations: &HashMap<ObjectId, String>) -> Result<()> {
        let decoration = decorations
            .get(commit.oid())
            .map(|names| format!(" ({names})"))
            .unwrap_or_default();

        writeln!(
            self.writer(),
            "{}{}",
            format!("commit {}", commit.oid()).yellow(),
            decoration
        )?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer(), "Merge: {parents}")?;
        }
        writeln!(self.writer(), "Date:   {}", commit.readable_timestamp())?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    /// Names pointing at each commit, `HEAD -> <branch>` first for the checked out branch
    fn ref_decorations(&self) -> Result<HashMap<ObjectId, String>> {
        let head = self.refs().read_head()?;
        let mut names: HashMap<ObjectId, Vec<String>> = HashMap::new();

        if let Head::Detached(oid) = &head {
            names
                .entry(oid.clone())
                .or_default()
                .push("HEAD".bold().cyan().to_string());
        }

        for branch in self.refs().list_branches()? {
            let Some(oid) = self.refs().read_branch(&branch)? else {
                continue;
            };

            let name = branch.to_string().bold().green().to_string();
            let entry = names.entry(oid).or_default();
            if head == Head::Attached(branch) {
                entry.insert(0, format!("{} {name}", "HEAD ->".bold().cyan()));
            } else {
                entry.push(name);
            }
        }

        Ok(names
            .into_iter()
            .map(|(oid, names)| (oid, names.join(", ")))
            .collect())
    }
}
