//! Pending merge record
//!
//! A conflicted merge leaves `.minigit/MERGE_STATE` behind until it is completed or aborted.
//!
//! ## Format
//!
//! ```text
//! ours <commit-id> <ours-ref>
//! theirs <commit-id> <theirs-ref>
//! base <commit-id>
//! merged <blob-id> <path>                       (one line per cleanly merged path)
//! conflict <base-id> <ours-id> <theirs-id> <path>   (`-` marks an absent side)
//! ```

use crate::artifacts::merge::resolution::Conflict;
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::io::ErrorKind;
use std::path::Path;

const ABSENT_MARKER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeState {
    pub ours: ObjectId,
    pub ours_ref: String,
    pub theirs: ObjectId,
    pub theirs_ref: String,
    pub base: ObjectId,
    pub merged: FileMap,
    pub conflicts: Vec<Conflict>,
}

impl MergeState {
    /// Read the pending merge, `None` when no merge is in progress
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Self::parse(&content).map(Some)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, self.render())?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Drop the pending merge; a missing record is not an error
    pub fn remove(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    pub fn conflicted_paths(&self) -> Vec<String> {
        self.conflicts
            .iter()
            .map(|conflict| conflict.path.clone())
            .collect()
    }

    fn render(&self) -> String {
        let mut lines = vec![
            format!("ours {} {}", self.ours, self.ours_ref),
            format!("theirs {} {}", self.theirs, self.theirs_ref),
            format!("base {}", self.base),
        ];

        lines.extend(
            self.merged
                .iter()
                .map(|(path, oid)| format!("merged {oid} {path}")),
        );
        lines.extend(self.conflicts.iter().map(|conflict| {
            format!(
                "conflict {} {} {} {}",
                Self::render_side(conflict.base.as_ref()),
                Self::render_side(conflict.ours.as_ref()),
                Self::render_side(conflict.theirs.as_ref()),
                conflict.path
            )
        }));

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }

    fn render_side(oid: Option<&ObjectId>) -> &str {
        oid.map(|oid| oid.as_ref()).unwrap_or(ABSENT_MARKER)
    }

    fn parse(content: &str) -> Result<Self> {
        let invalid = |line: &str| RepositoryError::corrupt(format!("merge state: invalid line '{line}'"));

        let mut ours = None;
        let mut theirs = None;
        let mut base = None;
        let mut merged = FileMap::new();
        let mut conflicts = Vec::new();

        for line in content.lines().filter(|line| !line.is_empty()) {
            let (keyword, rest) = line.split_once(' ').ok_or_else(|| invalid(line))?;

            match keyword {
                "ours" | "theirs" => {
                    let (oid, ref_name) = rest.split_once(' ').ok_or_else(|| invalid(line))?;
                    let side = Some((ObjectId::try_parse(oid.to_string())?, ref_name.to_string()));
                    if keyword == "ours" {
                        ours = side;
                    } else {
                        theirs = side;
                    }
                }
                "base" => base = Some(ObjectId::try_parse(rest.to_string())?),
                "merged" => {
                    let (oid, path) = rest.split_once(' ').ok_or_else(|| invalid(line))?;
                    merged.insert(path.to_string(), ObjectId::try_parse(oid.to_string())?);
                }
                "conflict" => {
                    let mut fields = rest.splitn(4, ' ');
                    let mut next_side = || -> Result<Option<ObjectId>> {
                        match fields.next() {
                            Some(ABSENT_MARKER) => Ok(None),
                            Some(oid) => Ok(Some(ObjectId::try_parse(oid.to_string())?)),
                            None => Err(invalid(line)),
                        }
                    };
                    let (conflict_base, conflict_ours, conflict_theirs) =
                        (next_side()?, next_side()?, next_side()?);
                    let path = fields.next().ok_or_else(|| invalid(line))?;

                    conflicts.push(Conflict::new(
                        path.to_string(),
                        conflict_base,
                        conflict_ours,
                        conflict_theirs,
                    ));
                }
                _ => return Err(invalid(line)),
            }
        }

        let (ours, ours_ref) = ours.ok_or_else(|| RepositoryError::corrupt("merge state: missing ours"))?;
        let (theirs, theirs_ref) =
            theirs.ok_or_else(|| RepositoryError::corrupt("merge state: missing theirs"))?;
        let base = base.ok_or_else(|| RepositoryError::corrupt("merge state: missing base"))?;

        Ok(MergeState {
            ours,
            ours_ref,
            theirs,
            theirs_ref,
            base,
            merged,
            conflicts,
        })
    }
}
