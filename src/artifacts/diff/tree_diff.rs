use crate::areas::database::Database;
use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, Edit, LcsDiff};
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::collections::btree_map::IntoIter;

/// Appended to a final line that lacks its newline, so that adding or dropping the newline
/// shows up as an edit
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
}

impl ChangeKind {
    pub fn from_oids(old: Option<&ObjectId>, new: Option<&ObjectId>) -> Option<Self> {
        match (old, new) {
            (None, Some(_)) => Some(ChangeKind::Added),
            (Some(_), None) => Some(ChangeKind::Deleted),
            (Some(old), Some(new)) if old != new => Some(ChangeKind::Modified),
            _ => None, // No change or both are None
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            ChangeKind::Added => 'A',
            ChangeKind::Deleted => 'D',
            ChangeKind::Modified => 'M',
        }
    }
}

/// Line-level difference of one path between two commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub old_oid: Option<ObjectId>,
    pub new_oid: Option<ObjectId>,
    pub kind: ChangeKind,
    pub edits: Vec<Edit<String>>,
}

type ChangeSet = BTreeMap<String, (Option<ObjectId>, Option<ObjectId>)>;

/// Lazy per-path diff of two file maps, in lexicographic path order
///
/// Only the changed paths are collected up front; blobs are read and diffed one path at a time
/// as the iterator advances.
#[derive(Debug)]
pub struct TreeDiff<'d> {
    database: &'d Database,
    changes: IntoIter<String, (Option<ObjectId>, Option<ObjectId>)>,
}

impl<'d> TreeDiff<'d> {
    pub fn new(database: &'d Database, old: &FileMap, new: &FileMap) -> Self {
        let mut change_set = ChangeSet::new();

        for (path, old_oid) in old {
            let new_oid = new.get(path);
            if new_oid != Some(old_oid) {
                change_set.insert(path.clone(), (Some(old_oid.clone()), new_oid.cloned()));
            }
        }

        for (path, new_oid) in new {
            if !old.contains_key(path) {
                change_set.insert(path.clone(), (None, Some(new_oid.clone())));
            }
        }

        TreeDiff {
            database,
            changes: change_set.into_iter(),
        }
    }

    fn load_lines(&self, oid: Option<&ObjectId>) -> Result<Vec<String>> {
        let content = match oid {
            Some(oid) => self.database.get(oid)?,
            None => Bytes::new(),
        };

        Ok(split_lines(&content))
    }

    fn diff_path(
        &self,
        path: String,
        old_oid: Option<ObjectId>,
        new_oid: Option<ObjectId>,
    ) -> Result<FileDiff> {
        let old_lines = self.load_lines(old_oid.as_ref())?;
        let new_lines = self.load_lines(new_oid.as_ref())?;
        let edits = LcsDiff::new(&old_lines, &new_lines).diff();

        let kind = ChangeKind::from_oids(old_oid.as_ref(), new_oid.as_ref())
            .unwrap_or(ChangeKind::Modified);

        Ok(FileDiff {
            path,
            old_oid,
            new_oid,
            kind,
            edits,
        })
    }
}

/// Split content on `\n`, keeping any `\r` as part of its line
fn split_lines(content: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(content);
    if text.is_empty() {
        return Vec::new();
    }

    let (body, terminated) = match text.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (text.as_ref(), false),
    };

    let mut lines = body.split('\n').map(str::to_string).collect::<Vec<_>>();
    if !terminated {
        if let Some(last) = lines.last_mut() {
            last.push('\n');
            last.push_str(NO_NEWLINE_MARKER);
        }
    }

    lines
}

impl Iterator for TreeDiff<'_> {
    type Item = Result<FileDiff>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, (old_oid, new_oid)) = self.changes.next()?;

        Some(self.diff_path(path, old_oid, new_oid))
    }
}
