//! Branch and HEAD references
//!
//! Branches are mutable names bound to commits; HEAD records which branch is checked out, or
//! which commit when detached.
//!
//! ## File Format
//!
//! - `.minigit/refs/heads/<name>`: the 40-character id of the branch tip, or nothing for the
//!   branch created by `init` before its first commit
//! - `.minigit/HEAD`: `ref: refs/heads/<name>` when attached, a raw commit id when detached

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use derive_new::new;
use file_guard::Lock;
use std::io::{ErrorKind, Write};
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing the attached form of HEAD
const SYMREF_REGEX: &str = r"^ref: (refs/heads/.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// What HEAD currently designates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Checked out on a branch; commits advance it
    Attached(BranchName),
    /// Checked out on a bare commit
    Detached(ObjectId),
}

impl std::fmt::Display for Head {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Head::Attached(branch) => write!(f, "{branch}"),
            Head::Detached(oid) => write!(f, "{oid}"),
        }
    }
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.minigit`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.heads_path().join(name.as_ref()).into_boxed_path()
    }

    /// Bind the initial branch to "no commits yet" and attach HEAD to it
    pub fn init_default_branch(&self, name: &BranchName) -> Result<()> {
        self.update_ref_file(self.branch_path(name), String::new())?;
        self.set_head_to_branch(name)
    }

    pub fn read_head(&self) -> Result<Head> {
        let content = Self::read_ref_content(&self.head_path())?
            .ok_or_else(|| RepositoryError::corrupt("HEAD is missing or empty"))?;

        let symref_regex = regex::Regex::new(SYMREF_REGEX)
            .map_err(|_| RepositoryError::corrupt("invalid HEAD pattern"))?;

        match symref_regex.captures(&content) {
            Some(symref_match) => Ok(Head::Attached(BranchName::try_parse_ref_path(
                &symref_match[1],
            )?)),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// Commit designated by HEAD, `None` while the current branch has no commits
    pub fn head_oid(&self) -> Result<Option<ObjectId>> {
        match self.read_head()? {
            Head::Attached(branch) => self.read_branch(&branch),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn current_branch(&self) -> Result<Option<BranchName>> {
        match self.read_head()? {
            Head::Attached(branch) => Ok(Some(branch)),
            Head::Detached(_) => Ok(None),
        }
    }

    pub fn set_head_to_branch(&self, name: &BranchName) -> Result<()> {
        self.update_ref_file(self.head_path(), format!("ref: {}", name.to_ref_path()))
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> Result<()> {
        self.update_ref_file(self.head_path(), oid.to_string())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Tip of a branch
    ///
    /// Fails with `NotFound` for an unknown branch; `None` is the empty initial branch.
    pub fn read_branch(&self, name: &BranchName) -> Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !branch_path.is_file() {
            return Err(RepositoryError::not_found("branch", name));
        }

        Self::read_ref_content(&branch_path)?
            .map(ObjectId::try_parse)
            .transpose()
    }

    /// Bind a new branch to `source_oid`
    ///
    /// Fails with `AlreadyExists` if the name is taken, leaving the existing binding intact.
    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> Result<()> {
        if self.branch_exists(name) {
            return Err(RepositoryError::AlreadyExists(format!("branch {name}")));
        }

        self.update_ref_file(self.branch_path(name), source_oid.to_string())?;
        tracing::info!(branch = %name, oid = %source_oid, "created branch");

        Ok(())
    }

    /// Advance whatever HEAD designates to `oid`
    ///
    /// An attached HEAD moves its branch. A detached HEAD is only moved when
    /// `allow_detached` is set; otherwise the call fails with `DetachedHeadCommitForbidden`.
    pub fn update_current(&self, oid: &ObjectId, allow_detached: bool) -> Result<()> {
        match self.read_head()? {
            Head::Attached(branch) => {
                self.update_ref_file(self.branch_path(&branch), oid.to_string())?;
                tracing::info!(branch = %branch, %oid, "moved branch");
            }
            Head::Detached(_) if allow_detached => {
                self.set_head_detached(oid)?;
                tracing::info!(%oid, "moved detached HEAD");
            }
            Head::Detached(_) => return Err(RepositoryError::DetachedHeadCommitForbidden),
        }

        Ok(())
    }

    /// Every branch name, sorted
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(heads_path.as_ref()).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> Result<()> {
        // create all the parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn read_ref_content(path: &Path) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let content = content.trim();
        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(content.to_string()))
        }
    }
}
