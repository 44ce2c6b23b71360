//! Working directory access
//!
//! The workspace is the file-system collaborator of the core: it reads files to be staged,
//! materializes commit snapshots on checkout and merge, and expands directories passed to
//! `add`. Paths handed to and returned by the workspace are repository-relative and
//! `/`-separated, matching the keys of a commit's file map.

use crate::areas::repository::REPOSITORY_DIR;
use crate::artifacts::objects::commit::is_recordable_path;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the content of a tracked path
    ///
    /// Fails with `NotFound` if the file does not exist.
    pub fn read_path(&self, path: &str) -> Result<Bytes> {
        let file_path = self.path.join(path);

        match std::fs::read(&file_path) {
            Ok(content) => Ok(Bytes::from(content)),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(RepositoryError::not_found("file", path))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Write `content` to a tracked path, creating parent directories as needed
    pub fn write_path(&self, path: &str, content: &[u8]) -> Result<()> {
        let file_path = self.path.join(path);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;

        Ok(())
    }

    /// Remove a tracked path and prune directories it leaves empty
    ///
    /// Removing a path that is already gone is not an error.
    pub fn remove_path(&self, path: &str) -> Result<()> {
        let file_path = self.path.join(path);

        match std::fs::remove_file(&file_path) {
            Ok(()) => self.prune_empty_parent_dirs(&file_path),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    /// Expand a path given by the user into the repository-relative files beneath it
    ///
    /// A file expands to itself; a directory expands to every file under it, sorted. The
    /// repository directory is never listed.
    pub fn list_files(&self, path: &Path) -> Result<Vec<String>> {
        let root_file_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        };

        if !root_file_path.exists() {
            return Err(RepositoryError::not_found("path", path.display()));
        }

        if root_file_path.is_dir() {
            let mut files = WalkDir::new(&root_file_path)
                .into_iter()
                .filter_entry(|entry| entry.file_name() != REPOSITORY_DIR)
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| self.to_repo_path(entry.path()))
                .collect::<Result<Vec<_>>>()?;
            files.sort();

            Ok(files)
        } else {
            Ok(vec![self.to_repo_path(&root_file_path)?])
        }
    }

    /// Convert a path under the workspace into its repository-relative, `/`-separated form
    ///
    /// Fails with `InvalidPath` for names a commit cannot record.
    pub fn to_repo_path(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(self.path.as_ref())
                .map(PathBuf::from)
                .map_err(|_| {
                    RepositoryError::not_found("path inside the repository", path.display())
                })?
        } else {
            path.to_path_buf()
        };

        let mut components = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => components.push(name.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(RepositoryError::not_found(
                        "path inside the repository",
                        path.display(),
                    ));
                }
            }
        }

        if components.is_empty() || components[0] == REPOSITORY_DIR {
            return Err(RepositoryError::not_found(
                "path inside the repository",
                path.display(),
            ));
        }

        let repo_path = components.join("/");
        if !is_recordable_path(&repo_path) {
            return Err(RepositoryError::InvalidPath(repo_path));
        }

        Ok(repo_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn workspace_in(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn written_paths_read_back(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);

        workspace.write_path("a/b/c.txt", b"content").unwrap();

        assert_eq!(workspace.read_path("a/b/c.txt").unwrap(), Bytes::from("content"));
    }

    #[rstest]
    fn missing_paths_are_not_found(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);

        assert!(workspace.read_path("nope.txt").unwrap_err().is_not_found());
    }

    #[rstest]
    fn removing_prunes_empty_directories(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);
        workspace.write_path("a/b/c.txt", b"content").unwrap();

        workspace.remove_path("a/b/c.txt").unwrap();
        workspace.remove_path("a/b/c.txt").unwrap();

        assert!(!workspace_dir.path().join("a").exists());
    }

    #[rstest]
    fn directories_expand_to_sorted_files_without_repository_dir(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);
        workspace.write_path("b.txt", b"b").unwrap();
        workspace.write_path("a/x.txt", b"x").unwrap();
        workspace.write_path(".minigit/HEAD", b"ref: refs/heads/main").unwrap();

        assert_eq!(
            workspace.list_files(Path::new(".")).unwrap(),
            vec!["a/x.txt".to_string(), "b.txt".to_string()]
        );
    }

    #[rstest]
    fn paths_outside_the_repository_are_rejected(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);

        assert!(workspace.to_repo_path(Path::new("../escape.txt")).is_err());
        assert!(workspace.to_repo_path(Path::new(".minigit/index")).is_err());
    }

    #[rstest]
    fn names_with_control_characters_are_rejected(workspace_dir: TempDir) {
        let workspace = workspace_in(&workspace_dir);
        workspace.write_path("a\nfile b", b"content").unwrap();

        assert!(matches!(
            workspace.list_files(Path::new(".")),
            Err(RepositoryError::InvalidPath(path)) if path == "a\nfile b"
        ));
        assert!(matches!(
            workspace.to_repo_path(Path::new("tab\there")),
            Err(RepositoryError::InvalidPath(_))
        ));
    }
}
