//! Object database
//!
//! Content-addressable storage for blobs and commits. Each kind lives on its own shelf:
//!
//! - `.minigit/objects/<xx>/<38 hex>`: blobs, keyed by the digest of their content
//! - `.minigit/commits/<xx>/<38 hex>`: commits, keyed by the digest of their identity
//!
//! Objects are zlib-compressed and written through a temporary file renamed into place, so a
//! concurrent reader sees either nothing or the whole object. Writes are idempotent: storing an
//! object whose id is already present leaves the existing file untouched.

use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::log::rev_list::{self, RevList};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, FileMap, MAX_PARENTS, is_recordable_path};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use fake::rand;
use std::collections::HashSet;
use std::io::{Cursor, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Shelf holding blobs
pub const OBJECTS_DIR: &str = "objects";

/// Shelf holding commits
pub const COMMITS_DIR: &str = "commits";

#[derive(Debug)]
pub struct Database {
    /// Path to the repository directory (typically `.minigit`)
    path: Box<Path>,
}

// TODO: keep recently loaded commits in memory once ancestry walks over long histories show up in profiles
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> PathBuf {
        self.path.join(OBJECTS_DIR)
    }

    pub fn commits_path(&self) -> PathBuf {
        self.path.join(COMMITS_DIR)
    }

    /// Store `content` as a blob and return its id
    ///
    /// Storing identical content twice yields the same id and a single stored object.
    pub fn put(&self, content: impl Into<Bytes>) -> Result<ObjectId> {
        let blob = Blob::new(content);
        let oid = blob.object_id();

        if self.store(&self.objects_path(), &oid, blob.serialize())? {
            tracing::debug!(%oid, size = blob.content().len(), "stored blob");
        }

        Ok(oid)
    }

    /// Load the content of a blob
    ///
    /// Fails with `NotFound` if no blob has this id.
    pub fn get(&self, oid: &ObjectId) -> Result<Bytes> {
        let mut reader = self.read_object(&self.objects_path(), oid, "blob")?;
        Self::expect_type(&mut reader, ObjectType::Blob, oid)?;

        Ok(Blob::deserialize(reader)?.into_content())
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.objects_path().join(oid.to_path()).exists()
    }

    /// Freeze a new commit
    ///
    /// Every parent must already be stored, and at most two parents are accepted; otherwise
    /// the call fails with `InvalidParent`. Re-creating an identical commit is a no-op that
    /// returns it again, while a different commit colliding on the same id (same message,
    /// timestamp and files but other parents) fails with `AlreadyExists`. Paths that cannot be
    /// recorded fail with `InvalidPath` before anything is stored.
    pub fn create_commit(
        &self,
        parents: Vec<ObjectId>,
        files: FileMap,
        message: String,
        timestamp: i64,
    ) -> Result<Commit> {
        if parents.len() > MAX_PARENTS {
            return Err(RepositoryError::InvalidParent(format!(
                "a commit takes at most {MAX_PARENTS} parents, got {}",
                parents.len()
            )));
        }

        if let Some(missing) = parents.iter().find(|parent| !self.has_commit(parent)) {
            return Err(RepositoryError::InvalidParent(missing.to_string()));
        }

        if let Some(path) = files.keys().find(|path| !is_recordable_path(path)) {
            return Err(RepositoryError::InvalidPath(path.clone()));
        }

        let commit = Commit::new(parents, files, message, timestamp);

        if self.has_commit(commit.oid()) {
            let existing = self.load_commit(commit.oid())?;
            if existing.parents() != commit.parents() {
                return Err(RepositoryError::AlreadyExists(format!(
                    "commit {} with different parents",
                    commit.oid()
                )));
            }

            return Ok(existing);
        }

        self.store(&self.commits_path(), commit.oid(), commit.serialize())?;
        tracing::info!(oid = %commit.oid(), parents = commit.parents().len(), "created commit");

        Ok(commit)
    }

    /// Load a commit
    ///
    /// Fails with `NotFound` if absent and with `Corrupt` if the stored record does not hash
    /// back to the id it is filed under.
    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        let mut reader = self.read_object(&self.commits_path(), oid, "commit")?;
        Self::expect_type(&mut reader, ObjectType::Commit, oid)?;

        let commit = Commit::deserialize(reader)?;
        if commit.oid() != oid {
            return Err(RepositoryError::corrupt(format!(
                "commit filed under {oid} hashes to {}",
                commit.oid()
            )));
        }

        Ok(commit)
    }

    pub fn has_commit(&self, oid: &ObjectId) -> bool {
        self.commits_path().join(oid.to_path()).exists()
    }

    /// Every commit reachable from `oid` through any parent edge, `oid` included
    pub fn ancestors_of(&self, oid: &ObjectId) -> Result<HashSet<ObjectId>> {
        rev_list::ancestors_with(oid, |commit_oid| {
            Ok(self.load_commit(commit_oid)?.parents().to_vec())
        })
    }

    /// Lazy first-parent history starting at `oid`
    pub fn log(&self, oid: &ObjectId) -> RevList<'_> {
        RevList::new(self, Some(oid.clone()))
    }

    /// Lazy per-file line diff between two commits
    pub fn tree_diff(&self, old_oid: &ObjectId, new_oid: &ObjectId) -> Result<TreeDiff<'_>> {
        let old_commit = self.load_commit(old_oid)?;
        let new_commit = self.load_commit(new_oid)?;

        Ok(TreeDiff::new(self, old_commit.files(), new_commit.files()))
    }

    /// Find every commit whose id starts with `prefix`
    pub fn find_commits_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        Self::find_by_prefix(&self.commits_path(), prefix)
    }

    /// Find every blob whose id starts with `prefix`
    pub fn find_blobs_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        Self::find_by_prefix(&self.objects_path(), prefix)
    }

    fn find_by_prefix(shelf: &Path, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() < 2 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = shelf.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    /// Write an object unless it already exists; returns whether anything was written
    fn store(&self, shelf: &Path, oid: &ObjectId, content: Bytes) -> Result<bool> {
        let object_path = shelf.join(oid.to_path());
        if object_path.exists() {
            return Ok(false);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| RepositoryError::corrupt(format!("invalid object path {oid}")))?;
        std::fs::create_dir_all(object_dir)?;

        self.write_object(object_dir, &object_path, content)?;

        Ok(true)
    }

    fn read_object(
        &self,
        shelf: &Path,
        oid: &ObjectId,
        kind: &'static str,
    ) -> Result<Cursor<Bytes>> {
        let object_path = shelf.join(oid.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::not_found(kind, oid));
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Cursor::new(Self::decompress(&compressed)?))
    }

    fn expect_type(reader: &mut Cursor<Bytes>, expected: ObjectType, oid: &ObjectId) -> Result<()> {
        let (object_type, size) = ObjectType::parse_header(reader)?;
        let remaining = reader.get_ref().len() - reader.position() as usize;

        if object_type != expected || size != remaining {
            return Err(RepositoryError::corrupt(format!(
                "object {oid} is not a well-formed {expected}"
            )));
        }

        Ok(())
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, content: Bytes) -> Result<()> {
        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let content = Self::compress(&content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)?;
        file.write_all(&content)?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path)?;

        Ok(())
    }

    fn compress(data: &[u8]) -> Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        Ok(encoder.finish()?.into())
    }

    fn decompress(data: &[u8]) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|_| RepositoryError::corrupt("unable to decompress object content"))?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database_in(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    fn stored_files(shelf: &Path) -> usize {
        walkdir::WalkDir::new(shelf)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .count()
    }

    #[rstest]
    fn putting_identical_content_twice_stores_one_object(database_dir: TempDir) {
        let database = database_in(&database_dir);

        let first = database.put("hello").unwrap();
        let second = database.put("hello").unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_files(&database.objects_path()), 1);
        assert_eq!(database.get(&first).unwrap(), Bytes::from("hello"));
    }

    #[rstest]
    fn getting_an_unknown_blob_is_not_found(database_dir: TempDir) {
        let database = database_in(&database_dir);

        let error = database.get(&ObjectId::digest(b"missing")).unwrap_err();
        assert!(error.is_not_found());
    }

    #[rstest]
    fn commits_require_existing_parents(database_dir: TempDir) {
        let database = database_in(&database_dir);

        let result = database.create_commit(
            vec![ObjectId::digest(b"ghost")],
            FileMap::new(),
            "orphan".to_string(),
            1,
        );

        assert!(matches!(result, Err(RepositoryError::InvalidParent(_))));
    }

    #[rstest]
    fn commits_take_at_most_two_parents(database_dir: TempDir) {
        let database = database_in(&database_dir);
        let root = database
            .create_commit(vec![], FileMap::new(), "root".to_string(), 1)
            .unwrap();

        let result = database.create_commit(
            vec![root.oid().clone(); 3],
            FileMap::new(),
            "octopus".to_string(),
            2,
        );

        assert!(matches!(result, Err(RepositoryError::InvalidParent(_))));
    }

    #[rstest]
    fn commits_refuse_paths_with_control_characters(database_dir: TempDir) {
        let database = database_in(&database_dir);
        let blob = database.put("hello").unwrap();

        let result = database.create_commit(
            vec![],
            FileMap::from([("a\nfile b".to_string(), blob)]),
            "c1".to_string(),
            1,
        );

        assert!(matches!(result, Err(RepositoryError::InvalidPath(path)) if path == "a\nfile b"));
        assert_eq!(stored_files(&database.commits_path()), 0);
    }

    #[rstest]
    fn stored_commits_load_back(database_dir: TempDir) {
        let database = database_in(&database_dir);
        let blob = database.put("hello").unwrap();
        let root = database
            .create_commit(
                vec![],
                FileMap::from([("f.txt".to_string(), blob)]),
                "c1".to_string(),
                100,
            )
            .unwrap();

        assert_eq!(database.load_commit(root.oid()).unwrap(), root);
        assert!(database.has_commit(root.oid()));
        assert!(!database.contains(root.oid()));
    }

    #[rstest]
    fn recreating_a_commit_is_idempotent_but_parent_collisions_fail(database_dir: TempDir) {
        let database = database_in(&database_dir);
        let root = database
            .create_commit(vec![], FileMap::new(), "root".to_string(), 1)
            .unwrap();
        let child = database
            .create_commit(vec![root.oid().clone()], FileMap::new(), "child".to_string(), 2)
            .unwrap();

        let again = database
            .create_commit(vec![root.oid().clone()], FileMap::new(), "child".to_string(), 2)
            .unwrap();
        assert_eq!(again, child);

        let collision =
            database.create_commit(vec![], FileMap::new(), "child".to_string(), 2);
        assert!(matches!(collision, Err(RepositoryError::AlreadyExists(_))));
    }

    #[rstest]
    fn prefixes_resolve_to_matching_commits(database_dir: TempDir) {
        let database = database_in(&database_dir);
        let root = database
            .create_commit(vec![], FileMap::new(), "root".to_string(), 1)
            .unwrap();

        assert_eq!(
            database
                .find_commits_by_prefix(&root.oid().as_ref()[..6])
                .unwrap(),
            vec![root.oid().clone()]
        );
        assert!(database.find_commits_by_prefix("zz").unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn get_returns_what_put_stored(content in proptest::collection::vec(any::<u8>(), 0..512)) {
            let dir = TempDir::new().expect("Failed to create temp dir");
            let database = database_in(&dir);

            let oid = database.put(content.clone()).unwrap();
            prop_assert_eq!(database.get(&oid).unwrap(), Bytes::from(content));
        }
    }
}
