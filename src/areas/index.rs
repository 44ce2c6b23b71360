//! Staging area
//!
//! The staging area holds the pending `path -> blob id` bindings recorded by `add`. A commit
//! lays these bindings over its parent's snapshot, then clears the area. The area is persisted
//! in `.minigit/index` so that `add` and `commit` can run in different processes.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_FIXED_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::collections::BTreeMap;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.minigit/index`)
    path: Box<Path>,
    /// Staged bindings mapped by path
    entries: BTreeMap<String, IndexEntry>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the staged bindings from disk
    ///
    /// A missing or empty index file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;

        for _ in 0..entries_count {
            let fixed = reader.read(ENTRY_FIXED_SIZE)?;
            let path = reader.read(IndexEntry::path_len(&fixed))?;
            let entry = IndexEntry::deserialize(&fixed, &path)?;

            self.entries.insert(entry.path.clone(), entry);
        }

        reader.verify()?;
        tracing::debug!(entries = entries_count, "loaded staging index");

        Ok(())
    }

    fn parse_header(reader: &mut Checksum) -> Result<u32> {
        let header = IndexHeader::deserialize(&reader.read(HEADER_SIZE)?)?;

        if header.marker != SIGNATURE {
            return Err(RepositoryError::corrupt("invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(RepositoryError::corrupt(format!(
                "unsupported index file version: {}",
                header.version
            )));
        }

        Ok(header.entries_count)
    }

    /// Record or overwrite the binding for `path`
    pub fn stage(&mut self, path: String, oid: ObjectId) {
        if self.entries.get(&path).is_some_and(|entry| entry.oid == oid) {
            return;
        }

        self.entries
            .insert(path.clone(), IndexEntry::new(path, oid));
        self.changed = true;
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_staged(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read-only copy of the staged bindings, as consumed by commit creation
    pub fn snapshot(&self) -> FileMap {
        self.entries
            .values()
            .map(|entry| (entry.path.clone(), entry.oid.clone()))
            .collect()
    }

    /// Drop every staged binding
    ///
    /// Only called once a commit has been recorded and its branch advanced.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.changed = true;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Persist the staged bindings
    ///
    /// The entries go to a temporary file next to the index, which is then renamed over it,
    /// so an interrupted write leaves the previous index readable.
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the temporary file during writing.
    pub fn write_updates(&mut self) -> Result<()> {
        let temp_path = self.temp_path();

        {
            let mut temp_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let lock = file_guard::lock(&mut temp_file, file_guard::Lock::Exclusive, 0, 1)?;

            let mut writer = Checksum::new(lock);

            let header =
                IndexHeader::new(SIGNATURE.to_string(), VERSION, self.entries.len() as u32);
            writer.write(&header.serialize()?)?;

            for entry in self.entries.values() {
                writer.write(&entry.serialize()?)?;
            }

            writer.write_checksum()?;
        }

        // rename the temp file over the index to make the update atomic
        std::fs::rename(&temp_path, &self.path)?;
        self.changed = false;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self.path.as_os_str().to_os_string();
        file_name.push(".tmp");

        PathBuf::from(file_name)
    }
}
