use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Store the content of each path and stage it
    ///
    /// Directories expand to every file beneath them. Nothing is staged if any path is
    /// missing.
    pub fn add(&self, paths: &[String]) -> Result<Vec<(String, ObjectId)>> {
        let _lock = self.lock()?;

        let mut index = self.index();
        index.rehydrate()?;

        let files = paths
            .iter()
            .map(|path| self.workspace().list_files(Path::new(path)))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            let content = self.workspace().read_path(&file)?;
            let oid = self.database().put(content)?;

            index.stage(file.clone(), oid.clone());
            staged.push((file, oid));
        }

        index.write_updates()?;
        drop(index);

        for (path, oid) in &staged {
            tracing::debug!(%path, %oid, "staged file");
            writeln!(self.writer(), "add '{path}' ({})", oid.to_short_oid())?;
        }

        Ok(staged)
    }
}
