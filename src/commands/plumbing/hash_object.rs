use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    pub fn hash_object(&self, object_path: &str, write: bool) -> Result<ObjectId> {
        let path = self.workspace().to_repo_path(Path::new(object_path))?;
        let content = self.workspace().read_path(&path)?;

        let object_id = if write {
            self.database().put(content)?
        } else {
            Blob::new(content).object_id()
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}
