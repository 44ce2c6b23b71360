use crate::areas::repository::Repository;
use crate::artifacts::objects::MIN_PREFIX_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;

impl Repository {
    /// Print the content of a blob given its id or an unambiguous prefix of it
    pub fn cat_file(&self, object_id: &str) -> Result<Bytes> {
        let oid = self.resolve_blob(object_id)?;
        let content = self.database().get(&oid)?;

        self.writer().write_all(&content)?;

        Ok(content)
    }

    fn resolve_blob(&self, object_id: &str) -> Result<ObjectId> {
        if ObjectId::is_full_hex(object_id) {
            return ObjectId::try_parse(object_id.to_string());
        }

        if object_id.len() >= MIN_PREFIX_LENGTH {
            let mut candidates = self.database().find_blobs_by_prefix(object_id)?;
            if candidates.len() == 1 {
                return Ok(candidates.remove(0));
            }
        }

        Err(RepositoryError::not_found("blob", object_id))
    }
}
