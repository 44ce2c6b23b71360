use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::lock::RepositoryLock;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::MIN_PREFIX_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the repository directory inside the working directory
pub const REPOSITORY_DIR: &str = ".minigit";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "main";

/// Pending merge record inside the repository directory
pub const MERGE_STATE_FILE: &str = "MERGE_STATE";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Assemble a repository rooted at `path`, creating the directory if needed
    ///
    /// Nothing under `.minigit` is touched; use `init` to bootstrap it and [`Repository::open`]
    /// to require that it exists.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let repository_dir = path.join(REPOSITORY_DIR);

        let index = Index::new(repository_dir.join("index").into_boxed_path());
        let database = Database::new(repository_dir.clone().into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(repository_dir.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    /// Open an initialized repository
    ///
    /// Fails with `NotARepository` if `path` holds no `.minigit` directory.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let repository = Self::new(path, writer)?;

        if !repository.is_initialized() {
            return Err(RepositoryError::NotARepository(repository.path.to_path_buf()));
        }

        Ok(repository)
    }

    pub fn is_initialized(&self) -> bool {
        self.refs.head_path().is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn merge_state_path(&self) -> PathBuf {
        self.repository_path().join(MERGE_STATE_FILE)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Take the exclusive repository lock for the duration of a mutating operation
    pub fn lock(&self) -> Result<RepositoryLock> {
        RepositoryLock::acquire(&self.repository_path())
    }

    /// Resolve a user-supplied reference to a commit
    ///
    /// Tried in order: a branch name (which must have a commit), `HEAD`, a full commit id,
    /// then an unambiguous id prefix of at least four hex characters. Anything else fails
    /// with `UnknownRef`.
    pub fn resolve(&self, reference: &str) -> Result<ObjectId> {
        let unknown = || RepositoryError::UnknownRef(reference.to_string());

        if let Ok(branch) = BranchName::try_parse(reference.to_string())
            && self.refs.branch_exists(&branch)
        {
            return self.refs.read_branch(&branch)?.ok_or_else(unknown);
        }

        if reference == crate::areas::refs::HEAD_REF_NAME {
            return self.refs.head_oid()?.ok_or_else(unknown);
        }

        if ObjectId::is_full_hex(reference) {
            let oid = ObjectId::try_parse(reference.to_string())?;
            return if self.database.has_commit(&oid) {
                Ok(oid)
            } else {
                Err(unknown())
            };
        }

        if reference.len() >= MIN_PREFIX_LENGTH {
            let mut candidates = self.database.find_commits_by_prefix(reference)?;
            if candidates.len() == 1 {
                return Ok(candidates.remove(0));
            }
            if candidates.len() > 1 {
                tracing::warn!(
                    prefix = reference,
                    matches = candidates.len(),
                    "ambiguous commit prefix"
                );
            }
        }

        Err(unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::FileMap;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct RepositoryFixture {
        _dir: TempDir,
        repository: Repository,
    }

    #[fixture]
    fn repository() -> RepositoryFixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repository = Repository::new(dir.path(), Box::new(std::io::sink())).unwrap();
        repository.init().unwrap();

        RepositoryFixture {
            _dir: dir,
            repository,
        }
    }

    #[test]
    fn opening_an_uninitialized_directory_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        assert!(matches!(
            Repository::open(dir.path(), Box::new(std::io::sink())),
            Err(RepositoryError::NotARepository(_))
        ));
    }

    #[rstest]
    fn resolves_branches_head_full_ids_and_prefixes(repository: RepositoryFixture) {
        let repository = &repository.repository;
        let commit = repository
            .database()
            .create_commit(vec![], FileMap::new(), "c1".to_string(), 1)
            .unwrap();
        repository.refs().update_current(commit.oid(), false).unwrap();

        assert_eq!(&repository.resolve("main").unwrap(), commit.oid());
        assert_eq!(&repository.resolve("HEAD").unwrap(), commit.oid());
        assert_eq!(&repository.resolve(commit.oid().as_ref()).unwrap(), commit.oid());
        assert_eq!(
            &repository.resolve(&commit.oid().as_ref()[..8]).unwrap(),
            commit.oid()
        );
    }

    #[rstest]
    fn unresolvable_references_are_unknown(repository: RepositoryFixture) {
        let repository = &repository.repository;

        // main exists but has no commit yet
        assert!(matches!(
            repository.resolve("main"),
            Err(RepositoryError::UnknownRef(_))
        ));
        assert!(matches!(
            repository.resolve("nonexistent"),
            Err(RepositoryError::UnknownRef(_))
        ));
        assert!(matches!(
            repository.resolve(&"a".repeat(40)),
            Err(RepositoryError::UnknownRef(_))
        ));
    }
}
