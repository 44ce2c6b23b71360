use std::collections::BTreeMap;
use std::fmt;

/// Kind of local work a working directory update would destroy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// A tracked file differs from its content in the current commit
    StaleFile,
    /// An untracked file sits where the update writes
    UntrackedOverwritten,
}

impl ConflictType {
    fn header(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => {
                "Your local changes to the following files would be overwritten:"
            }
            ConflictType::UntrackedOverwritten => {
                "The following untracked working tree files would be overwritten:"
            }
        }
    }

    fn footer(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => {
                "Please commit your changes before you switch branches or merge."
            }
            ConflictType::UntrackedOverwritten => {
                "Please move or remove them before you switch branches or merge."
            }
        }
    }
}

/// Paths refusing a working directory update, grouped by conflict type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceConflicts {
    conflicts: BTreeMap<ConflictType, Vec<String>>,
}

impl WorkspaceConflicts {
    pub fn record(&mut self, kind: ConflictType, path: String) {
        self.conflicts.entry(kind).or_default().push(path);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn paths(&self, kind: ConflictType) -> &[String] {
        self.conflicts.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for WorkspaceConflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = self
            .conflicts
            .iter()
            .map(|(kind, paths)| {
                let lines = paths
                    .iter()
                    .map(|path| format!("\t{path}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n{lines}\n{}", kind.header(), kind.footer())
            })
            .collect::<Vec<_>>();

        write!(f, "{}", sections.join("\n"))
    }
}
