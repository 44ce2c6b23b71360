use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeSet;

/// A path the three-way merge could not settle
///
/// `None` stands for "absent on that side", which is distinct from every blob id.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Conflict {
    pub path: String,
    pub base: Option<ObjectId>,
    pub ours: Option<ObjectId>,
    pub theirs: Option<ObjectId>,
}

/// Result of resolving three file maps against each other
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Cleanly resolved paths; paths resolving to "absent" are left out
    pub merged: FileMap,
    /// Unresolved paths, in path order
    pub conflicts: Vec<Conflict>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// File-level three-way merge over commit snapshots
///
/// Blob ids are compared, never blob contents: a path is settled when both sides agree, or
/// when only one side moved away from the base.
#[derive(Debug, new)]
pub struct ThreeWayMerge<'f> {
    base: &'f FileMap,
    ours: &'f FileMap,
    theirs: &'f FileMap,
}

impl ThreeWayMerge<'_> {
    pub fn resolve(&self) -> Resolution {
        let paths = self
            .base
            .keys()
            .chain(self.ours.keys())
            .chain(self.theirs.keys())
            .collect::<BTreeSet<_>>();

        let mut resolution = Resolution::default();

        for path in paths {
            let base = self.base.get(path);
            let ours = self.ours.get(path);
            let theirs = self.theirs.get(path);

            let resolved = if ours == theirs {
                ours
            } else if base == ours {
                theirs
            } else if base == theirs {
                ours
            } else {
                resolution.conflicts.push(Conflict::new(
                    path.clone(),
                    base.cloned(),
                    ours.cloned(),
                    theirs.cloned(),
                ));
                continue;
            };

            if let Some(oid) = resolved {
                resolution.merged.insert(path.clone(), oid.clone());
            }
        }

        resolution
    }
}
