//! Walking a virtual path down to a Drive object id.

use crate::error::{DriveError, Result};
use crate::models::{RemoteEntry, ROOT_ID};
use crate::path::{is_root_segment, VirtualPath};

/// Anything that can list the children of a remote directory.
pub trait ListingSource {
    fn children(&self, parent_id: &str) -> Result<Vec<RemoteEntry>>;
}

/// Outcome of resolving a path.
///
/// `entry` is the not-found sentinel (empty id) when the final segment does
/// not exist; `parent_id` is then where it would be created.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub entry: RemoteEntry,
    pub parent_id: String,
    pub siblings: Vec<RemoteEntry>,
}

impl ResolutionResult {
    fn root() -> Self {
        Self {
            entry: RemoteEntry::root(),
            parent_id: ROOT_ID.to_string(),
            siblings: Vec::new(),
        }
    }
}

/// Resolve `path` one segment at a time, listing each parent afresh.
pub fn resolve<S: ListingSource + ?Sized>(
    source: &S,
    path: &VirtualPath,
) -> Result<ResolutionResult> {
    let segments = path.segments();
    let mut parent_id = ROOT_ID.to_string();
    let mut traversed = String::new();

    for (index, segment) in segments.iter().enumerate() {
        let last = index + 1 == segments.len();

        if is_root_segment(segment) {
            parent_id = ROOT_ID.to_string();
            traversed.clear();
            continue;
        }

        let siblings = source.children(&parent_id)?;
        let found = siblings.iter().find(|e| e.name == *segment).cloned();

        let entry = match found {
            Some(entry) => entry,
            None if last => {
                log::debug!("'{}' not found under {}", segment, parent_id);
                return Ok(ResolutionResult {
                    entry: RemoteEntry::not_found(segment.as_str()),
                    parent_id,
                    siblings,
                });
            }
            None => return Err(DriveError::path_not_found(segment.as_str(), prefix(&traversed))),
        };

        if last {
            return Ok(ResolutionResult {
                entry,
                parent_id,
                siblings,
            });
        }

        if !entry.is_dir() {
            return Err(DriveError::TypeMismatch(format!(
                "'{}/{}' is not a directory",
                traversed, segment
            )));
        }

        traversed.push('/');
        traversed.push_str(segment);
        parent_id = entry.id;
    }

    // Only reachable when the final segment is a root alias.
    Ok(ResolutionResult::root())
}

fn prefix(traversed: &str) -> String {
    if traversed.is_empty() {
        "/".to_string()
    } else {
        traversed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    use crate::models::EntryKind;

    struct Tree {
        dirs: HashMap<&'static str, Vec<RemoteEntry>>,
        calls: Cell<usize>,
    }

    impl ListingSource for Tree {
        fn children(&self, parent_id: &str) -> Result<Vec<RemoteEntry>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.dirs.get(parent_id).cloned().unwrap_or_default())
        }
    }

    fn file(id: &str, name: &str) -> RemoteEntry {
        RemoteEntry {
            kind: EntryKind::File,
            ..RemoteEntry::directory(id, name)
        }
    }

    fn tree() -> Tree {
        let mut dirs = HashMap::new();
        dirs.insert(
            "root",
            vec![RemoteEntry::directory("D1", "docs"), file("F0", "top.txt")],
        );
        dirs.insert("D1", vec![file("F1", "a.txt")]);
        Tree {
            dirs,
            calls: Cell::new(0),
        }
    }

    #[test]
    fn test_alias_resets_to_root_without_listing() {
        let tree = tree();
        let result = resolve(&tree, &VirtualPath::parse("My Drive")).unwrap();
        assert_eq!(result.entry.id, ROOT_ID);
        assert_eq!(tree.calls.get(), 0);
    }

    #[test]
    fn test_file_mid_path_is_type_mismatch() {
        let err = resolve(&tree(), &VirtualPath::parse("/top.txt/x")).unwrap_err();
        assert!(matches!(err, DriveError::TypeMismatch(_)));
    }

    #[test]
    fn test_directory_at_end() {
        let result = resolve(&tree(), &VirtualPath::parse("/docs/")).unwrap();
        assert_eq!(result.entry.id, "D1");
        assert_eq!(result.parent_id, ROOT_ID);
        assert_eq!(result.siblings.len(), 2);
    }
}
