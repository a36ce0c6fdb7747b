//! Local side of transfers: inspecting paths and expanding patterns.

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::{DriveError, Result};
use crate::models::EntryKind;

/// Kind of whatever lives at `path`, or `None` when nothing does.
pub fn local_kind(path: &Path) -> Option<EntryKind> {
    fs::metadata(path).ok().map(|meta| {
        if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    })
}

/// Final component of `path`. Paths like `.` or `foo/..` are named after the
/// directory they point at; `/` has no name and gives an empty string.
fn base_name(path: &Path) -> String {
    let name = match path.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => fs::canonicalize(path)
            .ok()
            .and_then(|canonical| canonical.file_name().map(|n| n.to_os_string())),
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Local file or directory about to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSource {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub exists: bool,
    pub name: String,
}

impl LocalSource {
    pub fn inspect(path: &Path) -> Self {
        let kind = local_kind(path);
        Self {
            path: path.to_path_buf(),
            kind: kind.unwrap_or(EntryKind::Unknown),
            exists: kind.is_some(),
            name: base_name(path),
        }
    }
}

/// Local place a download should land.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDestination {
    pub path: PathBuf,
    /// `None` when `path` does not exist.
    pub kind: Option<EntryKind>,
    /// What already sits at `path/<remote name>` when `path` is a directory.
    pub child_kind: Option<EntryKind>,
}

impl LocalDestination {
    pub fn inspect(path: &Path, remote_name: &str) -> Self {
        let kind = local_kind(path);
        let child_kind = match kind {
            Some(EntryKind::Directory) if !remote_name.is_empty() => {
                local_kind(&path.join(remote_name))
            }
            _ => None,
        };
        Self {
            path: path.to_path_buf(),
            kind,
            child_kind,
        }
    }

    pub fn file_name(&self) -> String {
        base_name(&self.path)
    }

    /// Directory holding `path`; `.` for bare relative names.
    pub fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Expand brace patterns like `file_{1,2,3}.txt` into multiple patterns.
///
/// Groups may nest (`{a,{b,c}}`). A `{` without its closing `}` is kept as a
/// literal character.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(start) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some((len, alternatives)) = brace_group(&pattern[start..]) else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..start];
    let suffix = &pattern[start + len + 1..];

    alternatives
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt.trim(), suffix)))
        .collect()
}

/// Split the group opening at `group[0]` into its top-level alternatives.
/// Returns the offset of the matching `}` as well.
fn brace_group(group: &str) -> Option<(usize, Vec<&str>)> {
    let mut depth = 0usize;
    let mut from = 1;
    let mut alternatives = Vec::new();

    for (i, c) in group.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    alternatives.push(&group[from..i]);
                    return Some((i, alternatives));
                }
            }
            ',' if depth == 1 => {
                alternatives.push(&group[from..i]);
                from = i + 1;
            }
            _ => {}
        }
    }

    None
}

/// Expand glob and brace patterns into existing files and directories.
///
/// A pattern without glob matches is kept as a literal path when it exists.
/// Results are sorted and deduplicated.
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        for expanded in expand_braces(pattern.as_ref()) {
            let matches: Vec<PathBuf> = glob(&expanded)?.filter_map(|r| r.ok()).collect();

            if matches.is_empty() {
                let path = PathBuf::from(&expanded);
                if path.exists() {
                    paths.push(path);
                } else {
                    log::warn!("no files matched pattern: {}", expanded);
                }
            } else {
                paths.extend(matches);
            }
        }
    }

    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        let joined: Vec<&str> = patterns.iter().map(|p| p.as_ref()).collect();
        return Err(DriveError::NoFilesMatched(joined.join(" ")));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces_simple() {
        let result = expand_braces("file_{1,2,3}.txt");
        assert_eq!(result, vec!["file_1.txt", "file_2.txt", "file_3.txt"]);
    }

    #[test]
    fn test_expand_braces_nested() {
        let result = expand_braces("{a,b}_{1,2}.txt");
        assert_eq!(result, vec!["a_1.txt", "a_2.txt", "b_1.txt", "b_2.txt"]);
    }

    #[test]
    fn test_expand_braces_inner_group() {
        let result = expand_braces("{a,{b,c}}.txt");
        assert_eq!(result, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_expand_braces_unclosed_is_literal() {
        assert_eq!(expand_braces("file_{1.txt"), vec!["file_{1.txt"]);
        assert_eq!(expand_braces("{x}"), vec!["x"]);
    }

    #[test]
    fn test_source_named_after_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.file_name().unwrap().to_string_lossy().into_owned();

        let source = LocalSource::inspect(Path::new("."));
        assert_eq!(source.kind, EntryKind::Directory);
        assert_eq!(source.name, expected);
    }

    #[test]
    fn test_source_name_through_parent_component() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("inner");
        fs::create_dir(&nested).unwrap();

        let expected = fs::canonicalize(dir.path()).unwrap();
        let source = LocalSource::inspect(&nested.join(".."));
        assert_eq!(source.name, expected.file_name().unwrap().to_string_lossy());
    }

    #[test]
    fn test_filesystem_root_has_no_name() {
        assert_eq!(LocalSource::inspect(Path::new("/")).name, "");
    }

    #[test]
    fn test_expand_patterns_literal_and_glob() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();

        let root = dir.path().display().to_string();
        let patterns = vec![format!("{}/*.txt", root), format!("{}/photos", root)];
        let paths = expand_patterns(&patterns).unwrap();
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_expand_patterns_nothing() {
        let err = expand_patterns(&["/definitely/not/here/*.bin"]).unwrap_err();
        assert!(matches!(err, DriveError::NoFilesMatched(_)));
    }

    #[test]
    fn test_destination_inspection() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("report.pdf"), b"x").unwrap();

        let dest = LocalDestination::inspect(dir.path(), "report.pdf");
        assert_eq!(dest.kind, Some(EntryKind::Directory));
        assert_eq!(dest.child_kind, Some(EntryKind::File));

        let missing = LocalDestination::inspect(&dir.path().join("nope"), "report.pdf");
        assert_eq!(missing.kind, None);
    }
}
