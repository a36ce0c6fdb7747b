//! Records produced from `gdrive` output.

use std::collections::BTreeMap;
use std::fmt;

use time::PrimitiveDateTime;

/// Id the external tool accepts for the top of "My Drive".
pub const ROOT_ID: &str = "root";

/// What kind of object a listing row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Unknown,
}

impl EntryKind {
    /// Map the three-letter type column of `gdrive list`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "dir" => EntryKind::Directory,
            "bin" => EntryKind::File,
            _ => EntryKind::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EntryKind::File => "bin",
            EntryKind::Directory => "dir",
            EntryKind::Unknown => "???",
        }
    }
}

/// A file or directory as reported by the external tool.
///
/// An empty `id` marks a location that was resolved but holds nothing yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub id: String,
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: Option<u64>,
    pub created_at: Option<PrimitiveDateTime>,
}

impl RemoteEntry {
    /// Sentinel for a name that does not exist (yet) under some parent.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            kind: EntryKind::Unknown,
            size_bytes: None,
            created_at: None,
        }
    }

    /// The top of the user's drive.
    pub fn root() -> Self {
        Self::directory(ROOT_ID, "My Drive")
    }

    pub fn directory(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Directory,
            size_bytes: None,
            created_at: None,
        }
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl fmt::Display for RemoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size_str = self
            .size_bytes
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let id = if self.exists() { self.id.as_str() } else { "-" };
        write!(f, "{:<34} {:>10} {:<4} {}", id, size_str, self.kind.code(), self.name)
    }
}

/// Field map parsed from `key: value` output (`info`, `about`).
pub type Record = BTreeMap<String, String>;

/// Size units in the order `gdrive` prints them.
pub const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format bytes the way `gdrive` does (decimal units).
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, SIZE_UNITS[unit])
    }
}

/// Convert a `6.1 MB` style size back into bytes.
pub fn size_to_bytes(value: f64, unit: &str) -> Option<u64> {
    let exponent = SIZE_UNITS.iter().position(|u| *u == unit)?;
    Some((value * 1000f64.powi(exponent as i32)).round() as u64)
}

/// Contents of a remote directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub entries: Vec<RemoteEntry>,
    pub parent_id: String,
}

/// Logs of both halves of a sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub upload_log: String,
    pub download_log: String,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.upload_log.trim_end())?;
        write!(f, "{}", self.download_log.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1000), "1.0 KB");
        assert_eq!(format_size(1500), "1.5 KB");
        assert_eq!(format_size(6_100_000), "6.1 MB");
        assert_eq!(format_size(2_000_000_000), "2.0 GB");
    }

    #[test]
    fn test_size_to_bytes() {
        assert_eq!(size_to_bytes(6.1, "MB"), Some(6_100_000));
        assert_eq!(size_to_bytes(512.0, "B"), Some(512));
        assert_eq!(size_to_bytes(1.0, "XB"), None);
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(EntryKind::from_code("dir"), EntryKind::Directory);
        assert_eq!(EntryKind::from_code("bin"), EntryKind::File);
        assert_eq!(EntryKind::from_code("doc"), EntryKind::Unknown);
    }

    #[test]
    fn test_not_found_sentinel() {
        let entry = RemoteEntry::not_found("report.pdf");
        assert!(!entry.exists());
        assert_eq!(entry.name, "report.pdf");
    }

    #[test]
    fn test_remote_entry_display() {
        let entry = RemoteEntry {
            id: "abc123".to_string(),
            name: "test.txt".to_string(),
            kind: EntryKind::File,
            size_bytes: Some(1500),
            created_at: None,
        };

        let display = format!("{}", entry);
        assert!(display.contains("abc123"));
        assert!(display.contains("test.txt"));
        assert!(display.contains("1.5 KB"));
        assert!(display.contains("bin"));
    }

    #[test]
    fn test_remote_entry_display_columns() {
        let entry = RemoteEntry::directory("D1", "docs");
        let display = format!("{}", entry);
        let header = format!("{:<34} {:>10} {:<4} {}", "ID", "SIZE", "TYPE", "NAME");

        assert_eq!(display.find("dir"), header.find("TYPE"));
        assert_eq!(display.find("docs"), header.find("NAME"));
        assert!(!display.contains('\t'));
    }
}
