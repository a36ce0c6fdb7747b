//! Parsers for the human-readable output of the external tool.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::command::Subcommand;
use crate::error::{DriveError, Result};
use crate::models::{size_to_bytes, EntryKind, Record, RemoteEntry};

/// Row of `gdrive list`: id, name, type, optional size + unit, created.
static LISTING_ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<id>\S+)\s+(?P<name>.*?)\s+(?P<kind>[a-z]{3})\s+(?:(?P<size>\d+(?:\.\d+)?)\s+(?P<unit>[KMGTP]?B)\s+)?(?P<created>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s*$",
    )
    .expect("Invalid listing row regex")
});

/// Row of `gdrive sync list`: id, name, created.
static SYNC_ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<id>\S+)\s+(?P<name>.*?)\s+(?P<created>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s*$",
    )
    .expect("Invalid sync row regex")
});

/// Parsed output of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Listing(Vec<RemoteEntry>),
    Record(Record),
    Created(String),
    Log(String),
}

impl Output {
    pub fn into_listing(self, subcommand: Subcommand) -> Result<Vec<RemoteEntry>> {
        match self {
            Output::Listing(entries) => Ok(entries),
            _ => Err(DriveError::UnsupportedFormat(subcommand.to_string())),
        }
    }

    pub fn into_record(self, subcommand: Subcommand) -> Result<Record> {
        match self {
            Output::Record(record) => Ok(record),
            _ => Err(DriveError::UnsupportedFormat(subcommand.to_string())),
        }
    }

    pub fn into_created(self, subcommand: Subcommand) -> Result<String> {
        match self {
            Output::Created(id) => Ok(id),
            _ => Err(DriveError::UnsupportedFormat(subcommand.to_string())),
        }
    }

    pub fn into_log(self, subcommand: Subcommand) -> Result<String> {
        match self {
            Output::Log(log) => Ok(log),
            _ => Err(DriveError::UnsupportedFormat(subcommand.to_string())),
        }
    }
}

/// Interpret raw stdout according to the subcommand that produced it.
pub fn parse(raw: &str, subcommand: Subcommand) -> Result<Output> {
    match subcommand {
        Subcommand::List => Ok(Output::Listing(parse_listing(raw))),
        Subcommand::SyncList => Ok(Output::Listing(parse_sync_listing(raw))),
        Subcommand::Info | Subcommand::About => Ok(Output::Record(parse_key_value(raw))),
        Subcommand::Mkdir => parse_created_id(raw).map(Output::Created),
        Subcommand::Upload
        | Subcommand::Update
        | Subcommand::Download
        | Subcommand::SyncUpload
        | Subcommand::SyncDownload => Ok(Output::Log(raw.to_string())),
    }
}

/// Like [`parse`], for a subcommand given by name.
pub fn parse_named(raw: &str, command: &str) -> Result<Output> {
    parse(raw, command.parse()?)
}

/// Non-blank lines after the column header.
fn table_rows(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().filter(|line| !line.trim().is_empty()).skip(1)
}

/// Parse the table printed by `gdrive list`.
pub fn parse_listing(raw: &str) -> Vec<RemoteEntry> {
    table_rows(raw)
        .filter_map(|line| match LISTING_ROW_REGEX.captures(line) {
            Some(caps) => Some(listing_entry(&caps)),
            None => {
                log::warn!("skipping unrecognized listing row: {:?}", line);
                None
            }
        })
        .collect()
}

fn listing_entry(caps: &Captures<'_>) -> RemoteEntry {
    let kind = EntryKind::from_code(&caps["kind"]);
    let size_bytes = match (caps.name("size"), caps.name("unit")) {
        (Some(size), Some(unit)) => size
            .as_str()
            .parse::<f64>()
            .ok()
            .and_then(|value| size_to_bytes(value, unit.as_str())),
        _ => None,
    };

    RemoteEntry {
        id: caps["id"].trim().to_string(),
        name: caps["name"].trim().to_string(),
        kind,
        size_bytes,
        created_at: parse_timestamp(&caps["created"]),
    }
}

/// Parse the table printed by `gdrive sync list`; every row is a directory.
pub fn parse_sync_listing(raw: &str) -> Vec<RemoteEntry> {
    table_rows(raw)
        .filter_map(|line| match SYNC_ROW_REGEX.captures(line) {
            Some(caps) => Some(RemoteEntry {
                created_at: parse_timestamp(&caps["created"]),
                ..RemoteEntry::directory(caps["id"].trim(), caps["name"].trim())
            }),
            None => {
                log::warn!("skipping unrecognized sync row: {:?}", line);
                None
            }
        })
        .collect()
}

/// Parse `Key Name: value` lines into a record keyed by `keyname`.
pub fn parse_key_value(raw: &str) -> Record {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let key: String = key
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase();
            (key, value.trim().to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// `Directory <id> created` -> `<id>`.
pub fn parse_created_id(raw: &str) -> Result<String> {
    raw.split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| DriveError::UnsupportedFormat(Subcommand::Mkdir.to_string()))
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp; independent of locale.
pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        s.trim(),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_listing_row_with_spaces_in_name() {
        let raw = "Id   Name   Type   Size   Created\n\
                   0B3X9GlR6Emb   my holiday photo.jpg   bin    6.1 MB   2015-07-18 16:43:58\n";
        let entries = parse_listing(raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "my holiday photo.jpg");
        assert_eq!(entries[0].size_bytes, Some(6_100_000));
        assert_eq!(entries[0].created_at, Some(datetime!(2015-07-18 16:43:58)));
    }

    #[test]
    fn test_directory_row_without_size() {
        let raw = "Id   Name   Type   Size   Created\n\
                   0B3X9dir   Projects   dir             2016-01-02 03:04:05\n";
        let entries = parse_listing(raw);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[0].size_bytes, None);
    }

    #[test]
    fn test_unmatched_rows_are_skipped() {
        let raw = "Id Name Type Size Created\ngarbage\n";
        assert!(parse_listing(raw).is_empty());
    }

    #[test]
    fn test_key_value() {
        let record = parse_key_value("Max upload size: 5.2 TB\nUser: Jo, jo@example.com\nnot a pair\n");
        assert_eq!(record["maxuploadsize"], "5.2 TB");
        assert_eq!(record["user"], "Jo, jo@example.com");
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_created_id() {
        assert_eq!(parse_created_id("Directory 0B3Xabc created\n").unwrap(), "0B3Xabc");
        assert!(parse_created_id("").is_err());
    }

    #[test]
    fn test_wrong_shape_is_unsupported() {
        let output = parse("Uploading foo\n", Subcommand::Upload).unwrap();
        let err = output.into_listing(Subcommand::Upload).unwrap_err();
        assert!(matches!(err, DriveError::UnsupportedFormat(ref c) if c == "upload"));
    }
}
