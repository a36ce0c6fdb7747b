//! Tests for parsing the external tool's text output.

use gdrive_wrap::command::Subcommand;
use gdrive_wrap::error::DriveError;
use gdrive_wrap::models::EntryKind;
use gdrive_wrap::parser::{parse, parse_listing, parse_named, Output};
use time::macros::datetime;

const LISTING: &str = "\
Id                             Name                    Type   Size     Created

0B3X9GlR6EmbnZ3gyeGw4d3ozbUk   drive-windows-x64.exe   bin    6.1 MB   2015-07-18 16:43:58
0B3X9GlR6EmbnOVRQN0t6RkxVQk0   Quarterly Report  v2    bin    512 B    2015-07-18 16:44:01
";

mod listing {
    use super::*;

    #[test]
    fn two_rows_after_header() {
        let entries = parse_listing(LISTING);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id, "0B3X9GlR6EmbnZ3gyeGw4d3ozbUk");
        assert_eq!(entries[0].name, "drive-windows-x64.exe");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].size_bytes, Some(6_100_000));

        assert_eq!(entries[1].name, "Quarterly Report  v2");
        assert_eq!(entries[1].size_bytes, Some(512));
    }

    #[test]
    fn timestamps_are_locale_independent() {
        let entries = parse_listing(LISTING);
        assert_eq!(entries[0].created_at, Some(datetime!(2015-07-18 16:43:58)));
        assert_eq!(entries[1].created_at, Some(datetime!(2015-07-18 16:44:01)));
    }

    #[test]
    fn header_only() {
        assert!(parse_listing("Id   Name   Type   Size   Created\n").is_empty());
        assert!(parse_listing("").is_empty());
    }

    #[test]
    fn unknown_kind_code() {
        let raw = "Id Name Type Size Created\n1xyz   Budget   doc             2019-02-03 04:05:06\n";
        let entries = parse_listing(raw);
        assert_eq!(entries[0].kind, EntryKind::Unknown);
    }

    #[test]
    fn sync_listing_rows_are_directories() {
        let raw = "Id                             Name        Created\n\
                   0B3X9sync                      my notes    2016-02-21 20:47:10\n";
        let entries = parse(raw, Subcommand::SyncList)
            .unwrap()
            .into_listing(Subcommand::SyncList)
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "my notes");
        assert_eq!(entries[0].kind, EntryKind::Directory);
    }
}

mod key_value {
    use super::*;

    #[test]
    fn info_record() {
        let record = parse("Id: 123\nName: foo bar\n", Subcommand::Info)
            .unwrap()
            .into_record(Subcommand::Info)
            .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], "123");
        assert_eq!(record["name"], "foo bar");
    }

    #[test]
    fn value_keeps_later_colons() {
        let record = parse("Created: 2016-02-21 20:47:10\n", Subcommand::Info)
            .unwrap()
            .into_record(Subcommand::Info)
            .unwrap();
        assert_eq!(record["created"], "2016-02-21 20:47:10");
    }
}

mod other_formats {
    use super::*;

    #[test]
    fn mkdir_second_token() {
        let output = parse("Directory 0B3Xnew created\n", Subcommand::Mkdir).unwrap();
        assert_eq!(output, Output::Created("0B3Xnew".to_string()));
    }

    #[test]
    fn transfer_output_is_opaque_log() {
        let raw = "Uploading a.txt\nUploaded 0B3X at 1.2 KB/s, total 1.5 KB\n";
        for subcommand in [
            Subcommand::Upload,
            Subcommand::Update,
            Subcommand::Download,
            Subcommand::SyncUpload,
            Subcommand::SyncDownload,
        ] {
            assert_eq!(parse(raw, subcommand).unwrap(), Output::Log(raw.to_string()));
        }
    }

    #[test]
    fn named_command() {
        let output = parse_named("Used: 1 GB\n", "about").unwrap();
        assert!(matches!(output, Output::Record(_)));
    }

    #[test]
    fn unrecognized_command() {
        let err = parse_named("whatever", "share").unwrap_err();
        match err {
            DriveError::UnsupportedFormat(command) => assert_eq!(command, "share"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
