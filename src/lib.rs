//! gdrive_wrap - Google Drive through the external `gdrive` command-line tool.
//!
//! The external executable does all Drive work (authentication, transfer,
//! sync). This library decides *what* to ask it to do:
//! - Resolve slash-separated virtual paths to Drive ids
//! - Decide whether a copy creates, updates or must be refused
//! - Run the tool and parse its text output into typed records
//!
//! # Example
//!
//! ```no_run
//! use gdrive_wrap::{Gdrive, GdriveConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = GdriveConfig::new("/usr/local/bin/gdrive").with_credential_dir("/home/me/.gdrive");
//!     let drive = Gdrive::new(config);
//!
//!     let listing = drive.list_directory("/Projects")?;
//!     for entry in listing.entries {
//!         println!("{}", entry);
//!     }
//!
//!     drive.put("report.pdf".as_ref(), "/Projects/", false)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod command;
pub mod config;
pub mod decision;
pub mod error;
pub mod local;
pub mod location;
pub mod models;
pub mod parser;
pub mod path;
pub mod resolver;

// Re-exports for convenience
pub use auth::TokenInfo;
pub use client::Gdrive;
pub use command::{Invocation, ProcessRunner, Runner, Subcommand};
pub use config::GdriveConfig;
pub use decision::{decide_copy, decide_download, DownloadIntent, Refusal, TransferIntent};
pub use error::{DriveError, Result};
pub use models::{EntryKind, Listing, Record, RemoteEntry, SyncReport};
pub use path::VirtualPath;
pub use resolver::{resolve, ListingSource, ResolutionResult};
