//! Caller-facing operations on top of the external `gdrive` tool.

use std::path::Path;

use crate::auth::TokenInfo;
use crate::command::{Invocation, ProcessRunner, Runner, Subcommand};
use crate::config::GdriveConfig;
use crate::decision::{decide_copy, decide_download, Destination};
use crate::error::{DriveError, Result};
use crate::local::{LocalDestination, LocalSource};
use crate::location::{parse_location, Location};
use crate::models::{EntryKind, Listing, Record, RemoteEntry, SyncReport};
use crate::parser::{self, Output};
use crate::path::VirtualPath;
use crate::resolver::{resolve, ListingSource, ResolutionResult};

/// Client that drives the `gdrive` executable.
///
/// Every operation resolves paths afresh; nothing is cached between calls.
pub struct Gdrive<R: Runner = ProcessRunner> {
    config: GdriveConfig,
    runner: R,
}

impl Gdrive<ProcessRunner> {
    /// Create a client that spawns the configured executable.
    pub fn new(config: GdriveConfig) -> Self {
        let runner = ProcessRunner::new(&config);
        Self { config, runner }
    }
}

impl<R: Runner> Gdrive<R> {
    /// Create a client around any [`Runner`].
    pub fn with_runner(config: GdriveConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &GdriveConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn execute(&self, invocation: Invocation) -> Result<Output> {
        let raw = self.runner.run(&invocation)?;
        parser::parse(&raw, invocation.subcommand)
    }

    fn execute_log(&self, invocation: Invocation) -> Result<String> {
        let subcommand = invocation.subcommand;
        self.execute(invocation)?.into_log(subcommand)
    }

    /// Run a `list --query` and return its rows.
    pub fn query_files(&self, query: &str) -> Result<Vec<RemoteEntry>> {
        self.execute(Invocation::list(query, self.config.max_results))?
            .into_listing(Subcommand::List)
    }

    /// Account information (`gdrive about`).
    pub fn about(&self) -> Result<Record> {
        self.execute(Invocation::about())?
            .into_record(Subcommand::About)
    }

    /// Metadata of the stored credentials in the configured directory.
    pub fn token_info(&self) -> Result<TokenInfo> {
        let dir = self
            .config
            .credential_dir
            .as_deref()
            .ok_or_else(|| DriveError::MissingConfig("credential directory".to_string()))?;
        TokenInfo::from_dir(dir)
    }

    /// Resolve `path` and return the entry together with its siblings.
    pub fn info(&self, path: &str) -> Result<ResolutionResult> {
        resolve(self, &VirtualPath::parse(path))
    }

    /// Full key/value description of the entry at `path` (`gdrive info`).
    pub fn describe(&self, path: &str) -> Result<Record> {
        let path = VirtualPath::parse(path);
        let resolution = resolve(self, &path)?;
        if !resolution.entry.exists() {
            return Err(missing(&resolution, &path));
        }
        self.execute(Invocation::info(&resolution.entry.id))?
            .into_record(Subcommand::Info)
    }

    /// Directories registered with the tool's sync feature.
    pub fn list_sync_roots(&self) -> Result<Vec<RemoteEntry>> {
        self.execute(Invocation::sync_list())?
            .into_listing(Subcommand::SyncList)
    }

    /// Create directory `name` under a parent given as path, id or Drive URL.
    pub fn make_directory(&self, name: &str, parent: &str) -> Result<RemoteEntry> {
        let parent_id = match parse_location(parent)? {
            Location::Id(id) => id,
            Location::Path(path) => existing_directory(&resolve(self, &path)?, &path)?,
        };
        self.mkdir(&parent_id, name)
    }

    fn mkdir(&self, parent_id: &str, name: &str) -> Result<RemoteEntry> {
        let id = self
            .execute(Invocation::mkdir(parent_id, name))?
            .into_created(Subcommand::Mkdir)?;
        log::info!("created directory '{}' ({}) under {}", name, id, parent_id);
        Ok(RemoteEntry::directory(id, name))
    }

    /// Two-way sync of `local_dir` with a same-named directory in `remote_dir`.
    ///
    /// The remote directory is created when missing. An existing one must
    /// already be a sync root. Files added remotely by hand are not
    /// guaranteed to come back down.
    pub fn sync_up(&self, local_dir: &Path, remote_dir: &str, dry_run: bool) -> Result<SyncReport> {
        let local = LocalSource::inspect(local_dir);
        if !local.exists {
            return Err(DriveError::path_not_found(
                local.name,
                local_dir.parent().map(|p| p.display().to_string()).unwrap_or_default(),
            ));
        }
        if local.kind != EntryKind::Directory {
            return Err(DriveError::TypeMismatch(format!(
                "'{}' is not a local directory",
                local_dir.display()
            )));
        }
        if local.name.is_empty() {
            return Err(DriveError::TypeMismatch(format!(
                "'{}' has no directory name to sync under",
                local_dir.display()
            )));
        }

        let path = VirtualPath::parse(remote_dir);
        let target_id = existing_directory(&resolve(self, &path)?, &path)?;
        let contents = self.children(&target_id)?;

        let sync_id = match contents.iter().find(|e| e.name == local.name) {
            Some(existing) if !existing.is_dir() => {
                return Err(DriveError::TypeMismatch(format!(
                    "'{}' exists in {} and is not a directory",
                    existing.name, path
                )));
            }
            Some(existing) => {
                let roots = self.list_sync_roots()?;
                if !roots.iter().any(|root| root.id == existing.id) {
                    return Err(DriveError::NotASyncRoot(format!(
                        "'{}' is not a sync directory, remove it first",
                        existing.name
                    )));
                }
                existing.id.clone()
            }
            None => self.mkdir(&target_id, &local.name)?.id,
        };

        log::info!("syncing {} with {} (dry run: {})", local_dir.display(), sync_id, dry_run);
        let upload_log = self.execute_log(Invocation::sync_upload(local_dir, &sync_id, dry_run))?;
        let download_log =
            self.execute_log(Invocation::sync_download(&sync_id, local_dir, dry_run))?;

        Ok(SyncReport {
            upload_log,
            download_log,
        })
    }

    /// Copy a local file or directory to `remote_path`.
    ///
    /// A trailing `/` on `remote_path` means "into this directory", which is
    /// required for directory sources.
    pub fn put(&self, local_path: &Path, remote_path: &str, overwrite: bool) -> Result<String> {
        let source = LocalSource::inspect(local_path);
        let path = VirtualPath::parse(remote_path);
        let resolution = resolve(self, &path)?;

        let contents = if resolution.entry.exists() && resolution.entry.is_dir() {
            self.children(&resolution.entry.id)?
        } else {
            Vec::new()
        };

        let destination = Destination {
            resolution,
            contents,
            trailing_separator: path.has_trailing_separator(),
        };
        let intent = decide_copy(&source, &destination, overwrite);
        log::info!("put {} -> {}: {:?}", local_path.display(), path, intent);

        self.execute_log(intent.invocation(local_path)?)
    }

    /// Download `remote_path` into an existing local directory (or over an
    /// existing local file of the same name when `overwrite` is set).
    pub fn get(&self, remote_path: &str, local_path: &Path, overwrite: bool) -> Result<String> {
        let path = VirtualPath::parse(remote_path);
        let resolution = resolve(self, &path)?;
        if !resolution.entry.exists() {
            return Err(missing(&resolution, &path));
        }

        let destination = LocalDestination::inspect(local_path, &resolution.entry.name);
        let intent = decide_download(&resolution.entry, &destination, overwrite);
        log::info!("get {} -> {}: {:?}", path, local_path.display(), intent);

        self.execute_log(intent.invocation()?)
    }

    /// Entries whose name contains `substring`.
    pub fn search(&self, substring: &str, include_trashed: bool) -> Result<Vec<RemoteEntry>> {
        let query = format!(
            "trashed={} and name contains '{}'",
            include_trashed,
            escape_query(substring)
        );
        self.query_files(&query)
    }

    /// Contents of the directory at `path`, or the entry itself for a file.
    pub fn list_directory(&self, path: &str) -> Result<Listing> {
        let path = VirtualPath::parse(path);
        let resolution = resolve(self, &path)?;
        let entry = &resolution.entry;

        if !entry.exists() {
            return Err(missing(&resolution, &path));
        }

        if entry.is_dir() {
            Ok(Listing {
                entries: self.children(&entry.id)?,
                parent_id: entry.id.clone(),
            })
        } else {
            Ok(Listing {
                entries: vec![entry.clone()],
                parent_id: resolution.parent_id.clone(),
            })
        }
    }
}

impl<R: Runner> ListingSource for Gdrive<R> {
    fn children(&self, parent_id: &str) -> Result<Vec<RemoteEntry>> {
        self.query_files(&format!(
            "trashed=false and '{}' in parents",
            escape_query(parent_id)
        ))
    }
}

fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn missing(resolution: &ResolutionResult, path: &VirtualPath) -> DriveError {
    DriveError::path_not_found(resolution.entry.name.as_str(), path.parent_display())
}

/// Id of the resolved entry, which must be an existing directory.
fn existing_directory(resolution: &ResolutionResult, path: &VirtualPath) -> Result<String> {
    let entry = &resolution.entry;
    if !entry.exists() {
        return Err(missing(resolution, path));
    }
    if !entry.is_dir() {
        return Err(DriveError::TypeMismatch(format!("'{}' is not a directory", path)));
    }
    Ok(entry.id.clone())
}
