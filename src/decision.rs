//! Deciding what a copy should do before anything is sent to the tool.
//!
//! Both functions here are pure: they look only at their arguments, so the
//! same inputs always give the same intent.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::command::{Flag, Invocation};
use crate::error::DriveError;
use crate::local::{LocalDestination, LocalSource};
use crate::models::{EntryKind, RemoteEntry};
use crate::resolver::ResolutionResult;

/// Why a transfer was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    SourceMissing(String),
    DestinationMissing(String),
    DestinationFileExists,
    EntryExists(String),
    DirectoryOntoFile,
    FileOntoDirectory,
    UseSync,
    RenameOnDownload(String),
    /// The local path has no final component to name the remote copy after.
    Unnamed(String),
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::SourceMissing(path) => write!(f, "source '{}' does not exist", path),
            Refusal::DestinationMissing(path) => write!(f, "destination '{}' does not exist", path),
            Refusal::DestinationFileExists => write!(f, "destination file exists"),
            Refusal::EntryExists(name) => write!(f, "'{}' exists", name),
            Refusal::DirectoryOntoFile => write!(f, "cannot copy a directory onto a file"),
            Refusal::FileOntoDirectory => write!(f, "cannot copy a file onto a directory"),
            Refusal::UseSync => write!(f, "use sync instead of copy"),
            Refusal::RenameOnDownload(name) => {
                write!(f, "downloads keep the remote name '{}'", name)
            }
            Refusal::Unnamed(path) => write!(f, "'{}' has no name to copy under", path),
        }
    }
}

impl From<Refusal> for DriveError {
    fn from(refusal: Refusal) -> Self {
        match refusal {
            Refusal::SourceMissing(path) | Refusal::DestinationMissing(path) => {
                let parent = match Path::new(&path).parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
                    _ => ".".to_string(),
                };
                DriveError::path_not_found(path, parent)
            }
            Refusal::DestinationFileExists | Refusal::EntryExists(_) => {
                DriveError::AlreadyExists(refusal.to_string())
            }
            Refusal::DirectoryOntoFile
            | Refusal::FileOntoDirectory
            | Refusal::UseSync
            | Refusal::RenameOnDownload(_)
            | Refusal::Unnamed(_) => DriveError::TypeMismatch(refusal.to_string()),
        }
    }
}

/// Outcome of [`decide_copy`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransferIntent {
    CreateFile { parent_id: String, name: String },
    CreateDirectory { parent_id: String, name: String },
    UpdateFile { target_id: String },
    Error(Refusal),
}

impl TransferIntent {
    /// The upload or update that carries out this intent for `local_path`.
    pub fn invocation(&self, local_path: &Path) -> Result<Invocation, Refusal> {
        let local_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (parent_id, name, recursive) = match self {
            TransferIntent::UpdateFile { target_id } => {
                return Ok(Invocation::update(target_id, local_path));
            }
            TransferIntent::Error(refusal) => return Err(refusal.clone()),
            TransferIntent::CreateFile { parent_id, name } => (parent_id, name, false),
            TransferIntent::CreateDirectory { parent_id, name } => (parent_id, name, true),
        };

        Ok(Invocation::upload(parent_id, local_path, recursive)
            .flag_if(*name != local_name, Flag::Name(name.clone())))
    }
}

/// Remote side of an upload, as seen by the decision engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub resolution: ResolutionResult,
    /// Listing of the destination itself when it is an existing directory.
    pub contents: Vec<RemoteEntry>,
    pub trailing_separator: bool,
}

/// Decide how to copy a local source onto a resolved remote destination.
pub fn decide_copy(source: &LocalSource, destination: &Destination, overwrite: bool) -> TransferIntent {
    if !source.exists {
        return TransferIntent::Error(Refusal::SourceMissing(source.path.display().to_string()));
    }
    if source.name.is_empty() {
        return TransferIntent::Error(Refusal::Unnamed(source.path.display().to_string()));
    }

    let dest = &destination.resolution.entry;
    let source_is_dir = source.kind == EntryKind::Directory;

    if !dest.exists() {
        let parent_id = destination.resolution.parent_id.clone();
        let name = dest.name.clone();
        return if source_is_dir {
            TransferIntent::CreateDirectory { parent_id, name }
        } else {
            TransferIntent::CreateFile { parent_id, name }
        };
    }

    if !dest.is_dir() {
        return match (source_is_dir, overwrite) {
            (true, _) => TransferIntent::Error(Refusal::DirectoryOntoFile),
            (false, true) => TransferIntent::UpdateFile {
                target_id: dest.id.clone(),
            },
            (false, false) => TransferIntent::Error(Refusal::DestinationFileExists),
        };
    }

    let existing = destination.contents.iter().find(|e| e.name == source.name);

    if source_is_dir {
        return match (destination.trailing_separator, existing) {
            (false, _) | (true, Some(_)) => TransferIntent::Error(Refusal::UseSync),
            (true, None) => TransferIntent::CreateDirectory {
                parent_id: dest.id.clone(),
                name: source.name.clone(),
            },
        };
    }

    match existing {
        Some(entry) if overwrite => TransferIntent::UpdateFile {
            target_id: entry.id.clone(),
        },
        Some(entry) => TransferIntent::Error(Refusal::EntryExists(entry.name.clone())),
        None => TransferIntent::CreateFile {
            parent_id: dest.id.clone(),
            name: source.name.clone(),
        },
    }
}

/// Outcome of [`decide_download`].
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadIntent {
    Download {
        id: String,
        directory: PathBuf,
        force: bool,
        recursive: bool,
    },
    Error(Refusal),
}

impl DownloadIntent {
    pub fn invocation(&self) -> Result<Invocation, Refusal> {
        match self {
            DownloadIntent::Download {
                id,
                directory,
                force,
                recursive,
            } => Ok(Invocation::download(id, directory, *force, *recursive)),
            DownloadIntent::Error(refusal) => Err(refusal.clone()),
        }
    }
}

/// Decide how to bring a remote entry down to a local destination.
///
/// Mirror of [`decide_copy`], without a directory-creation branch: the local
/// destination must already exist.
pub fn decide_download(source: &RemoteEntry, destination: &LocalDestination, overwrite: bool) -> DownloadIntent {
    if !source.exists() {
        return DownloadIntent::Error(Refusal::SourceMissing(source.name.clone()));
    }

    let recursive = source.is_dir();
    let download = |directory: PathBuf, force: bool| DownloadIntent::Download {
        id: source.id.clone(),
        directory,
        force,
        recursive,
    };

    match destination.kind {
        None => DownloadIntent::Error(Refusal::DestinationMissing(
            destination.path.display().to_string(),
        )),
        Some(EntryKind::Directory) => match destination.child_kind {
            None => download(destination.path.clone(), false),
            Some(_) if recursive => DownloadIntent::Error(Refusal::UseSync),
            Some(EntryKind::Directory) => DownloadIntent::Error(Refusal::FileOntoDirectory),
            Some(_) if overwrite => download(destination.path.clone(), true),
            Some(_) => DownloadIntent::Error(Refusal::EntryExists(source.name.clone())),
        },
        Some(_) => {
            if recursive {
                DownloadIntent::Error(Refusal::DirectoryOntoFile)
            } else if destination.file_name() != source.name {
                DownloadIntent::Error(Refusal::RenameOnDownload(source.name.clone()))
            } else if overwrite {
                download(destination.parent_dir(), true)
            } else {
                DownloadIntent::Error(Refusal::DestinationFileExists)
            }
        }
    }
}
