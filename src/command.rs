//! Structured invocations of the external `gdrive` executable.
//!
//! An [`Invocation`] is only turned into an argv at the process boundary, so
//! nothing upstream ever deals with shell quoting.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use execute::Execute;

use crate::config::GdriveConfig;
use crate::error::{DriveError, Result};

/// Subcommands of the external tool this crate consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    About,
    Info,
    List,
    Mkdir,
    Upload,
    Update,
    Download,
    SyncList,
    SyncUpload,
    SyncDownload,
}

impl Subcommand {
    /// Words passed on the command line for this subcommand.
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Subcommand::About => &["about"],
            Subcommand::Info => &["info"],
            Subcommand::List => &["list"],
            Subcommand::Mkdir => &["mkdir"],
            Subcommand::Upload => &["upload"],
            Subcommand::Update => &["update"],
            Subcommand::Download => &["download"],
            Subcommand::SyncList => &["sync", "list"],
            Subcommand::SyncUpload => &["sync", "upload"],
            Subcommand::SyncDownload => &["sync", "download"],
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words().join(" "))
    }
}

impl FromStr for Subcommand {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let subcommand = match words.as_slice() {
            ["about"] => Subcommand::About,
            ["info"] => Subcommand::Info,
            ["list"] => Subcommand::List,
            ["mkdir"] => Subcommand::Mkdir,
            ["upload"] => Subcommand::Upload,
            ["update"] => Subcommand::Update,
            ["download"] => Subcommand::Download,
            ["sync", "list"] => Subcommand::SyncList,
            ["sync", "upload"] => Subcommand::SyncUpload,
            ["sync", "download"] => Subcommand::SyncDownload,
            _ => return Err(DriveError::UnsupportedFormat(s.to_string())),
        };
        Ok(subcommand)
    }
}

/// Typed flags; each knows its own spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Flag {
    Query(String),
    Max(u32),
    NameWidth(u32),
    Parent(String),
    Name(String),
    Path(PathBuf),
    Recursive,
    Force,
    DryRun,
}

impl Flag {
    fn push_args(&self, out: &mut Vec<OsString>) {
        let (name, value): (&str, Option<OsString>) = match self {
            Flag::Query(q) => ("--query", Some(q.into())),
            Flag::Max(n) => ("--max", Some(n.to_string().into())),
            Flag::NameWidth(n) => ("--name-width", Some(n.to_string().into())),
            Flag::Parent(id) => ("--parent", Some(id.into())),
            Flag::Name(name) => ("--name", Some(name.into())),
            Flag::Path(path) => ("--path", Some(path.clone().into_os_string())),
            Flag::Recursive => ("--recursive", None),
            Flag::Force => ("--force", None),
            Flag::DryRun => ("--dry-run", None),
        };
        out.push(name.into());
        out.extend(value);
    }
}

/// One call of the external tool: subcommand, flags and positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub subcommand: Subcommand,
    pub flags: Vec<Flag>,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(subcommand: Subcommand) -> Self {
        Self {
            subcommand,
            flags: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn flag_if(self, enabled: bool, flag: Flag) -> Self {
        if enabled {
            self.flag(flag)
        } else {
            self
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn about() -> Self {
        Self::new(Subcommand::About)
    }

    pub fn info(id: &str) -> Self {
        Self::new(Subcommand::Info).arg(id)
    }

    pub fn list(query: impl Into<String>, max_results: u32) -> Self {
        Self::new(Subcommand::List)
            .flag(Flag::Query(query.into()))
            .flag(Flag::Max(max_results))
            .flag(Flag::NameWidth(0))
    }

    pub fn mkdir(parent_id: &str, name: &str) -> Self {
        Self::new(Subcommand::Mkdir)
            .flag(Flag::Parent(parent_id.to_string()))
            .arg(name)
    }

    pub fn upload(parent_id: &str, local_path: &Path, recursive: bool) -> Self {
        Self::new(Subcommand::Upload)
            .flag_if(recursive, Flag::Recursive)
            .flag(Flag::Parent(parent_id.to_string()))
            .arg(local_path)
    }

    pub fn update(id: &str, local_path: &Path) -> Self {
        Self::new(Subcommand::Update).arg(id).arg(local_path)
    }

    pub fn download(id: &str, directory: &Path, force: bool, recursive: bool) -> Self {
        Self::new(Subcommand::Download)
            .flag_if(force, Flag::Force)
            .flag_if(recursive, Flag::Recursive)
            .flag(Flag::Path(directory.to_path_buf()))
            .arg(id)
    }

    pub fn sync_list() -> Self {
        Self::new(Subcommand::SyncList)
    }

    pub fn sync_upload(local_dir: &Path, id: &str, dry_run: bool) -> Self {
        Self::new(Subcommand::SyncUpload)
            .flag_if(dry_run, Flag::DryRun)
            .arg(local_dir)
            .arg(id)
    }

    pub fn sync_download(id: &str, local_dir: &Path, dry_run: bool) -> Self {
        Self::new(Subcommand::SyncDownload)
            .flag_if(dry_run, Flag::DryRun)
            .arg(id)
            .arg(local_dir)
    }

    /// Arguments after the executable, credential flag included.
    pub fn argv(&self, credential_dir: Option<&Path>) -> Vec<OsString> {
        let mut out: Vec<OsString> = Vec::new();
        if let Some(dir) = credential_dir {
            out.push("-c".into());
            out.push(dir.as_os_str().to_os_string());
        }
        out.extend(self.subcommand.words().iter().map(OsString::from));
        for flag in &self.flags {
            flag.push_args(&mut out);
        }
        out.extend(self.args.iter().cloned());
        out
    }

    /// Human-readable command line, quoted for a POSIX shell.
    pub fn command_line(&self, executable: &Path, credential_dir: Option<&Path>) -> String {
        std::iter::once(executable.as_os_str().to_os_string())
            .chain(self.argv(credential_dir))
            .map(|word| shell_quote(&word.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Something that can execute an [`Invocation`] and hand back its stdout.
pub trait Runner {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs the real executable as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    credential_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(config: &GdriveConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            credential_dir: config.credential_dir.clone(),
        }
    }
}

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        let credential_dir = self.credential_dir.as_deref();
        let command_line = invocation.command_line(&self.executable, credential_dir);
        log::debug!("running: {}", command_line);

        let mut cmd = Command::new(&self.executable);
        cmd.args(invocation.argv(credential_dir));
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.execute_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!("{} exited with {}", invocation.subcommand, output.status);
            return Err(DriveError::ExternalToolFailure {
                command: command_line,
                output: format!("{}{}", stdout, stderr).trim_end().to_string(),
            });
        }

        Ok(stdout)
    }
}
