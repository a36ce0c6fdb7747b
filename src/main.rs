//! gdrive-wrap CLI - Google Drive paths on top of the `gdrive` tool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gdrive_wrap::config::{DEFAULT_EXECUTABLE, DEFAULT_MAX_RESULTS};
use gdrive_wrap::local::expand_patterns;
use gdrive_wrap::{Gdrive, GdriveConfig, Record, RemoteEntry};

/// Path-based Google Drive commands driven through the gdrive executable.
#[derive(Parser)]
#[command(name = "gdrive-wrap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the gdrive executable.
    #[arg(long, env = "GDRIVE_BIN", default_value = DEFAULT_EXECUTABLE)]
    gdrive: PathBuf,

    /// Credential directory handed to gdrive as `-c`.
    #[arg(long, env = "GDRIVE_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum rows requested from each listing.
    #[arg(long, env = "GDRIVE_MAX_RESULTS", default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// Log every gdrive invocation.
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show account information.
    About,

    /// Show what the stored credentials contain.
    AuthStatus,

    /// Resolve a path and show the entry and its siblings.
    Info {
        /// Virtual path, e.g. /Projects/report.pdf.
        path: String,
    },

    /// Show gdrive's full description of an entry.
    Describe {
        /// Virtual path, e.g. /Projects/report.pdf.
        path: String,
    },

    /// List a directory.
    Ls {
        /// Virtual path of the directory.
        #[arg(default_value = "/")]
        path: String,
    },

    /// Search entries by name.
    Search {
        /// Text the name must contain.
        text: String,

        /// Include trashed entries.
        #[arg(long)]
        trashed: bool,
    },

    /// Create a directory.
    Mkdir {
        /// Name of the new directory.
        name: String,

        /// Parent directory: virtual path, Drive URL or ID.
        #[arg(long, short = 'p', default_value = "/")]
        parent: String,
    },

    /// Upload files or directories (supports glob patterns like *.tar, file_{1,2,3}.txt).
    Put {
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Remote destination; end with / to copy into a directory.
        #[arg(long, short = 't')]
        to: String,

        /// Replace existing remote files.
        #[arg(long)]
        overwrite: bool,
    },

    /// Download a file or directory into a local directory.
    Get {
        /// Remote virtual path.
        remote: String,

        /// Local destination directory (or file to replace).
        #[arg(long, short = 't', default_value = ".")]
        to: PathBuf,

        /// Replace existing local files.
        #[arg(long)]
        overwrite: bool,
    },

    /// Sync a local directory with a same-named directory inside a remote one.
    SyncUp {
        local: PathBuf,

        /// Remote directory that holds (or will hold) the sync directory.
        remote: String,

        #[arg(long)]
        dry_run: bool,
    },

    /// List registered sync directories.
    SyncRoots,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = GdriveConfig::new(&cli.gdrive).with_max_results(cli.max_results);
    if let Some(dir) = &cli.config {
        config = config.with_credential_dir(dir);
    }
    let drive = Gdrive::new(config);

    match cli.command {
        Commands::About => {
            let record = drive.about().context("Failed to query account information")?;
            print_record(&record);
        }

        Commands::AuthStatus => {
            let token = drive.token_info().context("Failed to read stored credentials")?;
            println!("File:          {}", token.path.display());
            println!("Token type:    {}", token.token_type.as_deref().unwrap_or("-"));
            println!("Expiry:        {}", token.expiry.as_deref().unwrap_or("-"));
            println!("Access token:  {}", yes_no(token.has_access_token));
            println!("Refresh token: {}", yes_no(token.has_refresh_token));
        }

        Commands::Info { path } => {
            let resolution = drive
                .info(&path)
                .with_context(|| format!("Failed to resolve: {}", path))?;
            if resolution.entry.exists() {
                println!("{}", resolution.entry);
            } else {
                println!("'{}' does not exist yet (parent {})", resolution.entry.name, resolution.parent_id);
            }
            println!();
            print_entries(&resolution.siblings);
        }

        Commands::Describe { path } => {
            let record = drive
                .describe(&path)
                .with_context(|| format!("Failed to describe: {}", path))?;
            print_record(&record);
        }

        Commands::Ls { path } => {
            let listing = drive
                .list_directory(&path)
                .with_context(|| format!("Failed to list: {}", path))?;
            print_entries(&listing.entries);
        }

        Commands::Search { text, trashed } => {
            let entries = drive
                .search(&text, trashed)
                .with_context(|| format!("Search failed: {}", text))?;
            print_entries(&entries);
        }

        Commands::Mkdir { name, parent } => {
            let entry = drive
                .make_directory(&name, &parent)
                .with_context(|| format!("Failed to create {} under {}", name, parent))?;
            println!("Created {} ({})", entry.name, entry.id);
        }

        Commands::Put {
            patterns,
            to,
            overwrite,
        } => {
            let paths = expand_patterns(&patterns)?;
            if paths.len() > 1 && !to.ends_with('/') {
                anyhow::bail!("Uploading several files needs a directory destination ending in /");
            }

            println!("Uploading {} item(s) to {}...", paths.len(), to);

            let mut failures = 0;
            for (idx, path) in paths.iter().enumerate() {
                print!("[{}/{}] {}... ", idx + 1, paths.len(), path.display());

                match drive.put(path, &to, overwrite) {
                    Ok(log) => {
                        println!("OK");
                        print!("{}", log);
                    }
                    Err(e) => {
                        failures += 1;
                        println!("FAILED");
                        eprintln!("  Error: {}", e);
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} upload(s) failed", failures, paths.len());
            }
            println!("Done.");
        }

        Commands::Get {
            remote,
            to,
            overwrite,
        } => {
            let log = drive
                .get(&remote, &to, overwrite)
                .with_context(|| format!("Failed to download: {}", remote))?;
            print!("{}", log);
        }

        Commands::SyncUp {
            local,
            remote,
            dry_run,
        } => {
            let report = drive
                .sync_up(&local, &remote, dry_run)
                .with_context(|| format!("Failed to sync {:?} with {}", local, remote))?;
            println!("{}", report);
        }

        Commands::SyncRoots => {
            let roots = drive.list_sync_roots().context("Failed to list sync directories")?;
            print_entries(&roots);
        }
    }

    Ok(())
}

fn print_entries(entries: &[RemoteEntry]) {
    if entries.is_empty() {
        println!("No files found.");
        return;
    }

    println!("{:<34} {:>10} {:<4} {}", "ID", "SIZE", "TYPE", "NAME");
    println!("{}", "-".repeat(80));
    for entry in entries {
        println!("{}", entry);
    }
}

fn print_record(record: &Record) {
    let width = record.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in record {
        println!("{:<width$}  {}", key, value, width = width);
    }
}

fn yes_no(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "missing"
    }
}
