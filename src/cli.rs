// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every subcommand starts the same way (a repository URL plus a token), and
// the ones that walk the tree also take the traversal limits, so those
// arguments live in small structs that get flattened into each subcommand.
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use repo_snapshot::config::{
    FetchConfig, DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILES,
};
use repo_snapshot::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "repo-snapshot",
    version,
    about = "Snapshot a GitHub repository's files for bulk copy and export",
    long_about = "repo-snapshot fetches a bounded, filtered copy of a GitHub repository's file tree \
                  and text contents, then exports it as Markdown or plain text, copies it to the \
                  clipboard, or draws it as a tree."
)]
pub struct Cli {
    /// Verbose output (repeat for more verbosity)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find the repository and how to authenticate.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// GitHub repository URL (e.g., https://github.com/user/repo)
    pub repo_url: String,

    /// GitHub token, sent with every API request
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,
}

/// Traversal limits.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Maximum directory depth to descend into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of files to fetch in total
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,

    /// How many entries of one directory to fetch at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Sort entries (directories first, then by name) instead of keeping
    /// GitHub's listing order
    #[arg(long)]
    pub sort: bool,
}

impl RemoteArgs {
    pub fn config(&self) -> FetchConfig {
        FetchConfig {
            api_base: self.api_base.clone(),
            ..FetchConfig::default()
        }
        .with_token(self.token.clone())
    }
}

impl FetchArgs {
    pub fn config(&self) -> FetchConfig {
        let mut config = self
            .remote
            .config()
            .with_limits(self.max_depth, self.max_files);
        config.concurrency = self.concurrency.max(1);
        config.sort_entries = self.sort;
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a repository and save it as one Markdown or text file
    ///
    /// Example: repo-snapshot export https://github.com/rust-lang/log --format txt
    Export {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,

        /// Directory to write <repo>.<md|txt> into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Fetch a repository and copy it (or one file) to the clipboard
    ///
    /// Example: repo-snapshot copy https://github.com/rust-lang/log --file src/lib.rs
    Copy {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Copy only this file's content
        #[arg(long)]
        file: Option<String>,

        /// Format used when copying the whole repository
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },

    /// Fetch a repository and draw its file tree
    ///
    /// Example: repo-snapshot tree https://github.com/rust-lang/log --reveal src/lib.rs
    Tree {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Open every directory leading to this path (repeatable)
        #[arg(long)]
        reveal: Vec<String>,

        /// Open every directory
        #[arg(long)]
        expand_all: bool,

        /// Print the tree as JSON instead of drawing it
        #[arg(long)]
        json: bool,
    },

    /// Show repository metadata
    Info {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}
