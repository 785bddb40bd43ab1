// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Fetch the repository tree (bounded, filtered, all-or-nothing)
// 3. Dispatch to the subcommand: export, copy, tree or info
// 4. Exit with proper code (0 = success, 1 = fetch/clipboard error, 2 = other error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::{bail, Result};
use clap::Parser;
use log::LevelFilter;

use cli::{Cli, Commands, FetchArgs, RemoteArgs};
use repo_snapshot::tree::{render, to_visual_tree};
use repo_snapshot::{clipboard, export};
use repo_snapshot::{
    ContentClient, ContentTree, ExpansionState, ExportFormat, GitHubClient, RepositoryIdentifier,
    SnapshotError, TreeFetcher,
};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Typed errors are the expected failures; anything else is unexpected
            match e.downcast_ref::<SnapshotError>() {
                Some(err) => {
                    eprintln!("❌ {}", err);
                    1
                }
                None => {
                    eprintln!("Error: {:#}", e);
                    2
                }
            }
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose)?;

    match cli.command {
        Commands::Export {
            fetch,
            format,
            output,
            stdout,
        } => {
            let tree = fetch_tree(&fetch).await?;
            if stdout {
                print!("{}", format.flatten(&tree));
            } else {
                let path = export::download(&tree, format, &output).await?;
                eprintln!("💾 Saved {}", path.display());
            }
        }
        Commands::Copy {
            fetch,
            file,
            format,
        } => {
            let tree = fetch_tree(&fetch).await?;
            handle_copy(&tree, file.as_deref(), format).await?;
        }
        Commands::Tree {
            fetch,
            reveal,
            expand_all,
            json,
        } => {
            let tree = fetch_tree(&fetch).await?;
            handle_tree(&tree, &reveal, expand_all, json)?;
        }
        Commands::Info { remote, json } => handle_info(&remote, json).await?,
    }

    Ok(0)
}

/// Fetches the whole tree. Ctrl-C drops the in-flight fetch and nothing is kept.
async fn fetch_tree(args: &FetchArgs) -> Result<ContentTree> {
    let config = args.config();
    let fetcher = TreeFetcher::new(GitHubClient::new(&config)?, config);

    eprintln!("🔍 Fetching repository: {}", args.remote.repo_url);

    let tree = tokio::select! {
        result = fetcher.fetch_url(&args.remote.repo_url) => result?,
        _ = tokio::signal::ctrl_c() => bail!("Interrupted, no data was kept"),
    };

    eprintln!(
        "📄 Fetched {} file(s) from {}",
        tree.file_count(),
        tree.repository.full_name
    );
    Ok(tree)
}

async fn handle_copy(tree: &ContentTree, file: Option<&str>, format: ExportFormat) -> Result<()> {
    let text = match file {
        Some(path) => clipboard::file_content(tree, path)?.to_string(),
        None => format.flatten(tree),
    };

    // On failure the snapshot still goes to stdout
    clipboard::copy_or_write(&clipboard::SystemClipboard, &text, &mut std::io::stdout()).await?;
    eprintln!("📋 Copied {} bytes to the clipboard", text.len());
    Ok(())
}

fn handle_tree(tree: &ContentTree, reveal: &[String], expand_all: bool, json: bool) -> Result<()> {
    let visual = to_visual_tree(tree, tree.repository.name());

    if json {
        println!("{}", serde_json::to_string_pretty(&visual)?);
        return Ok(());
    }

    let mut state = ExpansionState::new();
    if expand_all {
        state.expand_all(tree);
    }
    for path in reveal {
        if tree.find(path).is_none() {
            eprintln!("⚠️  {} is not in the snapshot", path);
        }
        state.expand_ancestors_of(path);
    }

    print!("{}", render(&visual, &state));
    Ok(())
}

async fn handle_info(args: &RemoteArgs, json: bool) -> Result<()> {
    let repo = RepositoryIdentifier::parse(&args.repo_url)?;
    let client = GitHubClient::new(&args.config())?;
    let info = client.repository_info(&repo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("📦 {}", info.full_name);
    if let Some(description) = &info.description {
        println!("   {}", description);
    }
    println!("   ⭐ {}", info.stargazers_count);
    println!("   🌿 {}", info.default_branch);
    println!("   🔗 {}", info.html_url);
    Ok(())
}

// -v info, -vv debug, -vvv trace; RUST_LOG wins over all of them
fn initialize_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter(Some(env!("CARGO_CRATE_NAME")), level);

    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }

    builder.try_init()?;
    Ok(())
}
