//! CLI binary for meme-finder.

use anyhow::Context;
use clap::{Parser, Subcommand};
use meme_finder::{Document, FinderConfig, FinderRequest, MemeFinder, Tier};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// meme-finder: memes that fit an article.
#[derive(Parser)]
#[command(name = "meme-finder", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Rank memes for an article and print the JSON response.
    Find {
        /// Read the article body from this file instead of stdin.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Article title.
        #[arg(short, long)]
        title: Option<String>,

        /// Use the premium tier.
        #[arg(long)]
        premium: bool,
    },

    /// Show tokens, the free-tier query and emotion labels (no network).
    Keywords {
        /// Read the text from this file instead of stdin.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean JSON channel.
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meme_finder=info,meme_rank=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Find {
            file,
            title,
            premium,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_find(&config, file.as_deref(), title, premium).await
        }
        Command::Keywords { file } => {
            let config = load_config(cli.config.as_deref())?;
            run_keywords(&config, file.as_deref())
        }
        Command::InitConfig { force } => init_config(cli.config, force),
    }
}

/// `--config` if given, else the default path when it exists, else defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<FinderConfig> {
    let mut config = match path {
        Some(path) => FinderConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let default_path = FinderConfig::default_config_path();
            if default_path.exists() {
                FinderConfig::from_file(&default_path)
                    .with_context(|| format!("loading config from {}", default_path.display()))?
            } else {
                FinderConfig::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

async fn run_find(
    config: &FinderConfig,
    file: Option<&Path>,
    title: Option<String>,
    premium: bool,
) -> anyhow::Result<()> {
    let finder = MemeFinder::from_config(config)?;
    let mut document = Document::new(read_input(file)?);
    if let Some(title) = title {
        document = document.with_title(title);
    }
    let request = FinderRequest::new(document, Tier::from_premium_flag(premium));

    let response = finder.find_memes(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn run_keywords(config: &FinderConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let finder = MemeFinder::from_config(config)?;
    let analysis = finder.analyze(&read_input(file)?);
    let tokens: Vec<_> = analysis
        .tokens
        .iter()
        .map(|t| serde_json::json!({ "text": t.text, "position": t.position }))
        .collect();
    let output = serde_json::json!({
        "tokens": tokens,
        "query": analysis.keyword_query,
        "emotionLabels": analysis.emotion_labels,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(FinderConfig::default_config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    FinderConfig::default().save_to_file(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
