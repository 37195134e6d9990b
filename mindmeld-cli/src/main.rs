//! MindMeld CLI
//!
//! Command-line interface for the MindMeld creative-writing core.
//!
//! # Usage
//!
//! ```bash
//! # Report the configured key pool with balances
//! mindmeld keys
//!
//! # Extract character descriptions from a story
//! mindmeld extract story.txt
//!
//! # Generate a character portrait
//! mindmeld portrait "She had blue hair" --style anime
//! ```

mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::FmtSubscriber;

use mindmeld_core::{
    extract_descriptions, reverse_prompt, story_prompt, HttpBalanceProbe, KeyRotator,
    LiteraryStyle, PortraitGenerator, PortraitStyle, ALL_STYLES,
};

use crate::config::{load_config, Config};

#[derive(Parser)]
#[command(name = "mindmeld")]
#[command(about = "Key rotation, description extraction, and portraits for MindMeld")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the configured key pool with cached balances
    Keys {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Extract character-description sentences from a story
    Extract {
        /// Story file to read ("-" for stdin)
        file: PathBuf,
    },

    /// Generate a character portrait from a description
    Portrait {
        /// Character description to render
        description: String,

        /// Visual style (anime, realistic)
        #[arg(short, long, default_value = "anime")]
        style: PortraitStyle,
    },

    /// Print the story-generation prompt for a thought
    StoryPrompt {
        /// The thought, dream, or feeling to expand
        thought: String,

        /// Literary style slug (see `styles`)
        #[arg(short, long, default_value = "surreal-short-story")]
        style: LiteraryStyle,
    },

    /// Print the reverse-analysis prompt for a story
    ReversePrompt {
        /// Story file to read ("-" for stdin)
        file: PathBuf,
    },

    /// List the available literary styles
    Styles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        FmtSubscriber::builder()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match cli.command {
        Commands::Keys { format } => report_keys(&format).await,
        Commands::Extract { file } => extract(&file),
        Commands::Portrait { description, style } => portrait(&description, style).await,
        Commands::StoryPrompt { thought, style } => {
            println!("{}", story_prompt(&thought, style));
            Ok(())
        }
        Commands::ReversePrompt { file } => {
            let story = read_input(&file)?;
            println!("{}", reverse_prompt(&story));
            Ok(())
        }
        Commands::Styles => {
            list_styles();
            Ok(())
        }
    }
}

fn build_rotator(config: &Config) -> KeyRotator<HttpBalanceProbe> {
    KeyRotator::new(
        config.api_keys.iter().cloned(),
        HttpBalanceProbe::new(&config.balance_url),
    )
}

async fn report_keys(format: &str) -> Result<()> {
    let config = load_config()?;
    let rotator = build_rotator(&config);

    // Populate the caches before reporting.
    for key in &config.api_keys {
        rotator.key_balance(key).await;
    }

    let statuses = rotator.statuses().await;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&statuses)?),
        _ => {
            if statuses.is_empty() {
                println!("No keys configured (set {} or api_keys in mindmeld.toml)", config::KEYS_ENV_VAR);
            }
            for status in statuses {
                let credits = status
                    .credits
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| "unchecked".to_string());
                let checked = status
                    .checked_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  credits: {:>10}  checked: {}", status.key, credits, checked);
            }
        }
    }

    Ok(())
}

fn extract(file: &Path) -> Result<()> {
    let story = read_input(file)?;
    for description in extract_descriptions(&story) {
        println!("{}", description);
    }
    Ok(())
}

async fn portrait(description: &str, style: PortraitStyle) -> Result<()> {
    let config = load_config()?;
    let generator = PortraitGenerator::new(build_rotator(&config), config.portrait_url.clone());

    println!("{}", generator.generate(description, style).await);
    Ok(())
}

fn list_styles() {
    for style in ALL_STYLES {
        println!("{:<22} {}", style.slug(), style.display_name());
    }
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
    }
}
