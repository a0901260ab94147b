//! CLI definition for sparkup-seed.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sparkup_backend::backend::server::config::{DEFAULT_DATABASE_URL, DEFAULT_DATA_DIR};
use sparkup_backend::seeding::generator::{GenerateKind, DEFAULT_MODEL};

/// Content import, generation and translation for SparkUp.
#[derive(Parser, Debug)]
#[command(name = "sparkup-seed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Generative model name.
    #[arg(long, env = "SEED_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: SeedCommand,
}

/// Seeder commands.
#[derive(Subcommand, Debug)]
pub enum SeedCommand {
    /// Import the manual_*.json files into empty tables.
    Import {
        /// Directory holding the content files.
        #[arg(long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Generate new content for a topic.
    Generate {
        /// Topic key, e.g. `science`.
        #[arg(long)]
        topic: String,
        /// Kind of content to create.
        #[arg(long, value_enum)]
        kind: GenerateKind,
        /// Number of items to insert.
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Fill one language in a content JSON file from English.
    Translate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Target language code.
        #[arg(long)]
        lang: String,
    },
}
