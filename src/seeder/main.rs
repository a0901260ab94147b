//! sparkup-seed CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, SeedCommand};
use sparkup_backend::backend::server::config::load_database;
use sparkup_backend::seeding::{generate, import_directory, translate_file, GenaiModel, RetryingModel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        SeedCommand::Import { data_dir } => {
            let pool = load_database(&cli.database_url).await?;
            let summary = import_directory(&pool, &data_dir).await?;
            println!("Imported {}", summary);
        }
        SeedCommand::Generate { topic, kind, count } => {
            let pool = load_database(&cli.database_url).await?;
            let model = RetryingModel::new(GenaiModel::new(cli.model));
            let report = generate(&pool, &model, &topic, kind, count).await?;
            println!(
                "Inserted {} ({} duplicates, {} invalid answers)",
                report.inserted, report.duplicates, report.invalid
            );
        }
        SeedCommand::Translate { input, output, lang } => {
            let model = RetryingModel::new(GenaiModel::new(cli.model));
            let report = translate_file(&model, &input, &output, &lang).await?;
            println!(
                "Translated {} texts and {} option lists into {}",
                report.texts, report.lists, lang
            );
        }
    }

    Ok(())
}
