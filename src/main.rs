use anyhow::{Context, Result};
use catalog_imagesync::entities::{ProductFilter, SqlCatalog};
use catalog_imagesync::imagesync::{ImageBuilder, ImageFetcher};
use catalog_imagesync::{AppConfig, AppError, ConnectionManager};
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "imagesync",
    author,
    version,
    about = "Synchronize product images from the CDN into a flat catalog tree",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
enum Command {
    /// Download missing product images from the CDN into the input cache
    DownloadProductImages(ProductArgs),
    /// Rebuild the renamed product image tree from local assets
    BuildProductImages(ProductArgs),
}

#[derive(Args, Debug, Default)]
struct ProductArgs {
    /// Comma-separated product IDs; all master products when omitted
    product_ids: Option<String>,
}

impl ProductArgs {
    fn filter(&self) -> Result<ProductFilter, AppError> {
        Ok(ProductFilter::from_arg(self.product_ids.as_deref())?)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    let _guard = init_tracing(config.is_production());

    let db = ConnectionManager::from_config(&config)?;

    let outcome = tokio::select! {
        result = run(cli.command, &config, &db) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    db.close().await;

    Ok(exit_code(outcome))
}

/// Report how a run ended. Failures are logged here and only here.
fn exit_code(outcome: Option<Result<(), AppError>>) -> ExitCode {
    match outcome {
        Some(Ok(())) => ExitCode::SUCCESS,
        Some(Err(e)) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
        None => {
            info!("Interrupted, stopping");
            ExitCode::SUCCESS
        }
    }
}

async fn run(
    command: Command,
    config: &AppConfig,
    db: &ConnectionManager,
) -> Result<(), AppError> {
    let catalog = SqlCatalog::new(db);

    match command {
        Command::DownloadProductImages(args) => {
            let filter = args.filter()?;
            ImageFetcher::new(&catalog, config.fetch_config())?
                .run(&filter)
                .await?;
        }
        Command::BuildProductImages(args) => {
            let filter = args.filter()?;
            ImageBuilder::new(&catalog, config.build_config())
                .run(&filter)
                .await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    guard
}
