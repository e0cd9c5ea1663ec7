use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cheq_extract::configuration::{Credentials, ExtractConfig};

/// Downloads the CHEQ traffic of the day three days ago and writes it as page_1.csv to page_5.csv.
///
/// The credentials are read from CLIENT_ID and CLIENT_SECRET, which may also be given in a .env file.
#[derive(StructOpt)]
struct Cli {
    /// The path to the directory where the page files are to be written.
    /// We will attempt to create this directory if it does not already exist.
    #[structopt(long, parse(from_os_str), default_value = ".")]
    output_dir: std::path::PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = try_main().await {
        error!("Error in main function: {:#}", err);
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::from_args();
    let output_dir = args.output_dir;
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir.as_path()).with_context(|| {
            format!(
                "could not create directory: {:?}",
                output_dir.as_path().as_os_str()
            )
        })?;
    }

    let credentials = Credentials::from_env()?;
    let config = ExtractConfig::new(credentials).with_output_dir(output_dir);
    let summary = cheq_extract::run(&config)
        .await
        .context("the extraction run was aborted")?;
    info!(
        "{} records for {} have been saved in {} files",
        summary.records_written,
        &summary.date_window.start_date()[..10],
        summary.files.len()
    );
    Ok(())
}
