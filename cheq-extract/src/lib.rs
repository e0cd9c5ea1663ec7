use std::path::PathBuf;
use std::time::Duration;

use common_utils::date_utils::DateWindow;
use reqwest::Client;
use tracing::{info, warn};

pub mod authenticating;
pub mod configuration;
pub mod error;
pub mod fetching;
pub mod flattening;
pub mod records;
pub mod writing;

use configuration::ExtractConfig;
use error::{ExtractError, Result};
use fetching::{PageFetcher, FETCH_RETRIES};
use records::{Record, FIELDS};

/// Number of pages requested per run.
pub const PAGE_COUNT: u32 = 5;

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub date_window: DateWindow,
    /// One file per page, in page order.
    pub files: Vec<PathBuf>,
    pub records_written: usize,
}

/// Downloads the traffic of the day three days before today and saves every page as a csv file.
///
/// The process consists of a single authentication followed by, for each page in turn, fetching
/// the page, joining its multi-value `gtmEvents` field and writing the records to
/// `page_<n>.csv` in the configured output directory. The first error aborts the run: files of
/// pages completed before it stay on disk, later pages are never requested.
pub async fn run(config: &ExtractConfig) -> Result<RunSummary> {
    run_for_window(config, DateWindow::for_run()).await
}

/// Like [`run`], for an explicit date window.
pub async fn run_for_window(
    config: &ExtractConfig,
    date_window: DateWindow,
) -> Result<RunSummary> {
    let http = http_client(config.request_timeout)?;
    let token = authenticating::authenticate(
        &http,
        &config.endpoints.auth_url,
        &config.credentials,
    )
    .await?;

    info!(
        start = date_window.start_date(),
        end = date_window.end_date(),
        "fetching {} pages",
        PAGE_COUNT
    );
    let fetcher = PageFetcher::new(&http, &config.endpoints.data_url, &token);
    let mut files = Vec::with_capacity(PAGE_COUNT as usize);
    let mut records_written = 0;
    for page in 1..=PAGE_COUNT {
        let page_data = fetcher
            .fetch_page(&date_window, &FIELDS, page, FETCH_RETRIES)
            .await?;
        flag_incomplete_records(page, &page_data.data);
        let records = flattening::flatten(page_data.data);
        files.push(writing::write_page(&config.output_dir, page, &records)?);
        records_written += records.len();
    }

    info!("Data fetching and saving completed successfully");
    Ok(RunSummary {
        date_window,
        files,
        records_written,
    })
}

fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ExtractError::Client(e.to_string()))
}

// Records lacking expected fields are still written, with empty cells.
fn flag_incomplete_records(page: u32, records: &[Record]) {
    let incomplete = records
        .iter()
        .filter(|record| !record.missing_expected_fields().is_empty())
        .count();
    if incomplete > 0 {
        warn!(
            page,
            "{} of {} records lack a timestamp or ip",
            incomplete,
            records.len()
        );
    }
}
