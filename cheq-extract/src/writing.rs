// This module contains functionality related to writing pages of traffic records as csv files.
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use csv::Writer;
use tracing::info;

use crate::{
    error::{ExtractError, Result},
    records::{Record, FIELDS, HEADER_TITLES},
};

/// Writes `records` to `page_<page>.csv` inside `out_directory` and returns the path written.
/// An existing file of the same name is overwritten.
pub fn write_page<P: AsRef<Path>>(
    out_directory: P,
    page: u32,
    records: &[Record],
) -> Result<PathBuf> {
    let path = common_utils::file_utils::page_file_path(out_directory, page);
    let to_write_error = |source: csv::Error| ExtractError::Write {
        page,
        path: path.clone(),
        source,
    };

    let mut writer = Writer::from_path(&path).map_err(to_write_error)?;
    write_records(&mut writer, records).map_err(to_write_error)?;
    info!("Page {} data saved to {}", page, path.display());
    Ok(path)
}

// Writes the header row followed by one row per record. Absent values become empty cells.
pub(crate) fn write_records<W: Write>(
    writer: &mut Writer<W>,
    records: &[Record],
) -> csv::Result<()> {
    writer.write_record(HEADER_TITLES)?;
    for record in records {
        writer.write_record(
            FIELDS
                .iter()
                .map(|name| record.field(name).unwrap_or_default().into_owned()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
