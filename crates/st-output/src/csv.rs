//! CSV export.
//!
//! Every export produces two files with the same header: the first
//! [`DEFAULT_HEAD_ROWS`] rows of the sorted table, and the full table.

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::info;

use crate::row::ExportRow;
use crate::table::ExportTable;
use crate::OutputResult;

/// Rows in the head-truncated file.
pub const DEFAULT_HEAD_ROWS: usize = 1000;

/// Where the two files of one export go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub full: PathBuf,
    pub head: PathBuf,
}

impl ExportPaths {
    /// `output.csv` and `output_to_1000.csv` in `dir`.
    pub fn trajectory(dir: &Path) -> Self {
        Self {
            full: dir.join("output.csv"),
            head: dir.join("output_to_1000.csv"),
        }
    }

    /// `vehicle_junction.csv` and `vehicle_junction_to_1000.csv` in `dir`.
    pub fn junction(dir: &Path) -> Self {
        Self {
            full: dir.join("vehicle_junction.csv"),
            head: dir.join("vehicle_junction_to_1000.csv"),
        }
    }
}

/// Row counts of a finished export.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExportStats {
    pub full_rows: usize,
    pub head_rows: usize,
}

/// Sorts an [`ExportTable`] and writes its head and full CSV files.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    paths:     ExportPaths,
    head_rows: usize,
}

impl CsvExporter {
    pub fn new(paths: ExportPaths) -> Self {
        Self { paths, head_rows: DEFAULT_HEAD_ROWS }
    }

    pub fn with_head_rows(mut self, n: usize) -> Self {
        self.head_rows = n;
        self
    }

    pub fn paths(&self) -> &ExportPaths {
        &self.paths
    }

    /// Sort `table` in place (vehicle id, timestamp descending), then write
    /// the head file followed by the full file.
    pub fn export<R: ExportRow>(&self, table: &mut ExportTable<R>) -> OutputResult<ExportStats> {
        table.sort_descending();

        let head = table.head(self.head_rows);
        write_rows(&self.paths.head, head)?;
        write_rows(&self.paths.full, table.rows())?;

        let stats = ExportStats { full_rows: table.len(), head_rows: head.len() };
        info!(
            "wrote {} rows to {} ({} to {})",
            stats.full_rows,
            self.paths.full.display(),
            stats.head_rows,
            self.paths.head.display(),
        );
        Ok(stats)
    }
}

fn write_rows<R: ExportRow>(path: &Path, rows: &[R]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = Writer::from_path(path)?;
    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}
