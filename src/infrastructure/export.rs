//! CSV export of ranking tables.

use crate::application::ranking::RankingTable;
use crate::domain::market::WindowStats;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct RankingCsvExporter {
    output_dir: PathBuf,
}

impl RankingCsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one table as `{category}_{kind}_{window}.csv` with a header of
    /// `ticker` plus the stats field names. The full ranking is written,
    /// never truncated.
    pub fn export(&self, table: &RankingTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {:?}", self.output_dir)
        })?;

        let filename = format!(
            "{}_{}_{}.csv",
            table.category.label(),
            table.kind.label(),
            table.window.label()
        );
        let path = self.output_dir.join(filename);

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to open {:?}", path))?;

        let mut header = vec!["ticker"];
        header.extend(WindowStats::CSV_FIELDS);
        writer.write_record(&header).context("Failed to write CSV header")?;

        for row in &table.rows {
            let mut record = vec![row.ticker.clone()];
            record.extend(row.stats.csv_record());
            writer
                .write_record(&record)
                .with_context(|| format!("Failed to write row for {}", row.ticker))?;
        }

        writer.flush().context("Failed to flush CSV writer")?;
        Ok(path)
    }
}
