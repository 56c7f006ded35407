//! Output writers for simulation results.

use crate::metrics::{CsvSummaryRow, MatchMetrics};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// JSON lines to stdout, or to a timestamped file in an output directory
/// alongside a CSV summary.
pub struct OutputWriter {
    jsonl_writer: Box<dyn Write + Send>,
    csv_writer: Option<csv::Writer<BufWriter<File>>>,
    jsonl_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
}

impl OutputWriter {
    pub fn stdout() -> Self {
        Self {
            jsonl_writer: Box::new(BufWriter::new(io::stdout())),
            csv_writer: None,
            jsonl_path: None,
            csv_path: None,
        }
    }

    pub fn to_dir(output_dir: &Path, compress: bool) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let filename = format!("matches_{}.jsonl", timestamp);
        let (jsonl_writer, jsonl_path): (Box<dyn Write + Send>, PathBuf) = if compress {
            let gz_path = output_dir.join(format!("{}.gz", filename));
            let writer = BufWriter::new(GzEncoder::new(
                File::create(&gz_path)?,
                Compression::default(),
            ));
            (Box::new(writer), gz_path)
        } else {
            let path = output_dir.join(&filename);
            (Box::new(BufWriter::new(create_truncated(&path)?)), path)
        };

        let csv_path = output_dir.join(format!("matches_{}_summary.csv", timestamp));
        let csv_writer = csv::Writer::from_writer(BufWriter::new(create_truncated(&csv_path)?));

        Ok(Self {
            jsonl_writer,
            csv_writer: Some(csv_writer),
            jsonl_path: Some(jsonl_path),
            csv_path: Some(csv_path),
        })
    }

    pub fn write_match(&mut self, metrics: &MatchMetrics) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(metrics)?;
        writeln!(self.jsonl_writer, "{}", json)?;

        if let Some(ref mut writer) = self.csv_writer {
            let row: CsvSummaryRow = metrics.into();
            writer.serialize(&row)?;
        }

        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.jsonl_writer.flush()?;
        if let Some(ref mut writer) = self.csv_writer {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn output_paths(&self) -> (Option<&PathBuf>, Option<&PathBuf>) {
        (self.jsonl_path.as_ref(), self.csv_path.as_ref())
    }
}

fn create_truncated(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}
