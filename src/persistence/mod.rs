//! CSV Persistence Module
//!
//! Per-draw and per-session rows for downstream analysis, plus a JSON
//! manifest describing each run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::batch::BatchReport;
use crate::config::SimulationConfig;
use crate::session::{DrawRecord, SessionSummary};

/// Field separator of every CSV file written
pub const DELIMITER: u8 = b';';

/// One resolved draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRow {
    pub strategy: String,
    pub trial: u32,
    pub draw: usize,
    pub bankroll: f64,
    pub stake: f64,
    pub payout: f64,
    pub number: u8,
    pub zero: bool,
    pub even: bool,
    pub odd: bool,
    pub low: bool,
    pub high: bool,
    pub red: bool,
    pub black: bool,
    /// 1-based, empty on zero
    pub column: Option<u8>,
    /// 1-based, empty on zero
    pub dozen: Option<u8>,
    pub wager: String,
}

impl From<&DrawRecord> for DrawRow {
    fn from(record: &DrawRecord) -> Self {
        let o = &record.outcome;
        Self {
            strategy: record.strategy.to_string(),
            trial: record.trial,
            draw: record.draw,
            bankroll: record.bankroll_before,
            stake: record.stake,
            payout: record.payout,
            number: o.index,
            zero: o.is_zero,
            even: o.is_even,
            odd: o.is_odd,
            low: o.is_low,
            high: o.is_high,
            red: o.is_red,
            black: o.is_black,
            column: o.column_label(),
            dozen: o.dozen_label(),
            wager: record.wager.clone(),
        }
    }
}

/// One (trial, strategy) session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub strategy: String,
    pub trial: u32,
    pub draws: usize,
    pub withdrawn: f64,
    pub bankroll: f64,
    pub peak: f64,
}

impl From<&SessionSummary> for SummaryRow {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            strategy: summary.strategy.to_string(),
            trial: summary.trial,
            draws: summary.draws_played,
            withdrawn: summary.withdrawn,
            bankroll: summary.bankroll,
            peak: summary.peak,
        }
    }
}

/// Destination for simulation output
pub trait RecordSink {
    fn write_draw(&mut self, record: &DrawRecord) -> Result<()>;

    fn write_summary(&mut self, summary: &SessionSummary) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Drops everything; for runs where only the log matters
#[derive(Debug, Default)]
pub struct DiscardSink;

impl RecordSink for DiscardSink {
    fn write_draw(&mut self, _record: &DrawRecord) -> Result<()> {
        Ok(())
    }

    fn write_summary(&mut self, _summary: &SessionSummary) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// `;`-separated CSV output: one writer for draws (optional), one for sessions
pub struct CsvSink<W: Write> {
    draw_writer: Option<csv::Writer<W>>,
    summary_writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn from_writers(draws: Option<W>, sessions: W) -> Self {
        Self {
            draw_writer: draws.map(|w| Self::builder(true).from_writer(w)),
            summary_writer: Self::builder(true).from_writer(sessions),
        }
    }

    fn builder(has_headers: bool) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder.delimiter(DELIMITER).has_headers(has_headers);
        builder
    }
}

impl CsvSink<File> {
    /// Open `draws_<stamp>.csv` and `sessions_<stamp>.csv` under `data_dir`
    pub fn create(data_dir: &Path, stamp: &str, write_draws: bool) -> Result<Self> {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        let draw_writer = if write_draws {
            Some(Self::create_writer(data_dir, &format!("draws_{}.csv", stamp))?)
        } else {
            None
        };
        let summary_writer = Self::create_writer(data_dir, &format!("sessions_{}.csv", stamp))?;

        info!(
            data_dir = %data_dir.display(),
            stamp,
            write_draws,
            "CSV output opened"
        );

        Ok(Self {
            draw_writer,
            summary_writer,
        })
    }

    fn create_writer(dir: &Path, filename: &str) -> Result<csv::Writer<File>> {
        let path = dir.join(filename);
        let file_has_data =
            path.exists() && fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

        Ok(Self::builder(!file_has_data).from_writer(file))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_draw(&mut self, record: &DrawRecord) -> Result<()> {
        if let Some(writer) = self.draw_writer.as_mut() {
            writer
                .serialize(DrawRow::from(record))
                .context("Failed to write draw record")?;
        }
        Ok(())
    }

    fn write_summary(&mut self, summary: &SessionSummary) -> Result<()> {
        self.summary_writer
            .serialize(SummaryRow::from(summary))
            .context("Failed to write session summary")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.draw_writer.as_mut() {
            writer.flush().context("Failed to flush draw writer")?;
        }
        self.summary_writer
            .flush()
            .context("Failed to flush session writer")?;
        Ok(())
    }
}

/// Timestamp used to name the files of one run
pub fn run_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// What was run, with which settings, and how it ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub simulation: SimulationConfig,
    pub report: Option<BatchReport>,
}

impl RunManifest {
    pub fn start(simulation: SimulationConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: None,
            simulation,
            report: None,
        }
    }

    pub fn finish(&mut self, report: BatchReport) {
        self.finished_at = Some(Utc::now());
        self.report = Some(report);
    }

    /// Write `run_<stamp>.json` under `data_dir`
    pub fn save(&self, data_dir: &Path, stamp: &str) -> Result<PathBuf> {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        let path = data_dir.join(format!("run_{}.json", stamp));
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        info!(path = %path.display(), run_id = %self.run_id, "Run manifest saved");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&json).context("Failed to parse manifest")
    }
}
