use std::io::{self, Write};

use serde::Serialize;
use tracing::info;

use crate::app::{ProgressEvent, ProgressSink, RunSummary};

/// Number of per-TF lines shown before the rest are collapsed.
pub const SUMMARY_TF_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        let stdout = io::stdout();
        Self::write_summary(&mut stdout.lock(), summary)
    }

    pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
        writeln!(
            out,
            "Extraction complete: {} sequences from {} transcription factors saved to {}",
            summary.total_sequences, summary.total_tfs, summary.outdir
        )?;

        let written: Vec<_> = summary.report.written().collect();
        for entry in written.iter().take(SUMMARY_TF_LIMIT) {
            writeln!(
                out,
                "  {}: {} sequences -> {}",
                entry.tf_name,
                entry.sequences,
                summary.output_path(&entry.file_stem)
            )?;
        }
        if written.len() > SUMMARY_TF_LIMIT {
            writeln!(
                out,
                "  ... and {} more transcription factors",
                written.len() - SUMMARY_TF_LIMIT
            )?;
        }

        let skipped_rows = summary.parse_diagnostics.len();
        let skipped_peaks = summary.report.diagnostics.len();
        if skipped_rows + skipped_peaks > 0 {
            writeln!(
                out,
                "Warnings: {skipped_rows} table rows skipped, {skipped_peaks} peaks or outputs skipped"
            )?;
        }
        Ok(())
    }
}

/// Reports progress through the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!("{} ({:.2?})", event.message, elapsed),
            None => info!("{}", event.message),
        }
    }
}
