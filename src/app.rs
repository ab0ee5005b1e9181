use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::warn;

use crate::config::ResolvedConfig;
use crate::diagnostic::RowDiagnostic;
use crate::error::ExtractError;
use crate::extract::{FastaDirectory, extract};
use crate::genome::load_genome;
use crate::peaks::{ParsedPeaks, parse};
use crate::report::ExtractionReport;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub peaks: String,
    pub genome: String,
    pub outdir: String,
    pub extension: String,
    pub genome_id: String,
    pub genome_length: usize,
    pub total_tfs: usize,
    pub total_sequences: usize,
    pub parse_diagnostics: Vec<RowDiagnostic>,
    pub report: ExtractionReport,
}

impl RunSummary {
    pub fn output_path(&self, file_stem: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(self.outdir.as_str())
            .join(format!("{file_stem}.{}", self.extension))
    }
}

/// Runs the peak parser, genome loader and extractor over one configuration.
pub struct App {
    config: ResolvedConfig,
}

impl App {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunSummary, ExtractError> {
        let started = Instant::now();
        let ResolvedConfig {
            peaks,
            genome,
            outdir,
            extension,
        } = &self.config;

        if !peaks.exists() {
            return Err(ExtractError::PeakFileNotFound(peaks.clone()));
        }
        if !genome.exists() {
            return Err(ExtractError::GenomeNotFound(genome.clone()));
        }
        let outdir = Utf8PathBuf::from_path_buf(outdir.clone()).map_err(|path| {
            ExtractError::OutputDir {
                path,
                message: "path is not valid UTF-8".to_string(),
            }
        })?;
        let mut directory = FastaDirectory::create(outdir.clone(), extension.clone())?;

        sink.event(ProgressEvent {
            message: format!("phase=Peaks; step 1/2 parsing {}", peaks.display()),
            elapsed: None,
        });
        let ParsedPeaks { table, diagnostics } = read_peaks(peaks)?;
        for diagnostic in &diagnostics {
            warn!("{diagnostic}");
        }
        if table.is_empty() {
            return Err(ExtractError::NoValidPeaks);
        }
        sink.event(ProgressEvent {
            message: format!(
                "found {} transcription factors with {} valid peaks",
                table.len(),
                table.peak_count()
            ),
            elapsed: Some(started.elapsed()),
        });

        sink.event(ProgressEvent {
            message: format!("phase=Extract; step 2/2 extracting into {outdir}"),
            elapsed: None,
        });
        let reference = load_genome(genome)?;
        sink.event(ProgressEvent {
            message: format!(
                "genome {} loaded ({} bp)",
                reference.id(),
                reference.genome_length()
            ),
            elapsed: Some(started.elapsed()),
        });

        let report = extract(&table, &reference, &mut directory);
        for diagnostic in &report.diagnostics {
            warn!("{diagnostic}");
        }
        sink.event(ProgressEvent {
            message: format!(
                "phase=Done; {} sequences written for {} transcription factors",
                report.total_sequences(),
                report.total_tfs()
            ),
            elapsed: Some(started.elapsed()),
        });

        Ok(RunSummary {
            peaks: peaks.display().to_string(),
            genome: genome.display().to_string(),
            outdir: outdir.to_string(),
            extension: extension.clone(),
            genome_id: reference.id().to_string(),
            genome_length: reference.genome_length(),
            total_tfs: report.total_tfs(),
            total_sequences: report.total_sequences(),
            parse_diagnostics: diagnostics,
            report,
        })
    }
}

fn read_peaks(path: &Path) -> Result<ParsedPeaks, ExtractError> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ExtractError::PeakFileNotFound(path.to_path_buf()),
        _ => ExtractError::PeakTableRead(format!("{}: {err}", path.display())),
    })?;
    parse(BufReader::new(file))
}
