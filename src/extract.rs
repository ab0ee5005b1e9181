//! Coordinate-to-sequence extraction.
//!
//! Each TF gets one sink. Records are sliced from the reference and written
//! as two-line FASTA entries. A sink is committed only when it received at
//! least one record and every write succeeded; in every other case it is
//! dropped, and dropping discards it.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::ops::Range;

use camino::Utf8PathBuf;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::diagnostic::ExtractDiagnostic;
use crate::domain::{PeakRecord, PeakTable, ReferenceSequence, sanitize_tf_name};
use crate::error::ExtractError;
use crate::report::ExtractionReport;

pub const DEFAULT_EXTENSION: &str = "fa";

/// A per-TF output destination.
pub trait FastaSink: Write {
    /// Publishes everything written so far. Dropping a sink without
    /// committing it must leave nothing behind.
    fn commit(self) -> io::Result<()>;
}

pub trait SinkFactory {
    type Sink: FastaSink;

    fn open(&mut self, name: &str) -> io::Result<Self::Sink>;

    /// Where output for `name` ends up, for diagnostics.
    fn describe(&self, name: &str) -> String;
}

/// Writes each TF to `{dir}/{name}.{extension}`.
#[derive(Debug, Clone)]
pub struct FastaDirectory {
    dir: Utf8PathBuf,
    extension: String,
}

impl FastaDirectory {
    pub fn new(dir: impl Into<Utf8PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Like [`FastaDirectory::new`], creating the directory if needed.
    pub fn create(
        dir: impl Into<Utf8PathBuf>,
        extension: impl Into<String>,
    ) -> Result<Self, ExtractError> {
        let directory = Self::new(dir, extension);
        fs::create_dir_all(directory.dir.as_std_path()).map_err(|err| {
            ExtractError::OutputDir {
                path: directory.dir.clone().into_std_path_buf(),
                message: err.to_string(),
            }
        })?;
        Ok(directory)
    }

    pub fn path_for(&self, name: &str) -> Utf8PathBuf {
        self.dir.join(format!("{name}.{}", self.extension))
    }
}

impl SinkFactory for FastaDirectory {
    type Sink = DirectorySink;

    fn open(&mut self, name: &str) -> io::Result<DirectorySink> {
        if name.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "TF name has no file-safe characters",
            ));
        }
        let temp = Builder::new()
            .prefix(".tfbs-extract")
            .suffix(".tmp")
            .tempfile_in(self.dir.as_std_path())?;
        Ok(DirectorySink {
            writer: BufWriter::new(temp),
            destination: self.path_for(name),
        })
    }

    fn describe(&self, name: &str) -> String {
        self.path_for(name).to_string()
    }
}

/// Buffers into a temporary file next to its destination and renames it into
/// place on commit.
pub struct DirectorySink {
    writer: BufWriter<NamedTempFile>,
    destination: Utf8PathBuf,
}

impl Write for DirectorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl FastaSink for DirectorySink {
    fn commit(self) -> io::Result<()> {
        let temp = self.writer.into_inner().map_err(|err| err.into_error())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        temp.persist(self.destination.as_std_path())
            .map_err(|err| err.error)?;
        Ok(())
    }
}

/// Converts a 1-based inclusive interval into a 0-based half-open range,
/// or `None` when it does not fit in `genome_length`.
pub fn slice_range(start: i64, end: i64, genome_length: usize) -> Option<Range<usize>> {
    let offset_start = usize::try_from(start.checked_sub(1)?).ok()?;
    let offset_end = usize::try_from(end).ok()?;
    if offset_start > offset_end || offset_end > genome_length {
        return None;
    }
    Some(offset_start..offset_end)
}

/// Writes every in-bounds peak of every TF to its sink.
pub fn extract<F: SinkFactory>(
    table: &PeakTable,
    reference: &ReferenceSequence,
    sinks: &mut F,
) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for (tf_name, peaks) in table.iter() {
        let name = sanitize_tf_name(tf_name);
        let written = extract_tf(
            tf_name,
            &name,
            peaks,
            reference,
            sinks,
            &mut report.diagnostics,
        );
        debug!(tf = tf_name, written, total = peaks.len(), "extracted TF");
        report.record(tf_name, name, written);
    }

    report
}

fn extract_tf<F: SinkFactory>(
    tf_name: &str,
    name: &str,
    peaks: &[PeakRecord],
    reference: &ReferenceSequence,
    sinks: &mut F,
    diagnostics: &mut Vec<ExtractDiagnostic>,
) -> usize {
    let mut sink = match sinks.open(name) {
        Ok(sink) => sink,
        Err(err) => {
            diagnostics.push(ExtractDiagnostic::SinkOpen {
                tf_name: tf_name.to_string(),
                sink: sinks.describe(name),
                message: err.to_string(),
            });
            return 0;
        }
    };

    let genome_length = reference.genome_length();
    let mut written = 0;

    for peak in peaks {
        let sequence = slice_range(peak.start(), peak.end(), genome_length)
            .and_then(|range| reference.get(range));
        let Some(sequence) = sequence else {
            diagnostics.push(ExtractDiagnostic::OutOfBounds {
                tf_name: tf_name.to_string(),
                peak_id: peak.peak_id().to_string(),
                start: peak.start(),
                end: peak.end(),
                genome_length,
            });
            continue;
        };

        if let Err(err) = write_record(&mut sink, peak, sequence) {
            diagnostics.push(ExtractDiagnostic::SinkWrite {
                tf_name: tf_name.to_string(),
                sink: sinks.describe(name),
                message: err.to_string(),
            });
            return 0;
        }
        written += 1;
    }

    if written == 0 {
        return 0;
    }

    match sink.commit() {
        Ok(()) => written,
        Err(err) => {
            diagnostics.push(ExtractDiagnostic::SinkWrite {
                tf_name: tf_name.to_string(),
                sink: sinks.describe(name),
                message: err.to_string(),
            });
            0
        }
    }
}

fn write_record<W: Write>(writer: &mut W, peak: &PeakRecord, sequence: &[u8]) -> io::Result<()> {
    writeln!(writer, ">{}|{}-{}", peak.peak_id(), peak.start(), peak.end())?;
    writer.write_all(sequence)?;
    writer.write_all(b"\n")
}
