//! Extract ChIP-Seq binding-site sequences per transcription factor.
//!
//! A tab-separated peak table is parsed into records grouped by TF
//! ([`peaks::parse`]), each record's 1-based inclusive interval is sliced out
//! of a single reference sequence ([`genome::load_genome`]), and every TF's
//! sequences are written to their own FASTA file ([`extract::extract`]).

pub mod app;
pub mod config;
pub mod diagnostic;
pub mod domain;
pub mod error;
pub mod extract;
pub mod genome;
pub mod output;
pub mod peaks;
pub mod report;

pub use domain::{PeakRecord, PeakTable, ReferenceSequence, sanitize_tf_name};
pub use error::ExtractError;
pub use extract::{FastaDirectory, FastaSink, SinkFactory, extract};
pub use peaks::{ParsedPeaks, parse};
pub use report::ExtractionReport;
