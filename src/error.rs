use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("peak table is missing required columns: {}", .missing.join(", "))]
    #[diagnostic(help("the header must contain TF_name, Peak_start, Peak_end, Dataset_Ids and Peak_number"))]
    MissingColumns { missing: Vec<String> },

    #[error("peak file not found: {0}")]
    PeakFileNotFound(PathBuf),

    #[error("failed to read peak table: {0}")]
    PeakTableRead(String),

    #[error("no valid peaks found in the peak table")]
    NoValidPeaks,

    #[error("genome file not found: {0}")]
    GenomeNotFound(PathBuf),

    #[error("genome file contains no sequence record: {0}")]
    GenomeEmpty(PathBuf),

    #[error("failed to parse genome FASTA {path}: {message}")]
    GenomeParse { path: PathBuf, message: String },

    #[error("failed to read genome file {path}: {message}")]
    GenomeRead { path: PathBuf, message: String },

    #[error("cannot create output directory {path}: {message}")]
    OutputDir { path: PathBuf, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("missing required setting: {0}")]
    #[diagnostic(help("pass it on the command line or set it in tfbs-extract.json"))]
    MissingSetting(&'static str),

    #[error("invalid output extension {0:?}: must not contain a path separator")]
    #[diagnostic(help("use a bare extension such as fa or fasta"))]
    InvalidExtension(String),
}
