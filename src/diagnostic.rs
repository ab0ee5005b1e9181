//! Recoverable problems found while parsing or extracting.
//!
//! These never abort a run. They are collected and handed back to the caller
//! next to the primary result.

use serde::Serialize;
use thiserror::Error;

/// A data row of the peak table that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowDiagnostic {
    #[error("line {line} has {found} fields (expected {expected}), skipped")]
    FieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("line {line} has no value for column {column}, skipped")]
    MissingField { line: usize, column: String },

    #[error("line {line} has an empty TF_name, skipped")]
    EmptyTfName { line: usize },

    #[error("line {line}: invalid {column} value {value:?}: {reason}, skipped")]
    InvalidCoordinate {
        line: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("line {line} has invalid coordinates ({start} > {end}), skipped")]
    InvertedInterval { line: usize, start: i64, end: i64 },
}

impl RowDiagnostic {
    pub fn line(&self) -> usize {
        match self {
            RowDiagnostic::FieldCount { line, .. }
            | RowDiagnostic::MissingField { line, .. }
            | RowDiagnostic::EmptyTfName { line }
            | RowDiagnostic::InvalidCoordinate { line, .. }
            | RowDiagnostic::InvertedInterval { line, .. } => *line,
        }
    }
}

/// A peak or a whole TF that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractDiagnostic {
    #[error(
        "peak {peak_id} ({start}-{end}) of {tf_name} is outside the genome (length {genome_length}), skipped"
    )]
    OutOfBounds {
        tf_name: String,
        peak_id: String,
        start: i64,
        end: i64,
        genome_length: usize,
    },

    #[error("cannot open output {sink} for {tf_name}: {message}")]
    SinkOpen {
        tf_name: String,
        sink: String,
        message: String,
    },

    #[error("cannot write output {sink} for {tf_name}: {message}")]
    SinkWrite {
        tf_name: String,
        sink: String,
        message: String,
    },
}
