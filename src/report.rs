use serde::Serialize;

use crate::diagnostic::ExtractDiagnostic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TfCount {
    pub tf_name: String,
    pub file_stem: String,
    pub sequences: usize,
}

/// Outcome of one extraction pass, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub entries: Vec<TfCount>,
    pub diagnostics: Vec<ExtractDiagnostic>,
}

impl ExtractionReport {
    pub(crate) fn record(&mut self, tf_name: &str, file_stem: String, sequences: usize) {
        self.entries.push(TfCount {
            tf_name: tf_name.to_string(),
            file_stem,
            sequences,
        });
    }

    pub fn count(&self, tf_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.tf_name == tf_name)
            .map(|entry| entry.sequences)
    }

    /// TFs with at least one sequence written.
    pub fn total_tfs(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.sequences > 0)
            .count()
    }

    pub fn total_sequences(&self) -> usize {
        self.entries.iter().map(|entry| entry.sequences).sum()
    }

    pub fn written(&self) -> impl Iterator<Item = &TfCount> {
        self.entries.iter().filter(|entry| entry.sequences > 0)
    }
}
