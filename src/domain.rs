use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

/// One accepted binding-site interval, in 1-based inclusive coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakRecord {
    tf_name: String,
    start: i64,
    end: i64,
    peak_id: String,
}

impl PeakRecord {
    /// Returns `None` when the name is empty or `start > end`.
    pub fn new(
        tf_name: impl Into<String>,
        start: i64,
        end: i64,
        peak_id: impl Into<String>,
    ) -> Option<Self> {
        let tf_name = tf_name.into();
        if tf_name.is_empty() || start > end {
            return None;
        }
        Some(Self {
            tf_name,
            start,
            end,
            peak_id: peak_id.into(),
        })
    }

    pub fn tf_name(&self) -> &str {
        &self.tf_name
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn peak_id(&self) -> &str {
        &self.peak_id
    }
}

impl fmt::Display for PeakRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}-{}", self.peak_id, self.start, self.end)
    }
}

/// Peak records grouped by TF name.
///
/// TFs iterate in first-seen order and each TF keeps its records in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakTable {
    groups: Vec<(String, Vec<PeakRecord>)>,
    index: HashMap<String, usize>,
}

impl PeakTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PeakRecord) {
        match self.index.get(record.tf_name()) {
            Some(&slot) => self.groups[slot].1.push(record),
            None => {
                let name = record.tf_name().to_string();
                self.index.insert(name.clone(), self.groups.len());
                self.groups.push((name, vec![record]));
            }
        }
    }

    pub fn get(&self, tf_name: &str) -> Option<&[PeakRecord]> {
        self.index
            .get(tf_name)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PeakRecord])> {
        self.groups
            .iter()
            .map(|(name, peaks)| (name.as_str(), peaks.as_slice()))
    }

    pub fn tf_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Number of distinct TFs.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn peak_count(&self) -> usize {
        self.groups.iter().map(|(_, peaks)| peaks.len()).sum()
    }
}

impl FromIterator<PeakRecord> for PeakTable {
    fn from_iter<I: IntoIterator<Item = PeakRecord>>(iter: I) -> Self {
        let mut table = PeakTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

/// The single contig peaks are extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    id: String,
    sequence: Vec<u8>,
}

impl ReferenceSequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.sequence
    }

    pub fn genome_length(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// 0-based half-open slice; `None` when the range leaves the sequence.
    pub fn get(&self, range: Range<usize>) -> Option<&[u8]> {
        self.sequence.get(range)
    }
}

/// Reduces a TF name to a file-system safe stem.
///
/// Only alphanumerics, `_` and `-` survive; trailing whitespace is stripped
/// from what remains. Distinct names may collapse to the same stem.
pub fn sanitize_tf_name(tf_name: &str) -> String {
    let kept: String = tf_name
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-'))
        .collect();
    kept.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(tf: &str, start: i64, end: i64, id: &str) -> PeakRecord {
        PeakRecord::new(tf, start, end, id).unwrap()
    }

    #[test]
    fn record_rejects_inverted_interval() {
        assert!(PeakRecord::new("FNR", 10, 9, "GSE1_1").is_none());
        assert!(PeakRecord::new("FNR", 9, 9, "GSE1_1").is_some());
    }

    #[test]
    fn record_rejects_empty_name() {
        assert!(PeakRecord::new("", 1, 2, "GSE1_1").is_none());
    }

    #[test]
    fn table_preserves_first_seen_order() {
        let table: PeakTable = vec![
            peak("FNR", 1, 2, "a"),
            peak("ArcA", 3, 4, "b"),
            peak("FNR", 5, 6, "c"),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.tf_names().collect::<Vec<_>>(), vec!["FNR", "ArcA"]);
        let fnr: Vec<_> = table.get("FNR").unwrap().iter().map(|p| p.peak_id()).collect();
        assert_eq!(fnr, vec!["a", "c"]);
        assert_eq!(table.peak_count(), 3);
    }

    #[test]
    fn sanitize_drops_unsafe_characters() {
        assert_eq!(sanitize_tf_name("FNR"), "FNR");
        assert_eq!(sanitize_tf_name("Fur/Fe2+"), "FurFe2");
        assert_eq!(sanitize_tf_name("lexA_1-b"), "lexA_1-b");
        assert_eq!(sanitize_tf_name("Arc A "), "ArcA");
        assert_eq!(sanitize_tf_name("../../etc"), "etc");
    }

    #[test]
    fn reference_get_is_bounds_checked() {
        let reference = ReferenceSequence::new("chr", "ACGT");
        assert_eq!(reference.get(1..3), Some(&b"CG"[..]));
        assert_eq!(reference.get(2..5), None);
        assert_eq!(reference.genome_length(), 4);
    }
}
