//! Peak table parsing.
//!
//! The table is tab separated with a single header line. Columns are located
//! by name, so extra columns and any column order are accepted. Surrounding
//! whitespace is stripped from every line before it is split. Rows that
//! cannot become a [`PeakRecord`] are skipped and reported as a
//! [`RowDiagnostic`]; only a header lacking required columns is fatal.

use std::collections::HashMap;
use std::io::BufRead;

use tracing::debug;

use crate::diagnostic::RowDiagnostic;
use crate::domain::{PeakRecord, PeakTable};
use crate::error::ExtractError;

pub const TF_NAME: &str = "TF_name";
pub const PEAK_START: &str = "Peak_start";
pub const PEAK_END: &str = "Peak_end";
pub const DATASET_IDS: &str = "Dataset_Ids";
pub const PEAK_NUMBER: &str = "Peak_number";

pub const REQUIRED_COLUMNS: [&str; 5] = [TF_NAME, PEAK_START, PEAK_END, DATASET_IDS, PEAK_NUMBER];

#[derive(Debug, Clone, Default)]
pub struct ParsedPeaks {
    pub table: PeakTable,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Parses a peak table stream into records grouped by TF.
///
/// The returned table may be empty; deciding whether that is an error is left
/// to the caller.
pub fn parse<R: BufRead>(reader: R) -> Result<ParsedPeaks, ExtractError> {
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line.map_err(|err| ExtractError::PeakTableRead(err.to_string()))?,
        None => String::new(),
    };
    let header = Header::parse(header_line.trim())?;

    let mut parsed = ParsedPeaks::default();
    for (offset, line) in lines.enumerate() {
        let line = line.map_err(|err| ExtractError::PeakTableRead(err.to_string()))?;

        // header is line 1
        let line_number = offset + 2;
        match header.record(line_number, line.trim()) {
            Ok(record) => parsed.table.push(record),
            Err(diagnostic) => parsed.diagnostics.push(diagnostic),
        }
    }

    debug!(
        tfs = parsed.table.len(),
        peaks = parsed.table.peak_count(),
        skipped = parsed.diagnostics.len(),
        "parsed peak table"
    );

    Ok(parsed)
}

struct Header {
    width: usize,
    positions: HashMap<String, usize>,
}

impl Header {
    fn parse(line: &str) -> Result<Self, ExtractError> {
        let columns: Vec<&str> = line.split('\t').collect();
        let positions: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !positions.contains_key(*column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ExtractError::MissingColumns { missing });
        }

        Ok(Self {
            width: columns.len(),
            positions,
        })
    }

    fn record(&self, line: usize, text: &str) -> Result<PeakRecord, RowDiagnostic> {
        let fields: Vec<&str> = text.split('\t').collect();
        if fields.len() != self.width {
            return Err(RowDiagnostic::FieldCount {
                line,
                found: fields.len(),
                expected: self.width,
            });
        }

        let row = Row {
            line,
            fields: &fields,
            header: self,
        };

        let tf_name = row.field(TF_NAME)?;
        if tf_name.is_empty() {
            return Err(RowDiagnostic::EmptyTfName { line });
        }
        let start = row.coordinate(PEAK_START)?;
        let end = row.coordinate(PEAK_END)?;
        if start > end {
            return Err(RowDiagnostic::InvertedInterval { line, start, end });
        }
        let peak_id = format!("{}_{}", row.field(DATASET_IDS)?, row.field(PEAK_NUMBER)?);

        PeakRecord::new(tf_name, start, end, peak_id)
            .ok_or(RowDiagnostic::InvertedInterval { line, start, end })
    }
}

struct Row<'a> {
    line: usize,
    fields: &'a [&'a str],
    header: &'a Header,
}

impl<'a> Row<'a> {
    fn field(&self, column: &str) -> Result<&'a str, RowDiagnostic> {
        self.header
            .positions
            .get(column)
            .and_then(|&idx| self.fields.get(idx).copied())
            .ok_or_else(|| RowDiagnostic::MissingField {
                line: self.line,
                column: column.to_string(),
            })
    }

    fn coordinate(&self, column: &str) -> Result<i64, RowDiagnostic> {
        let value = self.field(column)?;
        parse_coordinate(value).map_err(|reason| RowDiagnostic::InvalidCoordinate {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        })
    }
}

/// Parses numeric text and truncates it towards zero, so `"120.0"` and
/// `"120.9"` both yield 120.
///
/// Magnitudes beyond `i64` saturate; such peaks are still well formed and are
/// rejected later by the genome bounds check.
pub fn parse_coordinate(value: &str) -> Result<i64, String> {
    let number: f64 = value.trim().parse().map_err(|err| format!("{err}"))?;
    if !number.is_finite() {
        return Err("not a finite number".to_string());
    }
    Ok(number.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const HEADER: &str = "TF_name\tPeak_start\tPeak_end\tDataset_Ids\tPeak_number\n";

    fn parse_str(text: &str) -> ParsedPeaks {
        parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn coordinate_truncates_decimals() {
        assert_eq!(parse_coordinate("120"), Ok(120));
        assert_eq!(parse_coordinate("120.0"), Ok(120));
        assert_eq!(parse_coordinate("120.9"), Ok(120));
        assert_eq!(parse_coordinate(" 7 "), Ok(7));
        assert_eq!(parse_coordinate("-0.5"), Ok(0));
        assert_eq!(parse_coordinate("1e3"), Ok(1000));
        assert_eq!(parse_coordinate("1e30"), Ok(i64::MAX));
        assert_eq!(parse_coordinate("-1e30"), Ok(i64::MIN));
    }

    #[test]
    fn coordinate_rejects_non_numbers() {
        assert!(parse_coordinate("abc").is_err());
        assert!(parse_coordinate("").is_err());
        assert!(parse_coordinate("NaN").is_err());
        assert!(parse_coordinate("inf").is_err());
    }

    #[test]
    fn empty_stream_misses_every_column() {
        let err = parse("".as_bytes()).unwrap_err();
        assert_matches!(err, ExtractError::MissingColumns { missing } if missing.len() == 5);
    }

    #[test]
    fn columns_are_found_by_name() {
        let text = "Peak_number\tExtra\tPeak_end\tTF_name\tDataset_Ids\tPeak_start\n\
                    7\tx\t20\tFNR\tGSE9\t11\n";
        let parsed = parse_str(text);
        let record = &parsed.table.get("FNR").unwrap()[0];
        assert_eq!(record.start(), 11);
        assert_eq!(record.end(), 20);
        assert_eq!(record.peak_id(), "GSE9_7");
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = "TF_name\tPeak_start\tPeak_end\tDataset_Ids\tPeak_number\r\nFNR\t1\t2\tGSE1\t1\r\n";
        let parsed = parse_str(text);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.table.get("FNR").unwrap()[0].peak_id(), "GSE1_1");
    }

    #[test]
    fn blank_line_is_a_short_row() {
        let text = format!("{HEADER}FNR\t1\t2\tGSE1\t1\n\nFNR\t3\t4\tGSE1\t2\n");
        let parsed = parse_str(&text);
        assert_eq!(
            parsed.diagnostics,
            vec![RowDiagnostic::FieldCount {
                line: 3,
                found: 1,
                expected: 5
            }]
        );
        assert_eq!(parsed.table.peak_count(), 2);
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let text = "TF_name\tPeak_start\tPeak_end\tDataset_Ids\tPeak_number \n\
                    FNR\t1\t2\tGSE1\t1\t\n \
                    FNR\t3\t4\tGSE1\t2\n";
        let parsed = parse_str(text);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.table.tf_names().collect::<Vec<_>>(), vec!["FNR"]);
        let ids: Vec<&str> = parsed
            .table
            .get("FNR")
            .unwrap()
            .iter()
            .map(|peak| peak.peak_id())
            .collect();
        assert_eq!(ids, vec!["GSE1_1", "GSE1_2"]);
    }

    #[test]
    fn empty_tf_name_is_rejected() {
        let text = "Peak_start\tTF_name\tPeak_end\tDataset_Ids\tPeak_number\n1\t\t2\tGSE1\t1\n";
        let parsed = parse_str(text);
        assert!(parsed.table.is_empty());
        assert_eq!(parsed.diagnostics, vec![RowDiagnostic::EmptyTfName { line: 2 }]);
    }

    #[test]
    fn invalid_coordinate_names_column_and_value() {
        let text = format!("{HEADER}FNR\t1\tten\tGSE1\t1\n");
        let parsed = parse_str(&text);
        assert_matches!(
            &parsed.diagnostics[0],
            RowDiagnostic::InvalidCoordinate { line: 2, column, value, .. }
                if column == "Peak_end" && value == "ten"
        );
    }
}
