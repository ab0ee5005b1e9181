//! Reference genome loading.
//!
//! Reads the first record of a FASTA file, plain or gzip-compressed. Wrapped
//! sequence lines are joined and whitespace inside them is dropped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::{debug, info};

use crate::domain::ReferenceSequence;
use crate::error::ExtractError;

pub fn load_genome(path: &Path) -> Result<ReferenceSequence, ExtractError> {
    info!("Reading genome from {}", path.display());

    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ExtractError::GenomeNotFound(path.to_path_buf()),
        _ => ExtractError::GenomeRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    })?;

    let reader: Box<dyn BufRead> = if is_gzip_path(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let reference = read_reference(reader, path)?;
    info!(
        "Loaded genome {} ({} bp)",
        reference.id(),
        reference.genome_length()
    );
    Ok(reference)
}

/// Reads the first FASTA record from `reader`; `path` is only used in errors.
pub fn read_reference<R: BufRead>(
    mut reader: R,
    path: &Path,
) -> Result<ReferenceSequence, ExtractError> {
    let mut line = Vec::new();
    let mut header: Option<String> = None;
    let mut sequence = Vec::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut line)
            .map_err(|err| read_error(path, err))?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed[0] == b'>' {
            if header.is_some() {
                debug!("ignoring FASTA records after the first in {}", path.display());
                break;
            }
            header = Some(record_id(&trimmed[1..]));
            continue;
        }

        if header.is_none() {
            return Err(ExtractError::GenomeParse {
                path: path.to_path_buf(),
                message: "expected '>' at the start of the first record".to_string(),
            });
        }
        sequence.extend(trimmed.iter().filter(|b| !b.is_ascii_whitespace()));
    }

    match header {
        Some(id) if !sequence.is_empty() => Ok(ReferenceSequence::new(id, sequence)),
        _ => Err(ExtractError::GenomeEmpty(path.to_path_buf())),
    }
}

fn record_id(definition: &[u8]) -> String {
    String::from_utf8_lossy(definition)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn read_error(path: &Path, err: io::Error) -> ExtractError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            ExtractError::GenomeParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
        _ => ExtractError::GenomeRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    }
}

fn is_gzip_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("gz" | "bgz")
    )
}
