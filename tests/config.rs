use std::path::PathBuf;

use assert_matches::assert_matches;

use tfbs_extract::config::{Config, ConfigLoader, ConfigOverrides};
use tfbs_extract::error::ExtractError;

#[test]
fn config_file_supplies_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("tfbs-extract.json");
    std::fs::write(
        &path,
        r#"{"peaks": "data/peaks.tsv", "genome": "data/genome.fa", "outdir": "results", "extension": "fasta"}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(
        path.to_str(),
        ConfigOverrides {
            outdir: Some(PathBuf::from("elsewhere")),
            ..ConfigOverrides::default()
        },
    )
    .unwrap();

    assert_eq!(resolved.peaks, PathBuf::from("data/peaks.tsv"));
    assert_eq!(resolved.outdir, PathBuf::from("elsewhere"));
    assert_eq!(resolved.extension, "fasta");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, ExtractError::ConfigRead(_));
}

#[test]
fn unknown_keys_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("tfbs-extract.json");
    std::fs::write(&path, r#"{"peak": "typo.tsv"}"#).unwrap();

    let err = ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, ExtractError::ConfigParse(_));
}

#[test]
fn overrides_alone_are_enough() {
    let resolved = ConfigLoader::resolve_config(
        Config::default(),
        ConfigOverrides {
            peaks: Some(PathBuf::from("p.tsv")),
            genome: Some(PathBuf::from("g.fa")),
            outdir: Some(PathBuf::from("out")),
            extension: None,
        },
    )
    .unwrap();
    assert_eq!(resolved.extension, "fa");
}
