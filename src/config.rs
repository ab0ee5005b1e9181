use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::extract::DEFAULT_EXTENSION;

pub const DEFAULT_CONFIG_FILE: &str = "tfbs-extract.json";

/// Settings as written in `tfbs-extract.json`; every key is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub peaks: Option<PathBuf>,
    #[serde(default)]
    pub genome: Option<PathBuf>,
    #[serde(default)]
    pub outdir: Option<PathBuf>,
    #[serde(default)]
    pub extension: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub peaks: Option<PathBuf>,
    pub genome: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub peaks: PathBuf,
    pub genome: PathBuf,
    pub outdir: PathBuf,
    pub extension: String,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `path`, or `tfbs-extract.json` when present, and applies
    /// `overrides` on top.
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ExtractError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| ExtractError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content)
                .map_err(|err| ExtractError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, ExtractError> {
        let peaks = overrides
            .peaks
            .or(config.peaks)
            .ok_or(ExtractError::MissingSetting("peaks"))?;
        let genome = overrides
            .genome
            .or(config.genome)
            .ok_or(ExtractError::MissingSetting("genome"))?;
        let outdir = overrides
            .outdir
            .or(config.outdir)
            .ok_or(ExtractError::MissingSetting("outdir"))?;
        let extension = overrides
            .extension
            .or(config.extension)
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        if extension.contains(['/', '\\']) {
            return Err(ExtractError::InvalidExtension(extension));
        }

        Ok(ResolvedConfig {
            peaks,
            genome,
            outdir,
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn overrides_win_over_file() {
        let config = Config {
            peaks: Some(PathBuf::from("file.tsv")),
            genome: Some(PathBuf::from("genome.fa")),
            outdir: Some(PathBuf::from("results")),
            extension: None,
        };
        let overrides = ConfigOverrides {
            peaks: Some(PathBuf::from("cli.tsv")),
            ..ConfigOverrides::default()
        };

        let resolved = ConfigLoader::resolve_config(config, overrides).unwrap();
        assert_eq!(resolved.peaks, PathBuf::from("cli.tsv"));
        assert_eq!(resolved.genome, PathBuf::from("genome.fa"));
        assert_eq!(resolved.extension, "fa");
    }

    #[test]
    fn missing_setting_is_named() {
        let err = ConfigLoader::resolve_config(Config::default(), ConfigOverrides::default())
            .unwrap_err();
        assert_matches!(err, ExtractError::MissingSetting("peaks"));
    }

    #[test]
    fn extension_dot_is_optional() {
        let overrides = ConfigOverrides {
            peaks: Some(PathBuf::from("p.tsv")),
            genome: Some(PathBuf::from("g.fa")),
            outdir: Some(PathBuf::from("out")),
            extension: Some(".fasta".to_string()),
        };
        let resolved = ConfigLoader::resolve_config(Config::default(), overrides).unwrap();
        assert_eq!(resolved.extension, "fasta");
    }

    #[test]
    fn extension_with_path_separator_is_rejected() {
        for extension in ["fa/../../escape", "fa\\x"] {
            let overrides = ConfigOverrides {
                peaks: Some(PathBuf::from("p.tsv")),
                genome: Some(PathBuf::from("g.fa")),
                outdir: Some(PathBuf::from("out")),
                extension: Some(extension.to_string()),
            };
            let err = ConfigLoader::resolve_config(Config::default(), overrides).unwrap_err();
            assert_matches!(err, ExtractError::InvalidExtension(ext) if ext == extension);
        }
    }
}
