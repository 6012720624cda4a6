use crate::config::{constants, InputFormat, LogFormat, LogSpanEvents};
use anyhow::Context;
use etcetera::BaseStrategy;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "icmplens.toml";
const DEFAULT_HIDDEN_CONFIG_FILE: &str = ".icmplens.toml";

/// Read the config from the default location of user config for the platform.
///
/// Returns the parsed `Some(ConfigFile)` if the config file exists, `None` otherwise.
///
/// An `icmplens.toml` or `.icmplens.toml` config file is looked for in the following locations:
///     - the current directory
///     - the user home directory
///     - the XDG config directory (Unix only): `$XDG_CONFIG_HOME` or `~/.config`
///     - the XDG app config directory (Unix only): `$XDG_CONFIG_HOME/icmplens` or
///       `~/.config/icmplens`
///     - the Windows data directory (Windows only): `%APPDATA%`
///
/// Only the first config file found is used.
pub fn read_default_config_file() -> anyhow::Result<Option<ConfigFile>> {
    use etcetera::base_strategy as base;
    if let Some(file) = read_files("")? {
        return Ok(Some(file));
    }
    let basedirs = base::choose_base_strategy()?;
    for dir in [
        basedirs.home_dir().to_path_buf(),
        basedirs.config_dir(),
        basedirs.config_dir().join("icmplens"),
    ] {
        if let Some(file) = read_files(dir)? {
            return Ok(Some(file));
        }
    }
    Ok(None)
}

/// Read the config from the given path.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ConfigFile> {
    let data = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("config file not found: {}", path.as_ref().display()))?;
    toml::from_str(&data)
        .with_context(|| format!("invalid config file: {}", path.as_ref().display()))
}

fn read_files<P: AsRef<Path>>(dir: P) -> anyhow::Result<Option<ConfigFile>> {
    if let Some(file) = read_file(dir.as_ref(), DEFAULT_CONFIG_FILE)? {
        Ok(Some(file))
    } else if let Some(file) = read_file(dir.as_ref(), DEFAULT_HIDDEN_CONFIG_FILE)? {
        Ok(Some(file))
    } else {
        Ok(None)
    }
}

fn read_file<P: AsRef<Path>>(dir: P, file: &str) -> anyhow::Result<Option<ConfigFile>> {
    let path = dir.as_ref().join(file);
    if path.exists() {
        tracing::debug!(path = %path.display(), "reading config file");
        Ok(Some(read_config_file(path)?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub dissect: Option<ConfigDissect>,
    pub log: Option<ConfigLog>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dissect: Some(ConfigDissect::default()),
            log: Some(ConfigLog::default()),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigDissect {
    pub verbose: Option<u8>,
    pub numeric: Option<bool>,
    pub snaplen: Option<usize>,
    pub input_format: Option<InputFormat>,
    pub fragmented: Option<bool>,
    pub extension_checksum_probe: Option<bool>,
}

impl Default for ConfigDissect {
    fn default() -> Self {
        Self {
            verbose: Some(constants::DEFAULT_VERBOSE),
            numeric: Some(constants::DEFAULT_NUMERIC),
            snaplen: Some(constants::DEFAULT_SNAPLEN),
            input_format: Some(constants::DEFAULT_INPUT_FORMAT),
            fragmented: Some(constants::DEFAULT_FRAGMENTED),
            extension_checksum_probe: Some(constants::DEFAULT_EXTENSION_CHECKSUM_PROBE),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigLog {
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
    pub log_span_events: Option<LogSpanEvents>,
}

impl Default for ConfigLog {
    fn default() -> Self {
        Self {
            log_format: Some(constants::DEFAULT_LOG_FORMAT),
            log_filter: Some(String::from(constants::DEFAULT_LOG_FILTER)),
            log_span_events: Some(constants::DEFAULT_LOG_SPAN_EVENTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sample() {
        let cfg_file: ConfigFile =
            toml::from_str(include_str!("../../icmplens-config-sample.toml")).unwrap();
        pretty_assertions::assert_eq!(ConfigFile::default(), cfg_file);
    }

    #[test]
    fn test_read_partial() {
        let cfg_file: ConfigFile = toml::from_str("[dissect]\nverbose = 2\n").unwrap();
        assert_eq!(Some(2), cfg_file.dissect.unwrap().verbose);
        assert_eq!(None, cfg_file.log);
    }

    #[test]
    fn test_unknown_field() {
        assert!(toml::from_str::<ConfigFile>("[dissect]\nsnap-length = 64\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_config_file("does-not-exist.toml").unwrap_err();
        assert_eq!("config file not found: does-not-exist.toml", err.to_string());
    }
}
