//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logging: Logging,
    pub rip: Rip,
    // JSON file with the changes committed at startup.
    pub startup_config: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub file: LoggingFile,
    pub stdout: LoggingStdout,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFile {
    pub enabled: bool,
    pub dir: String,
    pub name: String,
    pub rotation: LoggingFileRotation,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingStdout {
    pub enabled: bool,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFmt {
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_thread_id: bool,
    pub show_source: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFileRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rip {
    // Local address the instance socket is bound to.
    pub address: String,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/ripd.toml";

    pub(crate) fn load(config_file: Option<&str>) -> Result<Config, String> {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => toml::from_str(&config_str).map_err(|error| {
                format!("failed to parse configuration file: {error}")
            }),
            Err(error) => {
                eprintln!("Failed to load configuration file: {error}");
                eprintln!("Falling back to default configuration...");
                Ok(Config::default())
            }
        }
    }
}

// ===== impl LoggingFile =====

impl Default for LoggingFile {
    fn default() -> LoggingFile {
        LoggingFile {
            enabled: false,
            dir: "/var/log".to_owned(),
            name: "ripd.log".to_owned(),
            rotation: Default::default(),
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingStdout =====

impl Default for LoggingStdout {
    fn default() -> LoggingStdout {
        LoggingStdout {
            enabled: true,
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingFmt =====

impl Default for LoggingFmt {
    fn default() -> LoggingFmt {
        LoggingFmt {
            style: LoggingFmtStyle::Full,
            colors: false,
            show_thread_id: false,
            show_source: false,
        }
    }
}

// ===== impl Rip =====

impl Default for Rip {
    fn default() -> Rip {
        Rip {
            address: "0.0.0.0:520".to_owned(),
        }
    }
}

// ===== unit tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file() {
        let config: Config = toml::from_str(
            r#"
            startup_config = "/etc/ripd.json"

            [logging.stdout]
            style = "json"

            [rip]
            address = "127.0.0.1:5520"
            "#,
        )
        .unwrap();
        assert_eq!(config.startup_config.as_deref(), Some("/etc/ripd.json"));
        assert!(config.logging.stdout.enabled);
        assert!(matches!(
            config.logging.stdout.fmt.style,
            LoggingFmtStyle::Json
        ));
        assert!(!config.logging.file.enabled);
        assert_eq!(config.rip.address, "127.0.0.1:5520");
    }

    #[test]
    fn unknown_field() {
        assert!(toml::from_str::<Config>("[rip]\nport = 520\n").is_err());
    }

    #[test]
    fn missing_file() {
        let config = Config::load(Some("/nonexistent/ripd.toml")).unwrap();
        assert_eq!(config.rip.address, "0.0.0.0:520");
        assert!(config.startup_config.is_none());
    }
}
