//! Configuration snapshots
//!
//! A [`Configuration`] owns one [`LoggerTable`] plus engine rendering state
//! (appenders and properties) that the composer carries around without
//! interpreting. Documents are deserialized with serde; the JSON form is:
//!
//! ```json
//! {
//!   "name": "service",
//!   "properties": { "pattern": "%d %p %m" },
//!   "appenders": { "console": { "kind": "console", "target": "stdout" } },
//!   "loggers": {
//!     "root": { "level": "info", "appenders": ["console"] },
//!     "com.app.db": { "level": "debug", "additive": false }
//!   }
//! }
//! ```

use super::error::{ComposerError, Result};
use super::hierarchy::{LoggerConfig, LoggerTable};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location prefix for configurations packaged with the crate
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Packaged console-only configuration
pub const DEFAULT_CONSOLE_LOCATION: &str = "builtin:logging-default";

/// Packaged configuration writing to the log file
pub const DEFAULT_FILE_LOCATION: &str = "builtin:logging-file";

/// Property naming the log file, set from [`crate::LogFile`]
pub const LOG_FILE_PROPERTY: &str = "LOG_FILE";

/// Property naming the log directory, set from [`crate::LogFile`]
pub const LOG_PATH_PROPERTY: &str = "LOG_PATH";

/// Opaque appender definition: a kind plus free-form options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppenderSpec {
    pub kind: String,
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl AppenderSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    pub(super) name: String,
    // recorded by loading, never part of a document
    #[serde(skip)]
    pub(super) sources: Vec<String>,
    pub(super) properties: BTreeMap<String, String>,
    pub(super) appenders: BTreeMap<String, AppenderSpec>,
    pub(super) loggers: LoggerTable,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigurationDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    appenders: BTreeMap<String, AppenderSpec>,
    #[serde(default)]
    loggers: BTreeMap<String, LoggerConfig>,
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Deserialize a JSON document read from `location`
    pub fn from_json_str(location: &str, json: &str) -> Result<Self> {
        let document: ConfigurationDocument = serde_json::from_str(json)?;
        Self::from_document(location, document)
    }

    fn from_document(location: &str, document: ConfigurationDocument) -> Result<Self> {
        let mut loggers = LoggerTable::new();
        for (name, config) in document.loggers {
            let key = if name.eq_ignore_ascii_case("root") { "" } else { name.as_str() };
            if loggers.insert(key, config).is_some() {
                return Err(ComposerError::config(
                    location,
                    format!("logger '{}' is declared more than once", name),
                ));
            }
        }

        Ok(Self {
            name: document.name.unwrap_or_else(|| location.to_string()),
            sources: vec![location.to_string()],
            properties: document.properties,
            appenders: document.appenders,
            loggers,
        })
    }

    /// Packaged configuration for `location`, if it names one
    pub fn builtin(location: &str) -> Option<Self> {
        let configuration = match location {
            DEFAULT_CONSOLE_LOCATION => Self::new("default")
                .with_appender("console", AppenderSpec::new("console"))
                .with_logger("", LoggerConfig::new(Some(LogLevel::Info)).with_appender_ref("console")),
            DEFAULT_FILE_LOCATION => Self::new("default-file")
                .with_appender("console", AppenderSpec::new("console"))
                .with_appender(
                    "file",
                    AppenderSpec::new("file").with_option("path", format!("${{{}}}", LOG_FILE_PROPERTY)),
                )
                .with_logger(
                    "",
                    LoggerConfig::new(Some(LogLevel::Info))
                        .with_appender_ref("console")
                        .with_appender_ref("file"),
                ),
            _ => return None,
        };
        Some(configuration.located_at(location))
    }

    /// Record `location` as the single source of this configuration
    #[must_use]
    pub fn located_at(mut self, location: impl Into<String>) -> Self {
        self.sources = vec![location.into()];
        self
    }

    #[must_use]
    pub fn with_logger(mut self, name: impl AsRef<str>, config: LoggerConfig) -> Self {
        self.loggers.insert(name, config);
        self
    }

    /// Declare a loaded logger carrying only a level
    #[must_use]
    pub fn with_level(self, name: impl AsRef<str>, level: LogLevel) -> Self {
        self.with_logger(name, LoggerConfig::new(Some(level)))
    }

    #[must_use]
    pub fn with_root_level(self, level: LogLevel) -> Self {
        self.with_level("", level)
    }

    #[must_use]
    pub fn with_appender(mut self, name: impl Into<String>, appender: AppenderSpec) -> Self {
        self.appenders.insert(name.into(), appender);
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locations this configuration was built from, in precedence order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Whether more than one source contributed
    pub fn is_composite(&self) -> bool {
        self.sources.len() > 1
    }

    pub fn loggers(&self) -> &LoggerTable {
        &self.loggers
    }

    pub fn loggers_mut(&mut self) -> &mut LoggerTable {
        &mut self.loggers
    }

    pub fn appenders(&self) -> &BTreeMap<String, AppenderSpec> {
        &self.appenders
    }

    pub fn appender(&self, name: &str) -> Option<&AppenderSpec> {
        self.appenders.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Effective level for `name` under this configuration
    pub fn effective_level(&self, name: &str) -> LogLevel {
        self.loggers.resolve_effective_level(name)
    }
}
