//! Administrative view of a single logger

use super::log_level::LogLevel;
use super::logger_name::ROOT_LOGGER_NAME;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the logger listing: display name, the level configured on this
/// exact name (if any) and the level that actually applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerConfiguration {
    name: String,
    configured_level: Option<LogLevel>,
    effective_level: LogLevel,
}

impl LoggerConfiguration {
    pub fn new(
        name: impl Into<String>,
        configured_level: Option<LogLevel>,
        effective_level: LogLevel,
    ) -> Self {
        Self {
            name: name.into(),
            configured_level,
            effective_level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configured_level(&self) -> Option<LogLevel> {
        self.configured_level
    }

    pub fn effective_level(&self) -> LogLevel {
        self.effective_level
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_LOGGER_NAME
    }
}

impl PartialOrd for LoggerConfiguration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Root sorts first, the rest by name
impl Ord for LoggerConfiguration {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_root(), other.is_root()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.name.cmp(&other.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_sorts_before_uppercase_names() {
        let mut rows = vec![
            LoggerConfiguration::new("Alpha", None, LogLevel::Info),
            LoggerConfiguration::new("ROOT", Some(LogLevel::Info), LogLevel::Info),
            LoggerConfiguration::new("AAA", None, LogLevel::Info),
        ];
        rows.sort();

        let names: Vec<&str> = rows.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["ROOT", "AAA", "Alpha"]);
    }

    #[test]
    fn test_serializes_levels_as_tokens() {
        let row = LoggerConfiguration::new("svc", None, LogLevel::Warn);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "svc");
        assert!(json["configured_level"].is_null());
        assert_eq!(json["effective_level"], "WARN");
    }
}
