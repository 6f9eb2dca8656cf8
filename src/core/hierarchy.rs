//! Sparse logger table and hierarchical level resolution
//!
//! A [`LoggerTable`] only holds loggers that were configured by a source or
//! given a level at runtime. Every other logger inherits: its effective level
//! is the first concrete level found walking from its name up to root.

use super::log_level::LogLevel;
use super::logger_configuration::LoggerConfiguration;
use super::logger_name::{self, ancestors, display_name, normalize};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, Entry};
use std::collections::{BTreeMap, BTreeSet};

/// Level the engine applies when not even root carries a level
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Error;

/// Where a table entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryOrigin {
    /// Declared by a configuration source
    #[default]
    Loaded,
    /// Materialized only to hold a level set at runtime
    Synthetic,
}

/// Per-logger settings held in a [`LoggerTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default = "default_additive")]
    pub additive: bool,
    #[serde(default, rename = "appenders")]
    pub appender_refs: Vec<String>,
    #[serde(skip)]
    origin: EntryOrigin,
}

fn default_additive() -> bool {
    true
}

impl LoggerConfig {
    /// Entry as declared by a configuration source
    pub fn new(level: Option<LogLevel>) -> Self {
        Self {
            level,
            additive: true,
            appender_refs: Vec::new(),
            origin: EntryOrigin::Loaded,
        }
    }

    /// Entry created to carry a runtime level override
    pub fn synthetic(level: LogLevel) -> Self {
        Self {
            origin: EntryOrigin::Synthetic,
            ..Self::new(Some(level))
        }
    }

    #[must_use]
    pub fn with_additive(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }

    #[must_use]
    pub fn with_appender_ref(mut self, appender: impl Into<String>) -> Self {
        self.appender_refs.push(appender.into());
        self
    }

    pub fn origin(&self) -> EntryOrigin {
        self.origin
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == EntryOrigin::Synthetic
    }
}

/// Outcome of [`LoggerTable::set_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// Nothing to clear
    Unchanged,
    /// A synthetic entry was materialized
    Created { level: LogLevel },
    /// An existing entry got a new level
    Updated {
        previous: Option<LogLevel>,
        level: LogLevel,
    },
    /// A loaded entry now inherits
    Cleared { previous: Option<LogLevel> },
    /// A synthetic entry was dropped
    Removed { previous: Option<LogLevel> },
}

impl LevelChange {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, LevelChange::Unchanged)
    }
}

/// Sparse map of normalized logger name to [`LoggerConfig`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerTable {
    entries: BTreeMap<String, LoggerConfig>,
}

impl LoggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `name`
    pub fn insert(&mut self, name: impl AsRef<str>, config: LoggerConfig) -> Option<LoggerConfig> {
        self.entries
            .insert(normalize(name.as_ref()).to_string(), config)
    }

    pub fn get(&self, name: &str) -> Option<&LoggerConfig> {
        self.entries.get(normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(normalize(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<LoggerConfig> {
        self.entries.remove(normalize(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoggerConfig)> {
        self.entries.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Nearest entry governing `name`: the entry for `name` itself or its
    /// closest configured ancestor, together with that entry's name.
    pub fn find(&self, name: &str) -> Option<(&str, &LoggerConfig)> {
        ancestors(name).find_map(|candidate| {
            self.entries
                .get_key_value(candidate)
                .map(|(owner, config)| (owner.as_str(), config))
        })
    }

    /// Level that applies to records logged under `name`.
    ///
    /// Walks from `name` toward root and returns the first concrete level; if
    /// none is found the engine default [`DEFAULT_ROOT_LEVEL`] applies.
    pub fn resolve_effective_level(&self, name: &str) -> LogLevel {
        ancestors(name)
            .find_map(|candidate| self.entries.get(candidate).and_then(|config| config.level))
            .unwrap_or(DEFAULT_ROOT_LEVEL)
    }

    /// Set or clear the level configured for exactly `name`.
    ///
    /// Clearing removes synthetic entries outright but only unsets the level
    /// of loaded ones, which may carry other attributes.
    pub fn set_level(&mut self, name: &str, level: Option<LogLevel>) -> LevelChange {
        let entry = self.entries.entry(normalize(name).to_string());
        match (level, entry) {
            (None, Entry::Vacant(_)) => LevelChange::Unchanged,
            (None, Entry::Occupied(occupied)) if occupied.get().is_synthetic() => {
                let (_, removed) = occupied.remove_entry();
                LevelChange::Removed {
                    previous: removed.level,
                }
            }
            (None, Entry::Occupied(mut occupied)) => {
                let previous = occupied.get_mut().level.take();
                LevelChange::Cleared { previous }
            }
            (Some(level), Entry::Vacant(vacant)) => {
                vacant.insert(LoggerConfig::synthetic(level));
                LevelChange::Created { level }
            }
            (Some(level), Entry::Occupied(mut occupied)) => {
                let previous = occupied.get_mut().level.replace(level);
                LevelChange::Updated { previous, level }
            }
        }
    }

    /// Every logger worth reporting: live names and table names plus all of
    /// their ancestors, root first and the rest in lexical order.
    pub fn list_all_known_loggers<I>(&self, live_names: I) -> Vec<LoggerConfiguration>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut known = BTreeSet::from([String::new()]);
        for name in live_names {
            add_with_ancestors(&mut known, name.as_ref());
        }
        for name in self.entries.keys() {
            add_with_ancestors(&mut known, name);
        }

        // root is always reported and its empty name sorts first
        known.iter().map(|name| self.describe(name)).collect()
    }

    /// Report row for a single known logger
    pub fn logger_configuration<I>(&self, name: &str, live_names: I) -> Option<LoggerConfiguration>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let name = normalize(name);
        let known = logger_name::is_root(name)
            || self.contains(name)
            || self
                .entries
                .keys()
                .any(|configured| is_ancestor_or_self(name, configured))
            || live_names
                .into_iter()
                .any(|live| is_ancestor_or_self(name, normalize(live.as_ref())));
        known.then(|| self.describe(name))
    }

    fn describe(&self, name: &str) -> LoggerConfiguration {
        let configured = self.entries.get(name).and_then(|config| config.level);
        LoggerConfiguration::new(
            display_name(name),
            configured,
            self.resolve_effective_level(name),
        )
    }
}

fn add_with_ancestors(known: &mut BTreeSet<String>, name: &str) {
    for candidate in ancestors(name) {
        // a known name already brought all of its ancestors along
        if !known.insert(candidate.to_string()) {
            break;
        }
    }
}

fn is_ancestor_or_self(candidate: &str, name: &str) -> bool {
    ancestors(name).any(|ancestor| ancestor == candidate)
}

impl Extend<(String, LoggerConfig)> for LoggerTable {
    /// Later entries replace earlier ones with the same name
    fn extend<T: IntoIterator<Item = (String, LoggerConfig)>>(&mut self, iter: T) {
        for (name, config) in iter {
            self.insert(name, config);
        }
    }
}

impl FromIterator<(String, LoggerConfig)> for LoggerTable {
    fn from_iter<T: IntoIterator<Item = (String, LoggerConfig)>>(iter: T) -> Self {
        let mut table = LoggerTable::new();
        table.extend(iter);
        table
    }
}

impl IntoIterator for LoggerTable {
    type Item = (String, LoggerConfig);
    type IntoIter = btree_map::IntoIter<String, LoggerConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for LoggerTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(name, config)| (logger_name::display_name(name), config)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, Option<LogLevel>)]) -> LoggerTable {
        entries
            .iter()
            .map(|(name, level)| (name.to_string(), LoggerConfig::new(*level)))
            .collect()
    }

    #[test]
    fn test_inherits_from_nearest_concrete_ancestor() {
        let table = table(&[
            ("", Some(LogLevel::Info)),
            ("a", Some(LogLevel::Warn)),
            ("a.b", None),
        ]);

        assert_eq!(table.resolve_effective_level("a.b.c"), LogLevel::Warn);
        assert_eq!(table.resolve_effective_level("a.b"), LogLevel::Warn);
        assert_eq!(table.resolve_effective_level("x.y"), LogLevel::Info);
        assert_eq!(table.resolve_effective_level("ROOT"), LogLevel::Info);
    }

    #[test]
    fn test_nested_names_resolve_through_outer_name() {
        let table = table(&[("", Some(LogLevel::Info)), ("svc.Outer", Some(LogLevel::Trace))]);
        assert_eq!(table.resolve_effective_level("svc.Outer$Inner"), LogLevel::Trace);
    }

    #[test]
    fn test_empty_table_uses_engine_default() {
        let table = LoggerTable::new();
        assert_eq!(table.resolve_effective_level(""), DEFAULT_ROOT_LEVEL);
        assert_eq!(table.resolve_effective_level("deep.name"), DEFAULT_ROOT_LEVEL);
    }

    #[test]
    fn test_find_reports_owning_entry() {
        let table = table(&[("", Some(LogLevel::Info)), ("a", None)]);

        let (owner, config) = table.find("a.b.c").unwrap();
        assert_eq!(owner, "a");
        assert_eq!(config.level, None);

        let (owner, _) = table.find("z").unwrap();
        assert_eq!(owner, "");
    }

    #[test]
    fn test_set_level_materializes_synthetic_entry() {
        let mut table = table(&[("", Some(LogLevel::Info))]);

        let change = table.set_level("x.y", Some(LogLevel::Debug));
        assert_eq!(change, LevelChange::Created { level: LogLevel::Debug });

        let entry = table.get("x.y").unwrap();
        assert!(entry.is_synthetic());
        assert!(entry.additive);
        assert_eq!(table.resolve_effective_level("x.y"), LogLevel::Debug);
        assert_eq!(table.resolve_effective_level("x.y.z"), LogLevel::Debug);
        assert_eq!(table.resolve_effective_level("x"), LogLevel::Info);
    }

    #[test]
    fn test_clearing_synthetic_entry_removes_it() {
        let mut table = LoggerTable::new();
        table.set_level("svc", Some(LogLevel::Warn));

        let change = table.set_level("svc", None);
        assert_eq!(
            change,
            LevelChange::Removed {
                previous: Some(LogLevel::Warn)
            }
        );
        assert!(!table.contains("svc"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_clearing_loaded_entry_keeps_it() {
        let mut table = LoggerTable::new();
        table.insert(
            "db",
            LoggerConfig::new(Some(LogLevel::Debug)).with_additive(false),
        );

        let change = table.set_level("db", None);
        assert_eq!(
            change,
            LevelChange::Cleared {
                previous: Some(LogLevel::Debug)
            }
        );
        let entry = table.get("db").unwrap();
        assert_eq!(entry.level, None);
        assert!(!entry.additive);
        assert_eq!(entry.origin(), EntryOrigin::Loaded);
    }

    #[test]
    fn test_updating_keeps_origin() {
        let mut table = table(&[("db", Some(LogLevel::Debug))]);
        table.set_level("db", Some(LogLevel::Error));
        assert_eq!(table.get("db").unwrap().origin(), EntryOrigin::Loaded);

        table.set_level("svc", Some(LogLevel::Info));
        let change = table.set_level("svc", Some(LogLevel::Trace));
        assert_eq!(
            change,
            LevelChange::Updated {
                previous: Some(LogLevel::Info),
                level: LogLevel::Trace
            }
        );
        assert!(table.get("svc").unwrap().is_synthetic());
    }

    #[test]
    fn test_clearing_missing_entry_is_noop() {
        let mut table = LoggerTable::new();
        assert_eq!(table.set_level("nothing", None), LevelChange::Unchanged);
        assert!(!LevelChange::Unchanged.is_mutation());
        assert!(table.is_empty());
    }

    #[test]
    fn test_root_aliases_share_one_entry() {
        let mut table = LoggerTable::new();
        table.set_level("ROOT", Some(LogLevel::Warn));
        assert!(table.contains(""));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_listing_includes_ancestors_root_first() {
        let table = table(&[("", Some(LogLevel::Info)), ("a.b.c", Some(LogLevel::Debug))]);
        let rows = table.list_all_known_loggers(["z.live"]);

        let names: Vec<&str> = rows.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["ROOT", "a", "a.b", "a.b.c", "z", "z.live"]);

        assert_eq!(rows[0].configured_level(), Some(LogLevel::Info));
        assert_eq!(rows[1].configured_level(), None);
        assert_eq!(rows[1].effective_level(), LogLevel::Info);
        assert_eq!(rows[3].configured_level(), Some(LogLevel::Debug));
        assert_eq!(rows[3].effective_level(), LogLevel::Debug);
    }

    #[test]
    fn test_listing_after_removal_reports_only_root() {
        let mut table = LoggerTable::new();
        table.set_level("svc", Some(LogLevel::Warn));
        table.set_level("svc", None);

        let rows = table.list_all_known_loggers(Vec::<String>::new());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_root());
        assert_eq!(rows[0].effective_level(), DEFAULT_ROOT_LEVEL);
    }

    #[test]
    fn test_single_logger_configuration() {
        let table = table(&[("", Some(LogLevel::Info)), ("a.b", Some(LogLevel::Debug))]);

        let row = table.logger_configuration("a", ["x"]).unwrap();
        assert_eq!(row.configured_level(), None);
        assert_eq!(row.effective_level(), LogLevel::Info);

        let row = table.logger_configuration("ROOT", ["x"]).unwrap();
        assert!(row.is_root());

        assert!(table.logger_configuration("x", ["x"]).is_some());
        assert!(table.logger_configuration("unknown", ["x"]).is_none());
    }
}
