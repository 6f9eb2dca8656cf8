//! Translation between framework levels and a native engine's levels

use super::log_level::LogLevel;
use std::collections::BTreeSet;
use tracing::level_filters::LevelFilter;

/// Ordered mapping between [`LogLevel`] and a native level type `N`.
///
/// Several framework levels may share one native level. The first mapping
/// registered for a framework level decides the system-to-native direction and
/// the first mapping registered for a native level decides the way back.
#[derive(Debug, Clone)]
pub struct LevelMap<N> {
    mappings: Vec<(LogLevel, N)>,
}

impl<N: Copy + PartialEq> LevelMap<N> {
    pub fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Register a mapping
    #[must_use = "builder methods return a new value"]
    pub fn map(mut self, system: LogLevel, native: N) -> Self {
        self.mappings.push((system, native));
        self
    }

    pub fn to_native(&self, level: LogLevel) -> Option<N> {
        self.mappings
            .iter()
            .find(|(system, _)| *system == level)
            .map(|(_, native)| *native)
    }

    pub fn to_system(&self, native: N) -> Option<LogLevel> {
        self.mappings
            .iter()
            .find(|(_, candidate)| *candidate == native)
            .map(|(system, _)| *system)
    }

    /// Framework levels that have a native counterpart
    pub fn supported(&self) -> BTreeSet<LogLevel> {
        self.mappings.iter().map(|(system, _)| *system).collect()
    }
}

impl<N: Copy + PartialEq> Default for LevelMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping onto `tracing` level filters.
///
/// `tracing` has no FATAL, so FATAL is written as ERROR and ERROR reads back as ERROR.
pub fn tracing_levels() -> LevelMap<LevelFilter> {
    LevelMap::new()
        .map(LogLevel::Trace, LevelFilter::TRACE)
        .map(LogLevel::Debug, LevelFilter::DEBUG)
        .map(LogLevel::Info, LevelFilter::INFO)
        .map(LogLevel::Warn, LevelFilter::WARN)
        .map(LogLevel::Error, LevelFilter::ERROR)
        .map(LogLevel::Fatal, LevelFilter::ERROR)
        .map(LogLevel::Off, LevelFilter::OFF)
}
