//! Layering override configurations over a base configuration
//!
//! Composition is a right-biased union: for every logger, appender and property
//! name the entry from the later configuration replaces the earlier one, and
//! names present in a single constituent are carried through untouched. Being
//! a plain union it is associative, so `compose([A, B, C])` and
//! `compose([compose([A, B]), C])` produce the same configuration.

use super::configuration::Configuration;

impl Configuration {
    /// Layer `other` on top of `self`, `other` winning every name clash.
    ///
    /// The result keeps the base's name and lists the sources of both sides.
    #[must_use]
    pub fn overlay(mut self, other: Configuration) -> Configuration {
        self.sources.extend(other.sources);
        self.properties.extend(other.properties);
        self.appenders.extend(other.appenders);
        self.loggers.extend(other.loggers);
        self
    }
}

/// Compose `base` with `overrides` in order.
///
/// Without overrides the base comes back unchanged; otherwise the result is a
/// composite whose sources are the base's followed by each override's.
///
/// # Example
///
/// ```
/// use log_composer::prelude::*;
///
/// let base = Configuration::new("base").with_root_level(LogLevel::Info);
/// let overlay = Configuration::new("dev")
///     .located_at("dev.json")
///     .with_level("a.b", LogLevel::Debug);
///
/// let composed = compose(base, [overlay]);
/// assert_eq!(composed.effective_level("a.b.c"), LogLevel::Debug);
/// assert_eq!(composed.effective_level("a.x"), LogLevel::Info);
/// ```
pub fn compose<I>(base: Configuration, overrides: I) -> Configuration
where
    I: IntoIterator<Item = Configuration>,
{
    overrides.into_iter().fold(base, Configuration::overlay)
}
