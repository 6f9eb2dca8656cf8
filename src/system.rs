//! Logging system adapter
//!
//! Sequences configuration loading for a [`LoggingContext`]: finds the
//! configuration among conventional locations, layers the overrides bound from
//! the environment, activates the composite, and exposes level administration.

use crate::core::configuration::{
    BUILTIN_PREFIX, DEFAULT_CONSOLE_LOCATION, DEFAULT_FILE_LOCATION, LOG_FILE_PROPERTY,
    LOG_PATH_PROPERTY,
};
use crate::core::level_map::{tracing_levels, LevelMap};
use crate::core::{
    compose, ComposerError, Configuration, LevelChange, LogLevel, LoggerConfiguration,
    LoggerHandle, LoggingContext, Result,
};
use crate::environment::{EnvironmentBinder, OVERRIDE_PROPERTY};
use crate::resolvers::{
    framework_variant, standard_locations, ConfigurationResolver, FileResolver,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;

/// File name used when only a log directory is given
pub const DEFAULT_LOG_FILE_NAME: &str = "application.log";

/// Log file destination: an explicit file, a directory, or both
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    file: Option<String>,
    path: Option<String>,
}

impl LogFile {
    /// `None` when neither a file nor a directory is given
    pub fn new(file: Option<&str>, path: Option<&str>) -> Option<Self> {
        let file = file.filter(|f| !f.is_empty()).map(str::to_string);
        let path = path.filter(|p| !p.is_empty()).map(str::to_string);
        if file.is_none() && path.is_none() {
            return None;
        }
        Some(Self { file, path })
    }

    /// The file records would be written to
    pub fn resolved(&self) -> String {
        match (&self.file, &self.path) {
            (Some(file), _) => file.clone(),
            (None, Some(path)) => format!("{}/{}", path.trim_end_matches('/'), DEFAULT_LOG_FILE_NAME),
            (None, None) => DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }

    /// Publish `LOG_FILE` (and `LOG_PATH` when set) into `configuration`
    pub fn apply_to(&self, configuration: &mut Configuration) {
        configuration.set_property(LOG_FILE_PROPERTY, self.resolved());
        if let Some(path) = &self.path {
            configuration.set_property(LOG_PATH_PROPERTY, path.clone());
        }
    }
}

/// What the caller's environment contributes to initialization
#[derive(Clone)]
pub struct InitializationContext {
    binder: Arc<dyn EnvironmentBinder>,
}

impl InitializationContext {
    pub fn new(binder: impl EnvironmentBinder + 'static) -> Self {
        Self {
            binder: Arc::new(binder),
        }
    }

    pub fn binder(&self) -> &dyn EnvironmentBinder {
        self.binder.as_ref()
    }

    /// Ordered override locations; empty when the property is absent
    pub fn overrides(&self) -> Vec<String> {
        self.binder.bind_list(OVERRIDE_PROPERTY).unwrap_or_default()
    }
}

/// Result of a load that activated a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Locations that contributed, base first
    pub applied: Vec<String>,
    /// Override locations that did not exist
    pub skipped: Vec<String>,
}

pub struct LoggingSystem {
    context: LoggingContext,
    resolver: Arc<dyn ConfigurationResolver>,
    levels: LevelMap<LevelFilter>,
    configuration_file: Option<String>,
}

impl LoggingSystem {
    /// Create a builder for LoggingSystem
    ///
    /// # Example
    /// ```
    /// use log_composer::prelude::*;
    ///
    /// let resolver = MemoryResolver::new();
    /// resolver.insert("logging.json", Configuration::new("app").with_root_level(LogLevel::Warn));
    ///
    /// let system = LoggingSystem::builder().resolver(resolver).build();
    /// let init = InitializationContext::new(MapEnvironment::new());
    /// system.initialize(&init, None, None).unwrap();
    ///
    /// assert_eq!(system.context().effective_level("com.app"), LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn builder() -> LoggingSystemBuilder {
        LoggingSystemBuilder::new()
    }

    pub fn context(&self) -> &LoggingContext {
        &self.context
    }

    /// Obtain a logger from the underlying context
    pub fn logger(&self, name: &str) -> LoggerHandle {
        self.context.logger(name)
    }

    /// Conventional locations probed during self-initialization
    pub fn standard_config_locations(&self) -> Vec<String> {
        standard_locations(
            self.resolver.capabilities(),
            self.configuration_file.as_deref(),
        )
    }

    /// Silence output until [`initialize`](Self::initialize) runs
    pub fn before_initialize(&self) {
        if self.context.is_initialized() {
            return;
        }
        self.context.set_output_suppressed(true);
    }

    /// Load and activate the configuration, once.
    ///
    /// With an explicit `config_location` that location is the base. Otherwise
    /// the first existing conventional location is used, then its framework
    /// variant, and finally the packaged defaults. Overrides bound from the
    /// environment are layered on top in every case. A second call on an
    /// initialized context does nothing.
    pub fn initialize(
        &self,
        init: &InitializationContext,
        config_location: Option<&str>,
        log_file: Option<&LogFile>,
    ) -> Result<()> {
        let ran = self.context.initialize_once(|| {
            self.context.set_output_suppressed(false);
            let location = config_location
                .map(str::trim)
                .filter(|location| !location.is_empty())
                .map(str::to_string)
                .or_else(|| self.self_initialization_config())
                .or_else(|| self.framework_initialization_config());

            let outcome = match location {
                Some(location) => self.load_configuration(init, &location, log_file)?,
                None => self.load_defaults(init, log_file)?,
            };
            tracing::debug!(
                applied = ?outcome.applied,
                skipped = ?outcome.skipped,
                "logging initialized"
            );
            Ok(())
        })?;

        if !ran {
            tracing::debug!("logging context already initialized, ignoring");
        }
        Ok(())
    }

    fn self_initialization_config(&self) -> Option<String> {
        self.standard_config_locations()
            .into_iter()
            .find(|location| self.resolver.exists(location))
    }

    fn framework_initialization_config(&self) -> Option<String> {
        self.standard_config_locations()
            .iter()
            .map(|location| framework_variant(location))
            .find(|location| self.resolver.exists(location))
    }

    /// Activate the packaged defaults plus overrides
    pub fn load_defaults(
        &self,
        init: &InitializationContext,
        log_file: Option<&LogFile>,
    ) -> Result<LoadOutcome> {
        let location = if log_file.is_some() {
            DEFAULT_FILE_LOCATION
        } else {
            DEFAULT_CONSOLE_LOCATION
        };
        self.load_configuration_with_overrides(location, log_file, &init.overrides())
    }

    /// Activate `location` plus the overrides bound from `init`
    pub fn load_configuration(
        &self,
        init: &InitializationContext,
        location: &str,
        log_file: Option<&LogFile>,
    ) -> Result<LoadOutcome> {
        self.load_configuration_with_overrides(location, log_file, &init.overrides())
    }

    /// Compose `location` with `overrides` and activate the result.
    ///
    /// Fails with `ConfigNotFound` when the base does not exist; overrides that
    /// do not exist are skipped. Resolver errors abort the load. Nothing is
    /// activated unless every step succeeds.
    pub fn load_configuration_with_overrides(
        &self,
        location: &str,
        log_file: Option<&LogFile>,
        overrides: &[String],
    ) -> Result<LoadOutcome> {
        self.compose_and_activate(location, overrides, |composed| {
            if let Some(log_file) = log_file {
                log_file.apply_to(composed);
            }
        })
    }

    /// Resolve, compose and finish the configuration in memory, then swap it in once
    fn compose_and_activate(
        &self,
        location: &str,
        overrides: &[String],
        finish: impl FnOnce(&mut Configuration),
    ) -> Result<LoadOutcome> {
        let base = self
            .load(location)?
            .ok_or_else(|| ComposerError::config_not_found(location))?;

        let mut outcome = LoadOutcome::default();
        let mut layers = Vec::with_capacity(overrides.len());
        for override_location in overrides {
            match self.load(override_location)? {
                Some(configuration) => layers.push(configuration),
                None => {
                    tracing::info!(location = %override_location, "override configuration not found, skipping");
                    outcome.skipped.push(override_location.clone());
                }
            }
        }

        let mut composed = compose(base, layers);
        finish(&mut composed);
        outcome.applied = composed.sources().to_vec();
        self.context.activate(composed)?;
        Ok(outcome)
    }

    /// Reload after the environment changed.
    ///
    /// With overrides bound, they are layered over the active configuration;
    /// without, the active configuration is rebuilt from its own sources.
    pub fn reinitialize(&self, init: &InitializationContext) -> Result<LoadOutcome> {
        let overrides = init.overrides();
        if overrides.is_empty() {
            self.reconfigure()
        } else {
            self.reinitialize_with_overrides(&overrides)
        }
    }

    fn reinitialize_with_overrides(&self, overrides: &[String]) -> Result<LoadOutcome> {
        let base = Configuration::clone(&self.context.active_configuration());

        let mut outcome = LoadOutcome::default();
        let mut layers = Vec::with_capacity(overrides.len());
        for override_location in overrides {
            match self.load(override_location) {
                Ok(Some(configuration)) => layers.push(configuration),
                Ok(None) => {
                    tracing::info!(location = %override_location, "override configuration not found, skipping");
                    outcome.skipped.push(override_location.clone());
                }
                Err(err) => return Err(ComposerError::override_load(override_location.as_str(), err)),
            }
        }

        let composed = compose(base, layers);
        outcome.applied = composed.sources().to_vec();
        self.context.activate(composed)?;
        Ok(outcome)
    }

    /// Rebuild the active configuration from its recorded sources
    pub fn reconfigure(&self) -> Result<LoadOutcome> {
        let active = self.context.active_configuration();
        let Some((base, overrides)) = active.sources().split_first() else {
            tracing::warn!("active configuration has no sources, refreshing loggers only");
            self.context.update_loggers();
            return Ok(LoadOutcome::default());
        };

        let carried: Vec<(&str, String)> = [LOG_FILE_PROPERTY, LOG_PATH_PROPERTY]
            .into_iter()
            .filter_map(|key| active.property(key).map(|value| (key, value.to_string())))
            .collect();
        self.compose_and_activate(base, overrides, |composed| {
            for (key, value) in carried {
                composed.set_property(key, value);
            }
        })
    }

    fn load(&self, location: &str) -> Result<Option<Configuration>> {
        if location.starts_with(BUILTIN_PREFIX) {
            return Ok(Configuration::builtin(location));
        }
        Ok(self
            .resolver
            .resolve(location)?
            .map(|configuration| configuration.located_at(location)))
    }

    /// Levels this system can apply
    pub fn supported_log_levels(&self) -> BTreeSet<LogLevel> {
        self.levels.supported()
    }

    /// Set (or with `None` clear) the level of `logger_name`.
    ///
    /// Fails with `ContextStopped` once the shutdown handler has run.
    pub fn set_log_level(&self, logger_name: &str, level: Option<LogLevel>) -> Result<LevelChange> {
        if let Some(level) = level {
            if self.levels.to_native(level).is_none() {
                return Err(ComposerError::invalid_level(level.to_str()));
            }
        }
        let change = self
            .context
            .configure(|configuration| configuration.loggers_mut().set_level(logger_name, level))?;
        tracing::debug!(logger = logger_name, ?change, "log level changed");
        Ok(change)
    }

    /// Like [`set_log_level`](Self::set_log_level), parsing the level token first.
    ///
    /// An unrecognized token is rejected before the table is touched.
    pub fn set_log_level_str(&self, logger_name: &str, level: Option<&str>) -> Result<LevelChange> {
        let level = level.map(str::parse::<LogLevel>).transpose()?;
        self.set_log_level(logger_name, level)
    }

    /// Set a level expressed in the native engine's terms
    pub fn set_native_log_level(&self, logger_name: &str, level: LevelFilter) -> Result<LevelChange> {
        let level = self
            .levels
            .to_system(level)
            .ok_or_else(|| ComposerError::invalid_level(level.to_string()))?;
        self.set_log_level(logger_name, Some(level))
    }

    /// Most verbose effective level across every known logger, in native terms
    pub fn max_level_hint(&self) -> LevelFilter {
        self.logger_configurations()
            .iter()
            .map(LoggerConfiguration::effective_level)
            .min()
            .and_then(|level| self.levels.to_native(level))
            .unwrap_or(LevelFilter::OFF)
    }

    /// Every known logger, root first
    pub fn logger_configurations(&self) -> Vec<LoggerConfiguration> {
        let active = self.context.active_configuration();
        active
            .loggers()
            .list_all_known_loggers(self.context.live_logger_names())
    }

    pub fn logger_configuration(&self, logger_name: &str) -> Option<LoggerConfiguration> {
        let active = self.context.active_configuration();
        active
            .loggers()
            .logger_configuration(logger_name, self.context.live_logger_names())
    }

    /// Closure that stops the context, for registration as a shutdown hook
    pub fn shutdown_handler(&self) -> impl FnOnce() + Send + 'static {
        let context = self.context.clone();
        move || context.stop()
    }

    /// Forget initialization so the system can be initialized again
    pub fn clean_up(&self) {
        self.context.mark_uninitialized();
        self.context.set_output_suppressed(false);
    }
}

/// Builder for constructing LoggingSystem with a fluent API
///
/// # Example
/// ```
/// use log_composer::prelude::*;
///
/// let system = LoggingSystem::builder()
///     .resolver(FileResolver::with_base_dir("config"))
///     .configuration_file("config/custom-logging.json")
///     .build();
///
/// assert_eq!(
///     system.standard_config_locations().last().map(String::as_str),
///     Some("config/custom-logging.json")
/// );
/// ```
pub struct LoggingSystemBuilder {
    context: Option<LoggingContext>,
    resolver: Option<Arc<dyn ConfigurationResolver>>,
    configuration_file: Option<String>,
}

impl LoggingSystemBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            context: None,
            resolver: None,
            configuration_file: None,
        }
    }

    /// Use an existing context instead of a fresh one
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: LoggingContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the configuration source resolver
    ///
    /// Defaults to a [`FileResolver`] rooted at the working directory.
    #[must_use = "builder methods return a new value"]
    pub fn resolver<R: ConfigurationResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Share a resolver that the caller keeps a handle to
    #[must_use = "builder methods return a new value"]
    pub fn shared_resolver(mut self, resolver: Arc<dyn ConfigurationResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Extra location probed after the conventional ones
    #[must_use = "builder methods return a new value"]
    pub fn configuration_file(mut self, location: impl Into<String>) -> Self {
        self.configuration_file = Some(location.into());
        self
    }

    /// Build the LoggingSystem
    pub fn build(self) -> LoggingSystem {
        LoggingSystem {
            context: self.context.unwrap_or_default(),
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(FileResolver::new())),
            levels: tracing_levels(),
            configuration_file: self.configuration_file,
        }
    }
}

impl Default for LoggingSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
