//! # Log Composer
//!
//! A logging-system adapter that binds an application's generic logging
//! settings to a logging engine's configuration model.
//!
//! ## Features
//!
//! - **Layered Configuration**: A base configuration plus ordered overrides,
//!   later overrides winning per logger, appender and property
//! - **Hierarchical Levels**: Effective levels inherited along dotted and
//!   `$`-nested logger names, with runtime overrides materialized on demand
//! - **Conventional Discovery**: Configuration located among well-known file
//!   names, overrides bound from the environment
//! - **Thread Safe**: Level queries never observe a half-applied reload

pub mod core;
pub mod environment;
pub mod resolvers;
pub mod system;

pub mod prelude {
    pub use crate::core::{
        compose, AppenderSpec, ComposerError, Configuration, ContextEvent, EntryOrigin,
        LevelChange, LevelMap, LogLevel, LoggerConfig, LoggerConfiguration, LoggerHandle,
        LoggerTable, LoggingContext, Result, DEFAULT_ROOT_LEVEL, ROOT_LOGGER_NAME,
    };
    pub use crate::environment::{EnvironmentBinder, MapEnvironment, ProcessEnvironment};
    pub use crate::resolvers::{
        ConfigurationResolver, FileResolver, FormatCapabilities, MemoryResolver,
    };
    pub use crate::system::{
        InitializationContext, LoadOutcome, LogFile, LoggingSystem, LoggingSystemBuilder,
    };
}

pub use self::core::{
    compose, AppenderSpec, ComposerError, Configuration, ContextEvent, EntryOrigin, LevelChange,
    LevelMap, LogLevel, LoggerConfig, LoggerConfiguration, LoggerHandle, LoggerTable,
    LoggingContext, Result, DEFAULT_ROOT_LEVEL, ROOT_LOGGER_NAME,
};
pub use environment::{EnvironmentBinder, MapEnvironment, ProcessEnvironment};
pub use resolvers::{ConfigurationResolver, FileResolver, FormatCapabilities, MemoryResolver};
pub use system::{InitializationContext, LoadOutcome, LogFile, LoggingSystem, LoggingSystemBuilder};
