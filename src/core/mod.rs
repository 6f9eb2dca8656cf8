//! Core composer types: levels, logger tables, configurations and the context

pub mod configuration;
pub mod context;
pub mod error;
pub mod hierarchy;
pub mod level_map;
pub mod log_level;
pub mod logger_configuration;
pub mod logger_name;
pub mod merge;

pub use configuration::{AppenderSpec, Configuration};
pub use context::{ContextEvent, LoggerHandle, LoggingContext};
pub use error::{ComposerError, Result};
pub use hierarchy::{EntryOrigin, LevelChange, LoggerConfig, LoggerTable, DEFAULT_ROOT_LEVEL};
pub use level_map::{tracing_levels, LevelMap};
pub use log_level::LogLevel;
pub use logger_configuration::LoggerConfiguration;
pub use logger_name::ROOT_LOGGER_NAME;
pub use merge::compose;
