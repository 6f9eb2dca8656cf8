//! Error types for the configuration composer

pub type Result<T> = std::result::Result<T, ComposerError>;

/// Errors raised while locating or activating logging configuration.
///
/// Composition itself never fails: override precedence is a total order.
#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    /// The base configuration location could not be resolved
    #[error("Cannot locate configuration file: {location}")]
    ConfigNotFound { location: String },

    /// Unrecognized or unsupported level token
    #[error("Invalid log level: '{token}'")]
    InvalidLevel { token: String },

    /// An override failed to load while reinitializing
    #[error("Failed to load overriding configuration from '{location}'")]
    OverrideLoad {
        location: String,
        #[source]
        source: Box<ComposerError>,
    },

    /// The resolver cannot read this document format
    #[error("Unsupported configuration format for '{location}'")]
    UnsupportedFormat { location: String },

    /// The resolver cannot reach this kind of location
    #[error("Unsupported configuration location '{location}'")]
    UnsupportedLocation { location: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The logging context has been stopped
    #[error("Logging context already stopped")]
    ContextStopped,
}

impl ComposerError {
    /// Create a configuration-not-found error
    pub fn config_not_found(location: impl Into<String>) -> Self {
        ComposerError::ConfigNotFound {
            location: location.into(),
        }
    }

    /// Create an invalid level error for the rejected token
    pub fn invalid_level(token: impl Into<String>) -> Self {
        ComposerError::InvalidLevel {
            token: token.into(),
        }
    }

    /// Wrap a resolver failure for an override location
    pub fn override_load(location: impl Into<String>, source: ComposerError) -> Self {
        ComposerError::OverrideLoad {
            location: location.into(),
            source: Box::new(source),
        }
    }

    pub fn unsupported_format(location: impl Into<String>) -> Self {
        ComposerError::UnsupportedFormat {
            location: location.into(),
        }
    }

    pub fn unsupported_location(location: impl Into<String>) -> Self {
        ComposerError::UnsupportedLocation {
            location: location.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        ComposerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ComposerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Whether this error means "nothing was found at the location"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ComposerError::ConfigNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_creation() {
        let err = ComposerError::config_not_found("logging.json");
        assert!(matches!(err, ComposerError::ConfigNotFound { .. }));
        assert!(err.is_not_found());

        let err = ComposerError::invalid_level("LOUD");
        assert!(matches!(err, ComposerError::InvalidLevel { .. }));
        assert!(!err.is_not_found());

        let err = ComposerError::config("logger 'a'", "duplicate root entry");
        assert!(matches!(err, ComposerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ComposerError::config_not_found("classpath:logging.json");
        assert_eq!(
            err.to_string(),
            "Cannot locate configuration file: classpath:logging.json"
        );

        let err = ComposerError::invalid_level("LOUD");
        assert_eq!(err.to_string(), "Invalid log level: 'LOUD'");

        let err = ComposerError::unsupported_format("logging.xml");
        assert_eq!(
            err.to_string(),
            "Unsupported configuration format for 'logging.xml'"
        );
    }

    #[test]
    fn test_override_load_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let inner = ComposerError::io_operation("reading override.json", "cannot read", io_err);
        let err = ComposerError::override_load("override.json", inner);

        assert!(err.to_string().contains("override.json"));
        let source = err.source().expect("override error keeps its cause");
        assert!(source.to_string().contains("reading override.json"));
    }
}
