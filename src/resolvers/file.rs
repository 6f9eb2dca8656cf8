//! File system resolver

use super::{ConfigurationResolver, FormatCapabilities};
use crate::core::{ComposerError, Configuration, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "file:";
const CLASSPATH_PREFIX: &str = "classpath:";
const URL_SCHEMES: [&str; 3] = ["http:", "https:", "jar:"];

/// Reads JSON configuration documents from disk.
///
/// `classpath:` locations and plain relative paths are resolved against the
/// base directory when one is set; `file:` locations are taken as given.
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    base_dir: Option<PathBuf>,
}

impl FileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `base_dir`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use log_composer::resolvers::{ConfigurationResolver, FileResolver};
    ///
    /// let resolver = FileResolver::with_base_dir("/etc/myapp");
    /// let config = resolver.resolve("classpath:logging.json").unwrap();
    /// ```
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn path_for(&self, location: &str) -> Result<PathBuf> {
        if URL_SCHEMES.iter().any(|scheme| location.starts_with(scheme)) {
            return Err(ComposerError::unsupported_location(location));
        }
        if let Some(path) = location.strip_prefix(FILE_PREFIX) {
            return Ok(PathBuf::from(path));
        }
        let path = Path::new(location.strip_prefix(CLASSPATH_PREFIX).unwrap_or(location));
        Ok(match &self.base_dir {
            Some(base_dir) if path.is_relative() => base_dir.join(path),
            _ => path.to_path_buf(),
        })
    }

    fn is_json(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "json" | "jsn"))
            .unwrap_or(false)
    }
}

impl ConfigurationResolver for FileResolver {
    fn resolve(&self, location: &str) -> Result<Option<Configuration>> {
        let path = self.path_for(location)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!("Unable to locate file {}, ignoring.", path.display());
                return Ok(None);
            }
            Err(err) => {
                return Err(ComposerError::io_operation(
                    format!("reading {}", path.display()),
                    "cannot read configuration file",
                    err,
                ))
            }
        };

        if !Self::is_json(&path) {
            return Err(ComposerError::unsupported_format(location));
        }
        Configuration::from_json_str(location, &content).map(Some)
    }

    fn capabilities(&self) -> FormatCapabilities {
        FormatCapabilities::json_only()
    }

    fn exists(&self, location: &str) -> bool {
        self.path_for(location)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}
