//! In-memory resolver for embedded configurations and tests

use super::{ConfigurationResolver, FormatCapabilities};
use crate::core::{ComposerError, Configuration, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone)]
enum Slot {
    Present(Configuration),
    Failing(String),
}

/// Serves configurations registered under location strings.
///
/// Locations can also be registered as failing, in which case resolving them
/// reports an IO error the way an unreadable file would.
#[derive(Debug)]
pub struct MemoryResolver {
    slots: RwLock<HashMap<String, Slot>>,
    capabilities: FormatCapabilities,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::with_capabilities(FormatCapabilities::all())
    }

    pub fn with_capabilities(capabilities: FormatCapabilities) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            capabilities,
        }
    }

    /// Register `configuration` under `location`
    pub fn insert(&self, location: impl Into<String>, configuration: Configuration) {
        let location = location.into();
        let configuration = configuration.located_at(location.clone());
        self.slots.write().insert(location, Slot::Present(configuration));
    }

    /// Make `location` fail with an IO error carrying `message`
    pub fn fail_with(&self, location: impl Into<String>, message: impl Into<String>) {
        self.slots
            .write()
            .insert(location.into(), Slot::Failing(message.into()));
    }

    pub fn remove(&self, location: &str) {
        self.slots.write().remove(location);
    }
}

impl Default for MemoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationResolver for MemoryResolver {
    fn resolve(&self, location: &str) -> Result<Option<Configuration>> {
        match self.slots.read().get(location) {
            Some(Slot::Present(configuration)) => Ok(Some(configuration.clone())),
            Some(Slot::Failing(message)) => Err(ComposerError::io_operation(
                format!("reading {}", location),
                message.clone(),
                io::Error::new(io::ErrorKind::Other, message.clone()),
            )),
            None => {
                tracing::info!("Unable to locate {}, ignoring.", location);
                Ok(None)
            }
        }
    }

    fn capabilities(&self) -> FormatCapabilities {
        self.capabilities
    }

    fn exists(&self, location: &str) -> bool {
        matches!(self.slots.read().get(location), Some(Slot::Present(_)))
    }
}
