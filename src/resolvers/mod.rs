//! Configuration source resolvers

pub mod file;
pub mod memory;

pub use file::FileResolver;
pub use memory::MemoryResolver;

use crate::core::{Configuration, Result};

/// Base name shared by every conventional configuration file
pub const CONFIG_BASE_NAME: &str = "logging";

/// Marker inserted before the extension of framework-specific variants
pub const FRAMEWORK_VARIANT_SUFFIX: &str = "-app";

/// Document formats a resolver can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatCapabilities {
    pub properties: bool,
    pub yaml: bool,
    pub json: bool,
    pub xml: bool,
}

impl FormatCapabilities {
    pub const fn none() -> Self {
        Self {
            properties: false,
            yaml: false,
            json: false,
            xml: false,
        }
    }

    pub const fn all() -> Self {
        Self {
            properties: true,
            yaml: true,
            json: true,
            xml: true,
        }
    }

    pub const fn json_only() -> Self {
        Self {
            json: true,
            ..Self::none()
        }
    }

    /// Supported extensions, in probing order
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut extensions = Vec::new();
        if self.properties {
            extensions.push("properties");
        }
        if self.yaml {
            extensions.extend(["yaml", "yml"]);
        }
        if self.json {
            extensions.extend(["json", "jsn"]);
        }
        if self.xml {
            extensions.push("xml");
        }
        extensions
    }
}

/// Turns a location string into a [`Configuration`].
///
/// `Ok(None)` means nothing exists at the location; errors are reserved for
/// locations that exist but cannot be read.
pub trait ConfigurationResolver: Send + Sync {
    fn resolve(&self, location: &str) -> Result<Option<Configuration>>;

    fn capabilities(&self) -> FormatCapabilities;

    fn exists(&self, location: &str) -> bool {
        matches!(self.resolve(location), Ok(Some(_)))
    }
}

/// Conventional file names for the given capabilities: every test variant
/// first, then the regular ones, then `explicit` when set.
pub fn standard_locations(capabilities: FormatCapabilities, explicit: Option<&str>) -> Vec<String> {
    let extensions = capabilities.extensions();
    let mut locations = Vec::with_capacity(extensions.len() * 2 + 1);
    for stem in [format!("{}-test", CONFIG_BASE_NAME), CONFIG_BASE_NAME.to_string()] {
        locations.extend(extensions.iter().map(|ext| format!("{}.{}", stem, ext)));
    }
    if let Some(explicit) = explicit {
        locations.push(explicit.to_string());
    }
    locations
}

/// `logging.json` becomes `logging-app.json`
pub fn framework_variant(location: &str) -> String {
    match location.rfind('.') {
        Some(dot) if !location[dot..].contains('/') => format!(
            "{}{}{}",
            &location[..dot],
            FRAMEWORK_VARIANT_SUFFIX,
            &location[dot..]
        ),
        _ => format!("{}{}", location, FRAMEWORK_VARIANT_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_locations_order() {
        let locations = standard_locations(FormatCapabilities::all(), Some("custom/log.json"));
        assert_eq!(
            locations,
            vec![
                "logging-test.properties",
                "logging-test.yaml",
                "logging-test.yml",
                "logging-test.json",
                "logging-test.jsn",
                "logging-test.xml",
                "logging.properties",
                "logging.yaml",
                "logging.yml",
                "logging.json",
                "logging.jsn",
                "logging.xml",
                "custom/log.json",
            ]
        );
    }

    #[test]
    fn test_capabilities_gate_formats() {
        let locations = standard_locations(FormatCapabilities::json_only(), None);
        assert_eq!(
            locations,
            vec!["logging-test.json", "logging-test.jsn", "logging.json", "logging.jsn"]
        );
        assert!(standard_locations(FormatCapabilities::none(), None).is_empty());
    }

    #[test]
    fn test_framework_variant() {
        assert_eq!(framework_variant("logging.json"), "logging-app.json");
        assert_eq!(framework_variant("logging-test.xml"), "logging-test-app.xml");
        assert_eq!(framework_variant("conf.d/logging"), "conf.d/logging-app");
    }
}
