//! Binding framework properties from the runtime environment

use std::collections::BTreeMap;

/// Property holding the ordered list of override locations
pub const OVERRIDE_PROPERTY: &str = "logging.config.override";

/// Source of framework properties.
///
/// Lists bind either from indexed keys (`key[0]`, `key[1]`, ...) or from a
/// single comma-separated value.
pub trait EnvironmentBinder: Send + Sync {
    fn bind(&self, key: &str) -> Option<String>;

    fn bind_list(&self, key: &str) -> Option<Vec<String>> {
        self.bind(key).map(|value| split_list(&value))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect `name(0)`, `name(1)`, ... until the first gap
fn bind_indexed(mut lookup: impl FnMut(usize) -> Option<String>) -> Option<Vec<String>> {
    let items: Vec<String> = (0..).map_while(&mut lookup).collect();
    (!items.is_empty()).then_some(items)
}

/// Properties held in a map, keyed by their dotted names
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    values: BTreeMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl EnvironmentBinder for MapEnvironment {
    fn bind(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn bind_list(&self, key: &str) -> Option<Vec<String>> {
        bind_indexed(|index| self.values.get(&format!("{}[{}]", key, index)).cloned())
            .or_else(|| self.bind(key).map(|value| split_list(&value)))
    }
}

/// Process environment variables with relaxed names:
/// `logging.config.override` binds from `LOGGING_CONFIG_OVERRIDE`, or as a
/// list from `LOGGING_CONFIG_OVERRIDE_0`, `LOGGING_CONFIG_OVERRIDE_1`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentBinder for ProcessEnvironment {
    fn bind(&self, key: &str) -> Option<String> {
        std::env::var(env_var_name(key)).ok()
    }

    fn bind_list(&self, key: &str) -> Option<Vec<String>> {
        let name = env_var_name(key);
        bind_indexed(|index| std::env::var(format!("{}_{}", name, index)).ok())
            .or_else(|| self.bind(key).map(|value| split_list(&value)))
    }
}

/// `logging.config-file.override` → `LOGGING_CONFIGFILE_OVERRIDE`
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-')
        .map(|c| if c == '.' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_list() {
        let env = MapEnvironment::new().with(OVERRIDE_PROPERTY, " a.json, ,b.json ");
        assert_eq!(
            env.bind_list(OVERRIDE_PROPERTY),
            Some(vec!["a.json".to_string(), "b.json".to_string()])
        );
    }

    #[test]
    fn test_indexed_list_wins_and_stops_at_gap() {
        let env = MapEnvironment::new()
            .with("logging.config.override[0]", "first.json")
            .with("logging.config.override[1]", "second.json")
            .with("logging.config.override[3]", "unreachable.json")
            .with(OVERRIDE_PROPERTY, "ignored.json");

        assert_eq!(
            env.bind_list(OVERRIDE_PROPERTY),
            Some(vec!["first.json".to_string(), "second.json".to_string()])
        );
    }

    #[test]
    fn test_absent_list() {
        assert_eq!(MapEnvironment::new().bind_list(OVERRIDE_PROPERTY), None);
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name(OVERRIDE_PROPERTY), "LOGGING_CONFIG_OVERRIDE");
        assert_eq!(env_var_name("logging.config-file.override"), "LOGGING_CONFIGFILE_OVERRIDE");
    }

    #[test]
    fn test_process_environment_relaxed_binding() {
        let key = "log-composer.test.process-binding";
        std::env::set_var("LOGCOMPOSER_TEST_PROCESSBINDING", "x.json,y.json");
        assert_eq!(
            ProcessEnvironment.bind_list(key),
            Some(vec!["x.json".to_string(), "y.json".to_string()])
        );

        std::env::set_var("LOGCOMPOSER_TEST_PROCESSBINDING_0", "indexed.json");
        assert_eq!(
            ProcessEnvironment.bind_list(key),
            Some(vec!["indexed.json".to_string()])
        );
        std::env::remove_var("LOGCOMPOSER_TEST_PROCESSBINDING_0");
        std::env::remove_var("LOGCOMPOSER_TEST_PROCESSBINDING");
    }
}
