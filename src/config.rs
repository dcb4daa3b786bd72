//! Frontend Configuration
//!
//! YAML configuration for the frontend and the backends it seeds the
//! in-memory orchestrator with:
//!
//! ```yaml
//! classNamePrefix: trident-auto
//! defaultVolumeSize: 1G
//! backends:
//!   - name: ontap-nas
//!     storage:
//!       aggr1: { name: aggr1, capacityBytes: 1099511627776 }
//! ```

use crate::domain::ports::Backend;
use crate::error::{Error, Result};
use crate::frontend::storage_class::AUTO_STORAGE_CLASS_PREFIX;
use crate::frontend::volume_config::DEFAULT_VOLUME_SIZE;
use crate::options::OptionSet;
use crate::size::parse_volume_size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration for the volume frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendConfig {
    /// Prefix for automatically created storage class names
    #[serde(default = "default_class_name_prefix")]
    pub class_name_prefix: String,

    /// Size used when a request has no `size` option
    #[serde(default = "default_volume_size")]
    pub default_volume_size: String,

    /// Backends known to the orchestrator
    #[serde(default)]
    pub backends: Vec<Backend>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            class_name_prefix: default_class_name_prefix(),
            default_volume_size: default_volume_size(),
            backends: Vec::new(),
        }
    }
}

fn default_class_name_prefix() -> String {
    AUTO_STORAGE_CLASS_PREFIX.to_string()
}

fn default_volume_size() -> String {
    DEFAULT_VOLUME_SIZE.to_string()
}

impl FrontendConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading frontend configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Fill pool names from their map keys when omitted
    fn normalize(&mut self) {
        for backend in &mut self.backends {
            for (key, pool) in backend.storage.iter_mut() {
                if pool.name.is_empty() {
                    pool.name = key.clone();
                }
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.class_name_prefix.is_empty() {
            return Err(Error::Configuration("classNamePrefix must not be empty".into()));
        }

        parse_volume_size(&OptionSet::new(), &self.default_volume_size).map_err(|e| {
            Error::Configuration(format!(
                "invalid defaultVolumeSize {:?}: {}",
                self.default_volume_size, e
            ))
        })?;

        let mut seen = std::collections::BTreeSet::new();
        for backend in &self.backends {
            if backend.name.is_empty() {
                return Err(Error::Configuration("backend name must not be empty".into()));
            }
            if !seen.insert(backend.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate backend {}",
                    backend.name
                )));
            }
            if let Some((key, pool)) = backend.storage.iter().find(|(k, p)| *k != &p.name) {
                return Err(Error::Configuration(format!(
                    "backend {}: pool key {} does not match pool name {}",
                    backend.name, key, pool.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FrontendConfig::default();
        assert_eq!(config.class_name_prefix, "trident-auto");
        assert_eq!(config.default_volume_size, "1G");
        assert!(config.backends.is_empty());
        assert!(config.validate().is_ok());

        assert_eq!(FrontendConfig::from_yaml_str("{}").unwrap(), config);
    }

    #[test]
    fn test_parse_backends_in_order() {
        let yaml = r#"
classNamePrefix: netapp-auto
defaultVolumeSize: 10Gi
backends:
  - name: ontap-san
    storage:
      aggr2: {}
      aggr1:
        capacityBytes: 1024
  - name: ontap-nas
    storage:
      aggr1:
        name: aggr1
"#;
        let config = FrontendConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.class_name_prefix, "netapp-auto");
        assert_eq!(config.backends.len(), 2);

        let san = &config.backends[0];
        assert_eq!(san.name, "ontap-san");
        let pools: Vec<_> = san.storage.keys().cloned().collect();
        assert_eq!(pools, vec!["aggr2", "aggr1"]);
        assert_eq!(san.storage["aggr2"].name, "aggr2");
        assert_eq!(san.storage["aggr1"].capacity_bytes, 1024);
    }

    #[test]
    fn test_invalid_configs() {
        assert_matches!(
            FrontendConfig::from_yaml_str("classNamePrefix: ''"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            FrontendConfig::from_yaml_str("defaultVolumeSize: huge"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            FrontendConfig::from_yaml_str("backends: [{name: a}, {name: a}]"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            FrontendConfig::from_yaml_str("backends: [{name: a, storage: {p1: {name: p2}}}]"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            FrontendConfig::from_yaml_str("backends: 3"),
            Err(Error::YamlParse(_))
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaultVolumeSize: 2G").unwrap();
        writeln!(file, "backends:").unwrap();
        writeln!(file, "  - name: b1").unwrap();
        writeln!(file, "    storage:").unwrap();
        writeln!(file, "      pool1: {{}}").unwrap();

        let config = FrontendConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_volume_size, "2G");
        assert!(config.backends[0].has_pool("pool1"));

        assert_matches!(
            FrontendConfig::from_file("/nonexistent/frontend.yaml"),
            Err(Error::Io(_))
        );
    }
}
