//! Docker Volume Frontend
//!
//! Turns a `docker volume create` request (a volume name plus untyped
//! options) into the storage class and volume config the orchestrator
//! provisions from.

pub mod storage_class;
pub mod volume_config;

pub use storage_class::*;
pub use volume_config::*;

use crate::config::FrontendConfig;
use crate::domain::ports::{StorageClassConfig, StorageOrchestrator, VolumeConfig};
use crate::error::Result;
use crate::options::OptionSet;
use serde::Serialize;
use tracing::info;

/// Result of preparing a volume create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedVolume {
    pub storage_class: StorageClassConfig,
    pub volume: VolumeConfig,
    /// Options not claimed while building the volume config
    pub remaining_options: OptionSet,
}

/// Frontend bound to an orchestrator
pub struct VolumeFrontend<O> {
    orchestrator: O,
    config: FrontendConfig,
}

impl<O: StorageOrchestrator> VolumeFrontend<O> {
    pub fn new(orchestrator: O, config: FrontendConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    pub fn orchestrator(&self) -> &O {
        &self.orchestrator
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Resolve the storage class for the options
    pub async fn storage_class(&self, options: &OptionSet) -> Result<StorageClassConfig> {
        resolve_storage_class(options, &self.orchestrator, &self.config.class_name_prefix).await
    }

    /// Resolve the storage class, then build the volume config
    pub async fn prepare_volume(&self, name: &str, options: OptionSet) -> Result<PreparedVolume> {
        let storage_class = self.storage_class(&options).await?;
        let (volume, remaining_options) = build_volume_config(
            name,
            &storage_class.name,
            options,
            &self.config.default_volume_size,
        )?;

        info!(
            volume = %volume.name,
            storage_class = %storage_class.name,
            size = %volume.size,
            "Prepared volume config"
        );

        Ok(PreparedVolume {
            storage_class,
            volume,
            remaining_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{Backend, Pool};
    use crate::error::Error;
    use crate::registry::InMemoryOrchestrator;
    use assert_matches::assert_matches;

    fn frontend() -> VolumeFrontend<std::sync::Arc<InMemoryOrchestrator>> {
        let orchestrator = InMemoryOrchestrator::with_backends([
            Backend::new("B1").with_pool(Pool::new("pool1"))
        ]);
        VolumeFrontend::new(orchestrator, FrontendConfig::default())
    }

    #[tokio::test]
    async fn test_prepare_volume() {
        let frontend = frontend();
        let options: OptionSet = [
            ("aggregate|pool", "pool1"),
            ("minIOPS", "int:500"),
            ("size", "2G"),
            ("fstype", "ext4"),
        ]
        .into_iter()
        .collect();

        let prepared = frontend.prepare_volume("vol1", options).await.unwrap();

        assert_eq!(prepared.volume.storage_class, prepared.storage_class.name);
        assert!(prepared.storage_class.name.starts_with("trident-auto-"));
        assert_eq!(prepared.storage_class.pools["B1"], vec!["pool1".to_string()]);
        assert_eq!(prepared.volume.size, (2u64 * 1024 * 1024 * 1024).to_string());
        assert_eq!(prepared.volume.file_system, "ext4");
        assert!(prepared.remaining_options.get("size").is_none());
        assert_eq!(frontend.orchestrator().storage_classes().len(), 1);
    }

    #[tokio::test]
    async fn test_volumes_share_storage_class() {
        let frontend = frontend();
        let a: OptionSet = [("minIOPS", "int:500"), ("size", "1G")].into_iter().collect();
        let b: OptionSet = [("size", "3G"), ("minIOPS", "int:500")].into_iter().collect();

        let first = frontend.prepare_volume("a", a).await.unwrap();
        let second = frontend.prepare_volume("b", b).await.unwrap();

        assert_eq!(first.storage_class, second.storage_class);
        assert_ne!(first.volume.size, second.volume.size);
        assert_eq!(frontend.orchestrator().storage_classes().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_size_after_class_registration() {
        let frontend = frontend();
        let options: OptionSet = [("size", "big")].into_iter().collect();

        assert_matches!(
            frontend.prepare_volume("v", options).await,
            Err(Error::VolumeSize { .. })
        );
    }
}
