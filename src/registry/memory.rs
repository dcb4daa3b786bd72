//! In-Memory Orchestrator
//!
//! Tracks backends and storage classes in process memory. Storage class
//! registration validates, checks and inserts under a single write guard so
//! concurrent registrations of the same name store exactly one class.
//!
//! Lock order: `backends` before `storage_classes`. Never hold more than one
//! guard otherwise.

use crate::domain::ports::{Backend, StorageClass, StorageClassConfig, StorageOrchestrator};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// =============================================================================
// Registry Statistics
// =============================================================================

/// Snapshot of registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStatsSnapshot {
    pub backends: u64,
    pub storage_classes: u64,
    pub registrations: u64,
    pub rejected_registrations: u64,
}

// =============================================================================
// In-Memory Orchestrator
// =============================================================================

/// Orchestrator port backed by in-process maps
#[derive(Debug, Default)]
pub struct InMemoryOrchestrator {
    /// Backends in insertion order
    backends: RwLock<IndexMap<String, Backend>>,
    /// Registered storage classes by name
    storage_classes: RwLock<BTreeMap<String, StorageClass>>,
    registrations: AtomicU64,
    rejected_registrations: AtomicU64,
}

impl InMemoryOrchestrator {
    /// Create an empty orchestrator
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create an orchestrator seeded with backends
    pub fn with_backends(backends: impl IntoIterator<Item = Backend>) -> Arc<Self> {
        let orchestrator = Self::default();
        {
            let mut map = orchestrator.backends.write();
            for backend in backends {
                map.insert(backend.name.clone(), backend);
            }
        }
        Arc::new(orchestrator)
    }

    /// Add or replace a backend
    ///
    /// A replaced backend keeps its original enumeration position.
    pub fn add_backend(&self, backend: Backend) {
        info!(backend = %backend.name, pools = backend.storage.len(), "Adding backend");
        self.backends.write().insert(backend.name.clone(), backend);
    }

    /// Remove a backend, returning it if present
    pub fn remove_backend(&self, name: &str) -> Option<Backend> {
        let removed = self.backends.write().shift_remove(name);
        if removed.is_some() {
            info!(backend = %name, "Removed backend");
        }
        removed
    }

    /// List all registered storage classes
    pub fn storage_classes(&self) -> Vec<StorageClass> {
        self.storage_classes.read().values().cloned().collect()
    }

    /// Get registry counters
    pub fn stats(&self) -> RegistryStatsSnapshot {
        let backends = self.backends.read().len() as u64;
        let storage_classes = self.storage_classes.read().len() as u64;
        RegistryStatsSnapshot {
            backends,
            storage_classes,
            registrations: self.registrations.load(Ordering::Relaxed),
            rejected_registrations: self.rejected_registrations.load(Ordering::Relaxed),
        }
    }

    /// Check that every pinned backend/pool exists
    fn validate_pools(
        backends: &IndexMap<String, Backend>,
        config: &StorageClassConfig,
    ) -> Result<()> {
        for (backend_name, pools) in &config.pools {
            let backend = backends.get(backend_name).ok_or_else(|| {
                Error::StorageClassRegistration {
                    name: config.name.clone(),
                    reason: format!("unknown backend {}", backend_name),
                }
            })?;
            if let Some(missing) = pools.iter().find(|p| !backend.has_pool(p)) {
                return Err(Error::StorageClassRegistration {
                    name: config.name.clone(),
                    reason: format!("backend {} has no pool {}", backend_name, missing),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageOrchestrator for InMemoryOrchestrator {
    async fn list_backends(&self) -> Vec<Backend> {
        self.backends.read().values().cloned().collect()
    }

    async fn get_storage_class(&self, name: &str) -> Option<StorageClass> {
        self.storage_classes.read().get(name).cloned()
    }

    async fn add_storage_class(&self, config: StorageClassConfig) -> Result<StorageClass> {
        if config.name.is_empty() {
            self.rejected_registrations.fetch_add(1, Ordering::Relaxed);
            return Err(Error::StorageClassRegistration {
                name: config.name,
                reason: "storage class name is empty".into(),
            });
        }

        let backends = self.backends.read();
        let mut classes = self.storage_classes.write();

        if let Some(existing) = classes.get(&config.name) {
            debug!(storage_class = %config.name, "Storage class already registered");
            return Ok(existing.clone());
        }

        if let Err(e) = Self::validate_pools(&backends, &config) {
            self.rejected_registrations.fetch_add(1, Ordering::Relaxed);
            return Err(e);
        }

        let class = StorageClass {
            config,
            created_at: Utc::now(),
        };
        classes.insert(class.config.name.clone(), class.clone());
        drop(classes);
        drop(backends);
        self.registrations.fetch_add(1, Ordering::Relaxed);

        info!(
            storage_class = %class.config.name,
            attributes = class.config.attributes.len(),
            pinned_backends = class.config.pools.len(),
            "Registered storage class"
        );

        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Pool;
    use assert_matches::assert_matches;

    fn class(name: &str) -> StorageClassConfig {
        StorageClassConfig {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_backends_enumerate_in_insertion_order() {
        let orchestrator = InMemoryOrchestrator::new();
        orchestrator.add_backend(Backend::new("zeta"));
        orchestrator.add_backend(Backend::new("alpha"));
        orchestrator.add_backend(Backend::new("mid"));

        let names: Vec<_> = tokio_test::block_on(orchestrator.list_backends())
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        assert!(orchestrator.remove_backend("alpha").is_some());
        assert!(orchestrator.remove_backend("alpha").is_none());
        assert_eq!(orchestrator.stats().backends, 2);
    }

    #[tokio::test]
    async fn test_add_and_get_storage_class() {
        let orchestrator = InMemoryOrchestrator::new();
        assert!(orchestrator.get_storage_class("sc1").await.is_none());

        let added = orchestrator.add_storage_class(class("sc1")).await.unwrap();
        assert_eq!(added.name(), "sc1");

        let fetched = orchestrator.get_storage_class("sc1").await.unwrap();
        assert_eq!(fetched, added);
        assert_eq!(orchestrator.storage_classes().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_returns_existing() {
        let orchestrator = InMemoryOrchestrator::new();
        let first = orchestrator.add_storage_class(class("sc1")).await.unwrap();
        let second = orchestrator.add_storage_class(class("sc1")).await.unwrap();

        assert_eq!(first.created_at, second.created_at);
        let stats = orchestrator.stats();
        assert_eq!(stats.storage_classes, 1);
        assert_eq!(stats.registrations, 1);
    }

    #[tokio::test]
    async fn test_rejects_unknown_pool() {
        let orchestrator = InMemoryOrchestrator::with_backends([
            Backend::new("b1").with_pool(Pool::new("pool1")),
        ]);

        let mut config = class("sc-bad-pool");
        config.pools.insert("b1".into(), vec!["pool9".into()]);
        assert_matches!(
            orchestrator.add_storage_class(config).await,
            Err(Error::StorageClassRegistration { name, .. }) if name == "sc-bad-pool"
        );

        let mut config = class("sc-bad-backend");
        config.pools.insert("b9".into(), vec!["pool1".into()]);
        assert!(orchestrator.add_storage_class(config).await.is_err());

        let mut config = class("sc-ok");
        config.pools.insert("b1".into(), vec!["pool1".into()]);
        assert!(orchestrator.add_storage_class(config).await.is_ok());

        let stats = orchestrator.stats();
        assert_eq!(stats.rejected_registrations, 2);
        assert_eq!(stats.storage_classes, 1);
    }

    #[tokio::test]
    async fn test_rejects_empty_name() {
        let orchestrator = InMemoryOrchestrator::new();
        assert!(orchestrator.add_storage_class(class("")).await.is_err());
        assert!(orchestrator.storage_classes().is_empty());
    }

    #[test]
    fn test_stats_and_registration_with_backend_churn() {
        let orchestrator = InMemoryOrchestrator::with_backends([
            Backend::new("b1").with_pool(Pool::new("pool1")),
        ]);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..2_000 {
                    let _ = orchestrator.stats();
                }
            });
            scope.spawn(|| {
                for i in 0..2_000 {
                    let mut config = class(&format!("sc-{}", i));
                    config.pools.insert("b1".into(), vec!["pool1".into()]);
                    tokio_test::block_on(orchestrator.add_storage_class(config)).unwrap();
                }
            });
            scope.spawn(|| {
                for i in 0..2_000 {
                    orchestrator.add_backend(Backend::new(format!("churn-{}", i % 8)));
                }
            });
        });

        let stats = orchestrator.stats();
        assert_eq!(stats.storage_classes, 2_000);
        assert_eq!(stats.backends, 9);
    }
}
