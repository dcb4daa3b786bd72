//! Domain Ports - Orchestrator boundary for the volume frontend
//!
//! These types and traits define the boundary between the frontend logic and
//! the storage orchestrator. Adapters implement [`StorageOrchestrator`] to
//! provide the backend inventory and the storage class registry.

use crate::attribute::AttributeRequest;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// Backends and Pools
// =============================================================================

/// A storage pool (aggregate) exposed by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Pool name, unique within its backend
    #[serde(default)]
    pub name: String,
    /// Total capacity in bytes
    #[serde(default)]
    pub capacity_bytes: u64,
    /// Free-form labels reported by the backend
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Pool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A storage backend known to the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    /// Backend name
    pub name: String,
    /// Pools keyed by name, in the order the backend reports them
    #[serde(default)]
    pub storage: IndexMap<String, Pool>,
}

impl Backend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: IndexMap::new(),
        }
    }

    /// Add a pool, keeping report order
    pub fn with_pool(mut self, pool: Pool) -> Self {
        self.storage.insert(pool.name.clone(), pool);
        self
    }

    pub fn has_pool(&self, name: &str) -> bool {
        self.storage.contains_key(name)
    }
}

// =============================================================================
// Storage Classes
// =============================================================================

/// Storage class descriptor: a named bundle of placement and attribute
/// constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassConfig {
    /// Canonical name derived from `pools` and `attributes`
    pub name: String,
    /// Backend name to pool names; empty means unconstrained
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pools: BTreeMap<String, Vec<String>>,
    /// Attribute constraints keyed by option name
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeRequest>,
}

/// A storage class as registered with the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClass {
    pub config: StorageClassConfig,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl StorageClass {
    pub fn name(&self) -> &str {
        &self.config.name
    }
}

// =============================================================================
// Volume Config
// =============================================================================

/// Volume protocol constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    File,
    Block,
    #[default]
    Any,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::File => write!(f, "file"),
            Protocol::Block => write!(f, "block"),
            Protocol::Any => write!(f, "any"),
        }
    }
}

/// Volume access mode constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    #[default]
    Any,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::ReadWriteOnce => write!(f, "ReadWriteOnce"),
            AccessMode::ReadOnlyMany => write!(f, "ReadOnlyMany"),
            AccessMode::ReadWriteMany => write!(f, "ReadWriteMany"),
            AccessMode::Any => write!(f, "Any"),
        }
    }
}

/// Volume descriptor handed to the orchestrator's create-volume entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConfig {
    pub name: String,
    /// Size in bytes, as a decimal string
    pub size: String,
    pub storage_class: String,
    pub protocol: Protocol,
    pub access_mode: AccessMode,
    pub space_reserve: String,
    pub security_style: String,
    pub split_on_clone: String,
    pub snapshot_policy: String,
    pub export_policy: String,
    pub snapshot_dir: String,
    pub unix_permissions: String,
    pub block_size: String,
    pub file_system: String,
    pub encryption: String,
    pub clone_source_volume: String,
    pub clone_source_snapshot: String,
}

// =============================================================================
// Storage Orchestrator Port
// =============================================================================

/// Port for the orchestrator's backend inventory and storage class registry
///
/// `add_storage_class` must be atomic with respect to concurrent callers
/// registering the same name: at most one class per name is ever stored.
#[async_trait]
pub trait StorageOrchestrator: Send + Sync {
    /// List known backends in enumeration order
    async fn list_backends(&self) -> Vec<Backend>;

    /// Look up a registered storage class by name
    async fn get_storage_class(&self, name: &str) -> Option<StorageClass>;

    /// Register a new storage class
    async fn add_storage_class(&self, config: StorageClassConfig) -> Result<StorageClass>;
}

#[async_trait]
impl<T: StorageOrchestrator + ?Sized> StorageOrchestrator for Arc<T> {
    async fn list_backends(&self) -> Vec<Backend> {
        (**self).list_backends().await
    }

    async fn get_storage_class(&self, name: &str) -> Option<StorageClass> {
        (**self).get_storage_class(name).await
    }

    async fn add_storage_class(&self, config: StorageClassConfig) -> Result<StorageClass> {
        (**self).add_storage_class(config).await
    }
}
