//! Docker Volume Frontend - Automatic Storage Classes
//!
//! Translates `docker volume create` options into the storage class and
//! volume config consumed by the storage orchestrator. Equivalent option sets
//! always resolve to the same storage class, registered on first use.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    docker volume create -o key=value                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────┐      ┌───────────────────────────────┐   │
//! │  │  Storage Class Resolver   │─name─▶│    Volume Config Builder      │   │
//! │  │  build → hash → match/add │      │  size claim + field mapping   │   │
//! │  └─────────────┬─────────────┘      └───────────────────────────────┘   │
//! │                │                                                         │
//! ├────────────────┼────────────────────────────────────────────────────────┤
//! │                ▼            Storage Orchestrator Port                    │
//! │   list_backends · get_storage_class · add_storage_class                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`frontend`]: Storage class resolution and volume config construction
//! - [`domain`]: Orchestrator port and descriptor types
//! - [`registry`]: In-memory orchestrator
//! - [`attribute`]: Typed attribute requests
//! - [`options`]: Volume option set and well-known keys
//! - [`size`]: Size parsing
//! - [`config`]: Frontend configuration
//! - [`error`]: Error types and handling

pub mod attribute;
pub mod config;
pub mod domain;
pub mod error;
pub mod frontend;
pub mod options;
pub mod registry;
pub mod size;

// Re-export commonly used types
pub use attribute::{parse_attribute_request, AttributeRequest};

pub use config::FrontendConfig;

pub use domain::ports::{
    AccessMode, Backend, Pool, Protocol, StorageClass, StorageClassConfig,
    StorageOrchestrator, VolumeConfig,
};

pub use error::{Error, Result};

pub use frontend::{
    build_storage_class, build_volume_config, resolve_storage_class, storage_class_hash,
    PreparedVolume, VolumeFrontend, AUTO_STORAGE_CLASS_PREFIX, DEFAULT_VOLUME_SIZE,
};

pub use options::OptionSet;

pub use registry::{InMemoryOrchestrator, RegistryStatsSnapshot};

pub use size::{parse_capacity, parse_volume_size};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
