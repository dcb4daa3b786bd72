//! Automatic Storage Classes
//!
//! Turns volume create options into a storage class. The class name embeds a
//! hash of its pools and attributes, so two option sets describing the same
//! constraints always resolve to the same class, whichever request registers
//! it first.

use crate::attribute::{parse_attribute_request, AttributeRequest};
use crate::domain::ports::{StorageClassConfig, StorageOrchestrator};
use crate::error::{Error, Result};
use crate::options::{OptionSet, POOL};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error};
use xxhash_rust::xxh3::xxh3_64;

/// Default prefix for automatically created storage class names
pub const AUTO_STORAGE_CLASS_PREFIX: &str = "trident-auto";

/// Content of a storage class that determines its identity
#[derive(Serialize)]
struct StorageClassIdentity<'a> {
    pools: &'a BTreeMap<String, Vec<String>>,
    attributes: &'a BTreeMap<String, AttributeRequest>,
}

/// Resolve options to a registered storage class
///
/// Returns the orchestrator's existing class when one with the same name is
/// already registered, otherwise registers the freshly built one.
pub async fn resolve_storage_class<O>(
    options: &OptionSet,
    orchestrator: &O,
    prefix: &str,
) -> Result<StorageClassConfig>
where
    O: StorageOrchestrator + ?Sized,
{
    let candidate = build_storage_class(options, orchestrator, prefix).await?;

    if let Some(existing) = orchestrator.get_storage_class(&candidate.name).await {
        debug!(storage_class = %existing.name(), "Matched existing storage class");
        return Ok(existing.config);
    }

    let name = candidate.name.clone();
    match orchestrator.add_storage_class(candidate).await {
        Ok(added) => Ok(added.config),
        Err(e) => {
            error!(storage_class = %name, error = %e, "Couldn't add the storage class");
            Err(match e {
                Error::StorageClassRegistration { .. } => e,
                other => Error::StorageClassRegistration {
                    name,
                    reason: other.to_string(),
                },
            })
        }
    }
}

/// Build a named storage class from options without registering it
pub async fn build_storage_class<O>(
    options: &OptionSet,
    orchestrator: &O,
    prefix: &str,
) -> Result<StorageClassConfig>
where
    O: StorageOrchestrator + ?Sized,
{
    let mut config = StorageClassConfig::default();

    if let Some(required_pool) = options.lookup(POOL).filter(|p| !p.is_empty()) {
        match find_pool(orchestrator, required_pool).await {
            Some(backend) => {
                config.pools.insert(backend, vec![required_pool.to_string()]);
            }
            None => {
                debug!(pool = %required_pool, "Requested pool not found on any backend, ignoring");
            }
        }
    }

    for (key, value) in options.iter() {
        match parse_attribute_request(key, value) {
            Ok(request) => {
                config.attributes.insert(key.to_string(), request);
            }
            Err(e) => {
                debug!(option = %key, error = %e, "Ignoring storage class attribute");
            }
        }
    }

    let hash = storage_class_hash(&config).map_err(|e| {
        error!(options = ?options, error = %e, "Couldn't hash the storage class attributes");
        e
    })?;
    config.name = format!("{}-{}", prefix, hash);

    Ok(config)
}

/// Structural hash of a storage class's pools and attributes
///
/// The name is not part of the hashed content. Maps are ordered, so the
/// encoding does not depend on option order.
pub fn storage_class_hash(config: &StorageClassConfig) -> Result<u64> {
    let identity = StorageClassIdentity {
        pools: &config.pools,
        attributes: &config.attributes,
    };
    let encoded = serde_json::to_vec(&identity).map_err(|e| Error::StorageClassHash {
        reason: e.to_string(),
    })?;
    Ok(xxh3_64(&encoded))
}

/// Find the first backend exposing a pool with the given name
async fn find_pool<O>(orchestrator: &O, pool_name: &str) -> Option<String>
where
    O: StorageOrchestrator + ?Sized,
{
    orchestrator
        .list_backends()
        .await
        .into_iter()
        .find(|backend| backend.storage.keys().any(|name| name == pool_name))
        .map(|backend| backend.name)
}
