//! Volume Config Construction
//!
//! Maps volume create options onto the orchestrator's volume descriptor.

use crate::domain::ports::{AccessMode, Protocol, VolumeConfig};
use crate::error::Result;
use crate::options::{self, OptionSet};
use crate::size::parse_volume_size;

/// Default volume size when the request carries no `size` option
pub const DEFAULT_VOLUME_SIZE: &str = "1G";

/// Build the volume config for a create request
///
/// Consumes the options and returns the ones left unclaimed; the `size`
/// option is claimed here. Other fields are copied verbatim, empty when the
/// option is absent.
pub fn build_volume_config(
    name: &str,
    storage_class: &str,
    mut opts: OptionSet,
    default_size: &str,
) -> Result<(VolumeConfig, OptionSet)> {
    let size_bytes = parse_volume_size(&opts, default_size)?;
    opts.claim(options::SIZE);

    let field = |keys: &str| opts.get_or(keys, "");

    let config = VolumeConfig {
        name: name.to_string(),
        size: size_bytes.to_string(),
        storage_class: storage_class.to_string(),
        protocol: Protocol::Any,
        access_mode: AccessMode::Any,
        space_reserve: field(options::SPACE_RESERVE),
        security_style: field(options::SECURITY_STYLE),
        split_on_clone: field(options::SPLIT_ON_CLONE),
        snapshot_policy: field(options::SNAPSHOT_POLICY),
        export_policy: field(options::EXPORT_POLICY),
        snapshot_dir: field(options::SNAPSHOT_DIR),
        unix_permissions: field(options::UNIX_PERMISSIONS),
        block_size: field(options::BLOCK_SIZE),
        file_system: field(options::FILE_SYSTEM),
        encryption: field(options::ENCRYPTION),
        clone_source_volume: field(options::CLONE_SOURCE_VOLUME),
        clone_source_snapshot: field(options::CLONE_SOURCE_SNAPSHOT),
    };

    Ok((config, opts))
}
