//! Volume Size Parsing
//!
//! Converts human-readable sizes ("100Gi", "1.5T", "10") into byte counts.

use crate::error::{Error, Result};
use crate::options::{OptionSet, SIZE};

const GIB: u64 = 1024 * 1024 * 1024;

/// Parse capacity string (e.g., "100Gi", "1Ti") to bytes
pub fn parse_capacity(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::CapacityParse("empty capacity string".into()));
    }

    // Find where the number ends and unit begins
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    let (num_str, unit_str) = s.split_at(num_end);
    let unit_str = unit_str.trim();

    let num: f64 = num_str
        .parse()
        .map_err(|_| Error::CapacityParse(format!("invalid number: {}", num_str)))?;

    let multiplier: u64 = match unit_str.to_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" | "KI" | "KIB" => 1024,
        "M" | "MB" | "MI" | "MIB" => 1024 * 1024,
        "G" | "GB" | "GI" | "GIB" => GIB,
        "T" | "TB" | "TI" | "TIB" => GIB * 1024,
        "P" | "PB" | "PI" | "PIB" => GIB * 1024 * 1024,
        _ => {
            return Err(Error::CapacityParse(format!(
                "unknown unit: {}",
                unit_str
            )))
        }
    };

    let bytes = num * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(Error::CapacityParse(format!("capacity out of range: {}", s)));
    }

    Ok(bytes as u64)
}

/// Resolve the requested volume size in bytes
///
/// Reads the `size` option, using `default_size` when it is absent or empty.
/// A number without a unit is a number of GiB, matching
/// `docker volume create -o size=10`.
pub fn parse_volume_size(options: &OptionSet, default_size: &str) -> Result<u64> {
    let requested = options
        .lookup(SIZE)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_size)
        .trim();

    let invalid = |reason: String| Error::VolumeSize {
        value: requested.to_string(),
        reason,
    };

    let unitless = requested.chars().all(|c| c.is_ascii_digit() || c == '.');

    let bytes = match requested.parse::<u64>() {
        Ok(gib) => gib
            .checked_mul(GIB)
            .ok_or_else(|| invalid("size out of range".into()))?,
        Err(_) if unitless => parse_capacity(&format!("{}G", requested))
            .map_err(|e| invalid(e.to_string()))?,
        Err(_) => parse_capacity(requested).map_err(|e| invalid(e.to_string()))?,
    };

    if bytes == 0 {
        return Err(invalid("volume size must be greater than zero".into()));
    }

    Ok(bytes)
}
