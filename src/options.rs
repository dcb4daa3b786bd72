//! Volume Creation Options
//!
//! The untyped `-o key=value` options supplied with a volume create request.
//! Keys are case-sensitive. Well-known keys may have several accepted
//! spellings, written as a single alias key such as `fstype|fileSystemType`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between alternative spellings of one option key
pub const ALIAS_SEPARATOR: char = '|';

// =============================================================================
// Well-Known Keys
// =============================================================================

pub const SIZE: &str = "size";
pub const POOL: &str = "aggregate|pool";
pub const SPACE_RESERVE: &str = "spaceReserve";
pub const SECURITY_STYLE: &str = "securityStyle";
pub const SPLIT_ON_CLONE: &str = "splitOnClone";
pub const SNAPSHOT_POLICY: &str = "snapshotPolicy";
pub const EXPORT_POLICY: &str = "exportPolicy";
pub const SNAPSHOT_DIR: &str = "snapshotDir";
pub const UNIX_PERMISSIONS: &str = "unixPermissions";
pub const BLOCK_SIZE: &str = "blocksize";
pub const FILE_SYSTEM: &str = "fstype|fileSystemType";
pub const ENCRYPTION: &str = "encryption";
pub const CLONE_SOURCE_VOLUME: &str = "from";
pub const CLONE_SOURCE_SNAPSHOT: &str = "fromSnapshot";

// =============================================================================
// Option Set
// =============================================================================

/// Caller-supplied volume options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(BTreeMap<String, String>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Exact-key lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up an alias key
    ///
    /// The literal combined key is checked first, then each alternative in
    /// order. Returns the first value present.
    pub fn lookup(&self, keys: &str) -> Option<&str> {
        if let Some(value) = self.get(keys) {
            return Some(value);
        }
        keys.split(ALIAS_SEPARATOR)
            .filter(|k| !k.is_empty())
            .find_map(|k| self.get(k))
    }

    /// Look up an alias key, falling back to `default` when absent
    pub fn get_or(&self, keys: &str, default: &str) -> String {
        self.lookup(keys).unwrap_or(default).to_string()
    }

    /// Remove an alias key (the combined spelling and every alternative)
    ///
    /// Returns the value [`lookup`](Self::lookup) would have returned.
    pub fn claim(&mut self, keys: &str) -> Option<String> {
        let claimed = self.lookup(keys).map(str::to_string);
        self.0.remove(keys);
        for key in keys.split(ALIAS_SEPARATOR) {
            self.0.remove(key);
        }
        claimed
    }

    pub fn contains(&self, keys: &str) -> bool {
        self.lookup(keys).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a `key=value` command line argument
    pub fn parse_pair(arg: &str) -> Result<(String, String)> {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            Error::Configuration(format!("invalid option {:?}, expected key=value", arg))
        })?;
        if key.is_empty() {
            return Err(Error::Configuration(format!(
                "invalid option {:?}, empty key",
                arg
            )));
        }
        Ok((key.to_string(), value.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for OptionSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl IntoIterator for OptionSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup() {
        let opts: OptionSet = [("fileSystemType", "xfs")].into_iter().collect();
        assert_eq!(opts.lookup(FILE_SYSTEM), Some("xfs"));

        let opts: OptionSet = [("fstype", "ext4"), ("fileSystemType", "xfs")]
            .into_iter()
            .collect();
        assert_eq!(opts.lookup(FILE_SYSTEM), Some("ext4"));
    }

    #[test]
    fn test_combined_key_wins() {
        let opts: OptionSet = [("aggregate|pool", "pool1"), ("pool", "pool2")]
            .into_iter()
            .collect();
        assert_eq!(opts.lookup(POOL), Some("pool1"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let opts: OptionSet = [("SIZE", "10G")].into_iter().collect();
        assert_eq!(opts.lookup(SIZE), None);
        assert_eq!(opts.get_or(SIZE, "1G"), "1G");
    }

    #[test]
    fn test_claim_removes_all_spellings() {
        let mut opts: OptionSet = [("fstype", "ext4"), ("fileSystemType", "xfs"), ("a", "b")]
            .into_iter()
            .collect();
        assert_eq!(opts.claim(FILE_SYSTEM), Some("ext4".to_string()));
        assert!(!opts.contains(FILE_SYSTEM));
        assert_eq!(opts.len(), 1);
        assert_eq!(opts.claim(FILE_SYSTEM), None);
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            OptionSet::parse_pair("size=10G").unwrap(),
            ("size".to_string(), "10G".to_string())
        );
        assert_eq!(
            OptionSet::parse_pair("minIOPS=int:500").unwrap(),
            ("minIOPS".to_string(), "int:500".to_string())
        );
        assert_eq!(
            OptionSet::parse_pair("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(OptionSet::parse_pair("size").is_err());
        assert!(OptionSet::parse_pair("=10G").is_err());
    }
}
