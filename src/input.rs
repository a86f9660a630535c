//! Loading of share files.
//!
//! A share file is a JSON object holding the threshold parameters under `keys` and one
//! entry per share, keyed by the share index:
//!
//! ```json
//! {
//!     "keys": { "n": 3, "k": 2 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": 16, "value": "7" },
//!     "3": { "base": "10", "value": "10" }
//! }
//! ```
//!
//! Missing or invalid `keys` abort the load. A malformed share entry only rejects
//! that entry, so a single bad share never prevents reconstruction from the others.
//! Keys spelling the same index (`"1"` and `"01"`) keep the first one in key order
//! and reject the others.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::sss::Share;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unable to read share file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed share file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid threshold: k = {k} must be between 1 and n = {n}")]
    InvalidThreshold { n: usize, k: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Keys {
    /// Total number of shares handed out.
    pub n: usize,
    /// Number of shares required to reconstruct.
    pub k: usize,
}

#[derive(Debug, Deserialize)]
struct RawShareFile {
    keys: Keys,
    #[serde(flatten)]
    entries: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawShare {
    base: RawBase,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBase {
    Number(i64),
    Text(String),
}

/// An entry of the share file that could not be turned into a [`Share`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedEntry {
    pub key: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareFile {
    pub n: usize,
    pub k: usize,
    /// Valid share records, ascending by index.
    pub shares: Vec<Share>,
    pub rejected: Vec<RejectedEntry>,
}

impl ShareFile {
    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        let raw: RawShareFile = serde_json::from_str(content)?;
        let Keys { n, k } = raw.keys;
        if k == 0 || k > n {
            return Err(InputError::InvalidThreshold { n, k });
        }

        let mut shares = Vec::with_capacity(raw.entries.len());
        let mut rejected = Vec::new();
        let mut seen_indices = HashSet::new();
        for (key, entry) in raw.entries {
            let parsed = parse_share(&key, entry).and_then(|share| {
                if seen_indices.insert(share.index) {
                    Ok(share)
                } else {
                    Err(format!("duplicate share index {}", share.index))
                }
            });
            match parsed {
                Ok(share) => shares.push(share),
                Err(reason) => {
                    tracing::warn!("Skipping share entry {key:?}: {reason}");
                    rejected.push(RejectedEntry { key, reason });
                }
            }
        }
        shares.sort_by_key(|s| s.index);

        let found = shares.len() + rejected.len();
        if found != n {
            tracing::warn!("Share file declares n = {n} but contains {found} share entries");
        }

        Ok(Self {
            n,
            k,
            shares,
            rejected,
        })
    }
}

pub fn load_share_file(path: &Path) -> Result<ShareFile, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    ShareFile::from_json_str(&content)
}

fn parse_share(key: &str, entry: serde_json::Value) -> Result<Share, String> {
    let index = key
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("share index is not a positive integer: {e}"))?;
    if index == 0 {
        return Err("share index must be positive".to_string());
    }

    let raw: RawShare = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    let base = match raw.base {
        RawBase::Number(base) => base,
        RawBase::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("base {text:?} is not an integer: {e}"))?,
    };
    if base <= 0 {
        return Err(format!("base must be positive, got {base}"));
    }
    let base = u32::try_from(base).map_err(|_| format!("base {base} is too large"))?;

    Ok(Share::new(index, base, raw.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share_file() {
        let file = ShareFile::from_json_str(
            r#"{
                "keys": { "n": 3, "k": 2 },
                "3": { "base": "10", "value": "10" },
                "1": { "base": 10, "value": "4" },
                "2": { "base": " 16 ", "value": "7" }
            }"#,
        )
        .unwrap();
        assert_eq!((file.n, file.k), (3, 2));
        assert_eq!(
            file.shares,
            vec![
                Share::new(1, 10, "4"),
                Share::new(2, 16, "7"),
                Share::new(3, 10, "10"),
            ]
        );
        assert!(file.rejected.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let file = ShareFile::from_json_str(
            r#"{
                "keys": { "n": 7, "k": 1 },
                "1": { "base": "10", "value": "4" },
                "two": { "base": "10", "value": "7" },
                "0": { "base": "10", "value": "7" },
                "3": { "value": "10" },
                "4": { "base": "10" },
                "5": { "base": 0, "value": "1" },
                "6": { "base": "-2", "value": "1" },
                "7": "not an object"
            }"#,
        )
        .unwrap();
        assert_eq!(file.shares, vec![Share::new(1, 10, "4")]);
        let mut keys: Vec<&str> = file.rejected.iter().map(|r| r.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["0", "3", "4", "5", "6", "7", "two"]);
    }

    #[test]
    fn test_duplicate_index_keeps_first_key() {
        let file = ShareFile::from_json_str(
            r#"{
                "keys": { "n": 3, "k": 2 },
                "1": { "base": "10", "value": "4" },
                "01": { "base": "16", "value": "4" },
                "2": { "base": "10", "value": "7" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            file.shares,
            vec![Share::new(1, 16, "4"), Share::new(2, 10, "7")]
        );
        assert_eq!(
            file.rejected,
            vec![RejectedEntry {
                key: "1".to_string(),
                reason: "duplicate share index 1".to_string()
            }]
        );
    }

    #[test]
    fn test_unsupported_base_left_to_decoder() {
        let file = ShareFile::from_json_str(
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": 36, "value": "Z" } }"#,
        )
        .unwrap();
        assert_eq!(file.shares, vec![Share::new(1, 36, "Z")]);
    }

    #[test]
    fn test_missing_keys_is_fatal() {
        let err = ShareFile::from_json_str(r#"{ "1": { "base": 10, "value": "4" } }"#)
            .unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
        assert!(err.to_string().contains("keys"));

        let err = ShareFile::from_json_str(r#"{ "keys": { "n": 3 } }"#).unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
        assert!(err.to_string().contains("`k`"));

        let err = ShareFile::from_json_str("not json").unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
    }

    #[test]
    fn test_invalid_threshold() {
        let err = ShareFile::from_json_str(r#"{ "keys": { "n": 3, "k": 0 } }"#).unwrap_err();
        assert!(matches!(err, InputError::InvalidThreshold { n: 3, k: 0 }));
        let err = ShareFile::from_json_str(r#"{ "keys": { "n": 2, "k": 3 } }"#).unwrap_err();
        assert!(matches!(err, InputError::InvalidThreshold { n: 2, k: 3 }));
        let err = ShareFile::from_json_str(r#"{ "keys": { "n": 2, "k": -1 } }"#).unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
    }

    #[test]
    fn test_unreadable_file() {
        let path = Path::new("/definitely/not/a/share/file.json");
        let err = load_share_file(path).unwrap_err();
        assert!(matches!(err, InputError::Unreadable { .. }));
        assert!(err.to_string().contains("file.json"));
    }
}
