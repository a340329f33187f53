//! Firmware versions derived from `git describe --tags --always --long --dirty`.
//!
//! The firmware's build system identifies a checkout as `vMAJOR.MINOR-DEPTH-gHASH`,
//! optionally suffixed with `-dirty`. A bare tag or a bare hash (no tag
//! reachable) is also accepted.
//!
//! Equality is reflexive and symmetric but **not guaranteed transitive**. The
//! rules apply in precedence order (raw text, then commit id, then release
//! tuple for exact tags, then the full build triple), and a development build
//! is judged by different fields than an exact tag, so `a == b` and `b == c`
//! do not imply `a == c` for arbitrary values. The comparison entry points are
//! plain methods rather than `PartialEq` for that reason.

use crate::error::{Result, VersionError};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const DIRTY_MARKER: &str = "dirty";

/// A parsed `git describe` string.
#[derive(Debug, Clone, Serialize)]
pub struct FirmwareVersion {
    pub raw: String,
    pub release: Vec<u64>,
    pub commit_depth: u64,
    pub commit_id: Option<String>,
    pub dirty: bool,
}

/// Right-hand side of a firmware comparison.
#[derive(Debug, Clone)]
pub enum FirmwareComparand {
    /// Another parsed firmware version
    Exact(FirmwareVersion),
    /// A bare release tuple, e.g. `(0, 12)`
    Release(Vec<u64>),
    /// A bare feature line number, read as `(line, depth 0)`
    Major(u64),
}

impl fmt::Display for FirmwareComparand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => write!(f, "{version}"),
            Self::Release(release) => write!(f, "release {release:?}"),
            Self::Major(line) => write!(f, "feature line {line}"),
        }
    }
}

impl FirmwareVersion {
    /// Parse a describe string.
    pub fn parse(describe: &str) -> Result<Self> {
        let raw = describe.trim();
        let mut dirty = false;
        let tokens: Vec<&str> = raw
            .split('-')
            .filter(|token| {
                let is_marker = *token == DIRTY_MARKER;
                dirty |= is_marker;
                !is_marker
            })
            .collect();

        let version = match tokens.as_slice() {
            [single] if single.is_empty() => {
                return Err(VersionError::malformed(raw, "empty describe string"));
            }
            [single] => match single.strip_prefix('v') {
                Some(tag) => Self {
                    raw: raw.to_string(),
                    release: parse_release(raw, tag)?,
                    commit_depth: 0,
                    commit_id: None,
                    dirty,
                },
                None => Self {
                    raw: raw.to_string(),
                    release: Vec::new(),
                    commit_depth: 0,
                    commit_id: Some((*single).to_string()),
                    dirty,
                },
            },
            [tag, depth, hash] => {
                let tag = tag.strip_prefix('v').unwrap_or(*tag);
                let commit_depth = depth.parse().map_err(|e| {
                    VersionError::malformed(raw, format!("commit depth '{depth}': {e}"))
                })?;
                if hash.is_empty() {
                    return Err(VersionError::malformed(raw, "empty commit id"));
                }
                Self {
                    raw: raw.to_string(),
                    release: parse_release(raw, tag)?,
                    commit_depth,
                    commit_id: Some((*hash).to_string()),
                    dirty,
                }
            }
            other => {
                return Err(VersionError::malformed(
                    raw,
                    format!("expected TAG-DEPTH-HASH, got {} fields", other.len()),
                ));
            }
        };
        Ok(version)
    }

    /// True when the checkout is anything other than an exact tag.
    #[must_use]
    pub const fn is_development(&self) -> bool {
        self.commit_depth != 0 || self.commit_id.is_some()
    }

    /// True for a bare-hash describe, when no tag was reachable.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        self.release.is_empty() && self.commit_id.is_some()
    }

    /// The feature line: the second release component, or 0.
    #[must_use]
    pub fn feature_line(&self) -> u64 {
        self.release.get(1).copied().unwrap_or(0)
    }

    /// Ordering key `(feature line, commit depth)`.
    #[must_use]
    pub fn ordering_key(&self) -> [u64; 2] {
        [self.feature_line(), self.commit_depth]
    }

    /// Identity comparison against another version or a release tuple.
    pub fn equals(&self, other: &FirmwareComparand) -> Result<bool> {
        match other {
            FirmwareComparand::Exact(other) => Ok(self.same_build(other)),
            FirmwareComparand::Release(release) => Ok(&self.release == release),
            FirmwareComparand::Major(_) => Err(VersionError::UnsupportedComparand {
                version: self.raw.clone(),
                relation: "equality",
                comparand: other.to_string(),
            }),
        }
    }

    /// Order by feature line, then commit depth.
    ///
    /// A bare line number `n` reads as `(n, 0)`; a release tuple is compared
    /// directly against the key.
    #[must_use]
    pub fn compare(&self, other: &FirmwareComparand) -> Ordering {
        let key = self.ordering_key();
        match other {
            FirmwareComparand::Exact(other) => key.cmp(&other.ordering_key()),
            FirmwareComparand::Release(release) => key.as_slice().cmp(release.as_slice()),
            FirmwareComparand::Major(line) => key.cmp(&[*line, 0]),
        }
    }

    fn same_build(&self, other: &Self) -> bool {
        if self.raw == other.raw {
            return true;
        }
        if let (Some(a), Some(b)) = (&self.commit_id, &other.commit_id) {
            if a == b {
                return true;
            }
        }
        if !self.is_development() && !other.is_development() {
            return self.release == other.release;
        }
        self.release == other.release
            && self.commit_depth == other.commit_depth
            && self.commit_id == other.commit_id
    }
}

impl FromStr for FirmwareVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_release(raw: &str, tag: &str) -> Result<Vec<u64>> {
    tag.split('.')
        .map(|segment| {
            segment.parse().map_err(|e| {
                VersionError::malformed(raw, format!("tag segment '{segment}': {e}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fw(s: &str) -> FirmwareVersion {
        FirmwareVersion::parse(s).unwrap()
    }

    fn exact(s: &str) -> FirmwareComparand {
        FirmwareComparand::Exact(fw(s))
    }

    #[test]
    fn test_parse_long_describe() {
        let version = fw("v1.2.3-0-gabcdef");
        assert_eq!(version.release, vec![1, 2, 3]);
        assert_eq!(version.commit_depth, 0);
        assert_eq!(version.commit_id.as_deref(), Some("gabcdef"));
        assert!(!version.dirty);
        assert!(version.is_development());
    }

    #[test]
    fn test_parse_dirty() {
        let version = fw("v1.2-5-gabc123-dirty\n");
        assert_eq!(version.release, vec![1, 2]);
        assert_eq!(version.commit_depth, 5);
        assert!(version.dirty);
        assert_eq!(version.raw, "v1.2-5-gabc123-dirty");
    }

    #[test]
    fn test_parse_bare_tag_and_hash() {
        let tag = fw("v0.12");
        assert_eq!(tag.release, vec![0, 12]);
        assert!(!tag.is_development());

        let hash = fw("4f1c2e9-dirty");
        assert!(hash.is_untagged());
        assert!(hash.dirty);
        assert_eq!(hash.commit_id.as_deref(), Some("4f1c2e9"));
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["", "v1.2-5", "v1.2-x-gabc", "v1.x-3-gabc", "a-b-c-d", "v1.2-3-"] {
            let err = FirmwareVersion::parse(input).unwrap_err();
            assert!(err.is_malformed(), "{input:?}");
        }
    }

    #[test]
    fn test_equality_rules() {
        let a = fw("v0.12.0-10-gabc");
        // raw match
        assert!(a.equals(&exact("v0.12.0-10-gabc")).unwrap());
        // commit id match across different tags
        assert!(a.equals(&exact("v0.11-40-gabc")).unwrap());
        // exact tags compare release only
        assert!(fw("v0.12").equals(&exact("v0.12-dirty")).unwrap());
        assert!(!fw("v0.12").equals(&exact("v0.13")).unwrap());
        // development vs tag falls back to the full triple
        assert!(!a.equals(&exact("v0.12.0")).unwrap());
    }

    #[test]
    fn test_equality_is_reflexive_and_symmetric() {
        let inputs = [
            "v0.11-40-gabc",
            "v0.12-3-gabc",
            "v0.12-3-gdef-dirty",
            "v0.12",
            "v0.12-dirty",
            "abc",
        ];
        for a in inputs {
            assert!(fw(a).equals(&exact(a)).unwrap(), "{a} == {a}");
            for b in inputs {
                assert_eq!(
                    fw(a).equals(&exact(b)).unwrap(),
                    fw(b).equals(&exact(a)).unwrap(),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_equality_against_release_and_major() {
        let version = fw("v0.12.0");
        assert!(version
            .equals(&FirmwareComparand::Release(vec![0, 12, 0]))
            .unwrap());
        let err = version.equals(&FirmwareComparand::Major(12)).unwrap_err();
        assert!(matches!(err, VersionError::UnsupportedComparand { .. }));
    }

    #[test]
    fn test_ordering() {
        let version = fw("v0.12.0-45-gdeadbee");
        assert_eq!(version.ordering_key(), [12, 45]);
        assert_eq!(version.compare(&exact("v0.12.0-3-gabc")), Ordering::Greater);
        assert_eq!(version.compare(&exact("v1.13-0-gabc")), Ordering::Less);
        assert_eq!(version.compare(&FirmwareComparand::Major(12)), Ordering::Greater);
        assert_eq!(version.compare(&FirmwareComparand::Major(13)), Ordering::Less);
        assert_eq!(
            version.compare(&FirmwareComparand::Release(vec![12, 45])),
            Ordering::Equal
        );
        assert_eq!(fw("v0.12").compare(&FirmwareComparand::Major(12)), Ordering::Equal);
        assert_eq!(fw("abc1234").feature_line(), 0);
    }
}
