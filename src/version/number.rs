//! Distribution version values.
//!
//! A [`VersionNumber`] is either a structured release parsed from the version
//! grammar, or a literal string kept verbatim. Literal values only ever take
//! part in exact string comparisons.

use super::grammar::{match_version, RawQualifier};
use crate::error::{Result, VersionError};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A pre, post or dev qualifier: a lowercase label and an optional number.
///
/// Labels are kept as written (`alpha` and `a` stay distinct). The `1.0-3`
/// post-release shorthand is recorded under the `post` label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    pub label: String,
    pub number: Option<u64>,
}

impl Qualifier {
    fn from_raw(input: &str, raw: RawQualifier<'_>, implicit_label: &str) -> Result<Self> {
        let label = if raw.label.is_empty() {
            implicit_label.to_string()
        } else {
            raw.label.to_ascii_lowercase()
        };
        let number = raw.number.map(|n| parse_segment(input, n)).transpose()?;
        Ok(Self { label, number })
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        if let Some(number) = self.number {
            write!(f, "{number}")?;
        }
        Ok(())
    }
}

/// A version that matched the grammar.
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<Qualifier>,
    pub post: Option<Qualifier>,
    pub dev: Option<Qualifier>,
    pub local: Option<String>,
    source: String,
}

impl ReleaseVersion {
    /// Build a plain release, e.g. `ReleaseVersion::new([1, 2, 3])`.
    pub fn new(release: impl Into<Vec<u64>>) -> Self {
        let release = release.into();
        let source = join_release(&release);
        Self {
            epoch: 0,
            release,
            pre: None,
            post: None,
            dev: None,
            local: None,
            source,
        }
    }

    /// The trimmed text this version was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when any pre, post or dev qualifier is present.
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.pre.is_some() || self.post.is_some() || self.dev.is_some()
    }

    /// Exact field equality. Release segments are not zero-padded and local
    /// segments do not participate.
    #[must_use]
    pub fn same_release(&self, other: &Self) -> bool {
        self.epoch == other.epoch
            && self.release == other.release
            && self.pre == other.pre
            && self.post == other.post
            && self.dev == other.dev
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        f.write_str(&join_release(&self.release))?;
        if let Some(pre) = &self.pre {
            write!(f, "{pre}")?;
        }
        if let Some(post) = &self.post {
            write!(f, ".{post}")?;
        }
        if let Some(dev) = &self.dev {
            write!(f, ".{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

/// A parsed distribution version.
#[derive(Debug, Clone)]
pub enum VersionNumber {
    /// A version that matched the grammar
    Structured(ReleaseVersion),
    /// Text kept verbatim, compared only as a string
    Literal(String),
}

impl VersionNumber {
    /// Parse a version string, failing with `MalformedVersion` if it does not
    /// match the grammar.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts = match_version(trimmed)?;

        let epoch = parts
            .epoch
            .map(|e| parse_segment(trimmed, e))
            .transpose()?
            .unwrap_or(0);
        let release = parts
            .release
            .split('.')
            .map(|segment| parse_segment(trimmed, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::Structured(ReleaseVersion {
            epoch,
            release,
            pre: parts
                .pre
                .map(|q| Qualifier::from_raw(trimmed, q, "pre"))
                .transpose()?,
            post: parts
                .post
                .map(|q| Qualifier::from_raw(trimmed, q, "post"))
                .transpose()?,
            dev: parts
                .dev
                .map(|q| Qualifier::from_raw(trimmed, q, "dev"))
                .transpose()?,
            local: parts.local.map(str::to_ascii_lowercase),
            source: trimmed.to_string(),
        }))
    }

    /// Parse a version string, keeping it as a literal if it does not match
    /// the grammar.
    #[must_use]
    pub fn parse_or_literal(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|err| {
            tracing::debug!("Keeping version as literal: {err}");
            Self::Literal(input.trim().to_string())
        })
    }

    /// A literal version, never parsed.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// The text used for `===` comparisons.
    #[must_use]
    pub fn literal_form(&self) -> &str {
        match self {
            Self::Structured(version) => version.source(),
            Self::Literal(text) => text,
        }
    }

    #[must_use]
    pub const fn as_structured(&self) -> Option<&ReleaseVersion> {
        match self {
            Self::Structured(version) => Some(version),
            Self::Literal(_) => None,
        }
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Exact literal string match.
    #[must_use]
    pub fn exact(&self, other: &Self) -> bool {
        self.literal_form() == other.literal_form()
    }

    /// Structural equality; degrades to literal equality if either side is
    /// literal.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Structured(a), Self::Structured(b)) => a.same_release(b),
            _ => self.exact(other),
        }
    }

    /// Order this value, read as a requirement, against a candidate.
    ///
    /// Returns `None` when no ordering is defined: either side is literal, or
    /// the requirement carries a pre, post or dev qualifier. The requirement
    /// release is aligned to the candidate's length before comparing.
    #[must_use]
    pub fn requirement_cmp(&self, candidate: &Self) -> Option<Ordering> {
        let (Self::Structured(req), Self::Structured(cand)) = (self, candidate) else {
            return None;
        };
        if req.is_qualified() {
            return None;
        }
        let ordering = req.epoch.cmp(&cand.epoch).then_with(|| {
            align(&req.release, cand.release.len())
                .as_slice()
                .cmp(cand.release.as_slice())
        });
        Some(ordering)
    }

    /// Requirement strictly below the candidate.
    #[must_use]
    pub fn precedes(&self, candidate: &Self) -> bool {
        self.requirement_cmp(candidate) == Some(Ordering::Less)
    }

    /// Requirement strictly above the candidate.
    #[must_use]
    pub fn follows(&self, candidate: &Self) -> bool {
        self.requirement_cmp(candidate) == Some(Ordering::Greater)
    }

    /// Requirement equal to or below the candidate.
    #[must_use]
    pub fn precedes_or_equals(&self, candidate: &Self) -> bool {
        self.equals(candidate)
            || matches!(
                self.requirement_cmp(candidate),
                Some(Ordering::Less | Ordering::Equal)
            )
    }

    /// Requirement equal to or above the candidate.
    #[must_use]
    pub fn follows_or_equals(&self, candidate: &Self) -> bool {
        self.equals(candidate)
            || matches!(
                self.requirement_cmp(candidate),
                Some(Ordering::Greater | Ordering::Equal)
            )
    }
}

impl FromStr for VersionNumber {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ReleaseVersion> for VersionNumber {
    fn from(version: ReleaseVersion) -> Self {
        Self::Structured(version)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(version) => version.fmt(f),
            Self::Literal(text) => f.write_str(text),
        }
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Zero-pad or truncate `release` to exactly `target_len` segments.
#[must_use]
pub fn align(release: &[u64], target_len: usize) -> Vec<u64> {
    let mut aligned: Vec<u64> = release.iter().copied().take(target_len).collect();
    aligned.resize(target_len, 0);
    aligned
}

fn parse_segment(input: &str, segment: &str) -> Result<u64> {
    segment
        .parse()
        .map_err(|e| VersionError::malformed(input, format!("segment '{segment}': {e}")))
}

fn join_release(release: &[u64]) -> String {
    release
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_align() {
        let release = [1, 2, 3, 4];
        assert_eq!(align(&release, 3), vec![1, 2, 3]);
        assert_eq!(align(&release, 6), vec![1, 2, 3, 4, 0, 0]);
        assert_eq!(align(&release, 4), vec![1, 2, 3, 4]);
        assert_eq!(align(&release, 1), vec![1]);
    }

    #[test]
    fn test_parse_fields() {
        let parsed = v("2!1.0rc1.post2.dev3+Local.7");
        let version = parsed.as_structured().unwrap();
        assert_eq!(version.epoch, 2);
        assert_eq!(version.release, vec![1, 0]);
        assert_eq!(version.pre.as_ref().unwrap().to_string(), "rc1");
        assert_eq!(version.post.as_ref().unwrap().to_string(), "post2");
        assert_eq!(version.dev.as_ref().unwrap().to_string(), "dev3");
        assert_eq!(version.local.as_deref(), Some("local.7"));
        assert_eq!(version.source(), "2!1.0rc1.post2.dev3+Local.7");
    }

    #[test]
    fn test_leading_v_and_whitespace() {
        let parsed = v("  v0.2.3 ");
        assert_eq!(parsed.as_structured().unwrap().release, vec![0, 2, 3]);
        assert_eq!(parsed.literal_form(), "v0.2.3");
    }

    #[test]
    fn test_post_shorthand_normalized_label() {
        let parsed = v("1.0-4");
        let post = parsed.as_structured().unwrap().post.clone().unwrap();
        assert_eq!(post.label, "post");
        assert_eq!(post.number, Some(4));
    }

    #[test]
    fn test_overflow_is_malformed() {
        let err = VersionNumber::parse("1.99999999999999999999999").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_or_literal() {
        assert!(VersionNumber::parse_or_literal("not-a-version").is_literal());
        assert!(!VersionNumber::parse_or_literal("1.0").is_literal());
    }

    #[test]
    fn test_equality_is_not_padded() {
        assert!(v("1.2").equals(&v("1.2")));
        assert!(!v("1.2").equals(&v("1.2.0")));
        assert!(!v("1.0rc1").equals(&v("1.0")));
        assert!(v("1.0").equals(&v("v1.0")));
        assert!(v("1.0+a").equals(&v("1.0+b")));
    }

    #[test]
    fn test_literal_equality_compares_both_operands() {
        let literal = VersionNumber::literal("1.0");
        assert!(literal.equals(&v("1.0")));
        assert!(!literal.equals(&v("1.0.0")));
        assert!(!VersionNumber::literal("abc").equals(&VersionNumber::literal("abd")));
    }

    #[test]
    fn test_requirement_ordering_aligns_release() {
        assert_eq!(v("1.2").requirement_cmp(&v("1.2.0")), Some(Ordering::Equal));
        assert_eq!(v("1.2.5").requirement_cmp(&v("1.3")), Some(Ordering::Less));
        assert_eq!(v("1!0.1").requirement_cmp(&v("9.9")), Some(Ordering::Greater));
        assert!(v("1.0").precedes_or_equals(&v("1.0.0")));
    }

    #[test]
    fn test_qualified_requirement_is_unorderable() {
        assert_eq!(v("1.0rc1").requirement_cmp(&v("2.0")), None);
        assert!(!v("1.0rc1").precedes(&v("2.0")));
        assert!(!v("1.0.post1").follows(&v("0.1")));
        // Equality still holds for the non-strict relations
        assert!(v("1.0rc1").precedes_or_equals(&v("1.0rc1")));
    }

    #[test]
    fn test_display_includes_only_present_segments() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("1!2.0").to_string(), "1!2.0");
        assert_eq!(v("1.0-RC-2").to_string(), "1.0rc2");
        assert_eq!(v("1.0-3").to_string(), "1.0.post3");
        assert_eq!(v("1.0.dev").to_string(), "1.0.dev");
        assert_eq!(VersionNumber::literal("weird").to_string(), "weird");
        assert_eq!(ReleaseVersion::new([4, 5]).to_string(), "4.5");
    }
}
