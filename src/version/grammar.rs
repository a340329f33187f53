//! Lexical grammar for distribution version strings.
//!
//! The pattern follows appendix B of PEP 440, with the post-release number
//! split into its shorthand (`1.0-3`) and labelled (`1.0.post3`) alternatives.

use crate::error::{Result, VersionError};
use regex::Regex;
use std::sync::LazyLock;

const VERSION_PATTERN: &str = r"
    v?
    (?:
        (?:(?P<epoch>[0-9]+)!)?                           # epoch
        (?P<release>[0-9]+(?:\.[0-9]+)*)                  # release segment
        (?P<pre>                                          # pre-release
            [-_\.]?
            (?P<pre_l>(a|b|c|rc|alpha|beta|pre|preview))
            [-_\.]?
            (?P<pre_n>[0-9]+)?
        )?
        (?P<post>                                         # post release
            (?:-(?P<post_n1>[0-9]+))
            |
            (?:
                [-_\.]?
                (?P<post_l>post|rev|r)
                [-_\.]?
                (?P<post_n2>[0-9]+)?
            )
        )?
        (?P<dev>                                          # dev release
            [-_\.]?
            (?P<dev_l>dev)
            [-_\.]?
            (?P<dev_n>[0-9]+)?
        )?
    )
    (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?       # local version
";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?xi)^\s*{VERSION_PATTERN}\s*$")).expect("static regex")
});

/// A qualifier segment split into label and number, e.g. `rc` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawQualifier<'a> {
    pub label: &'a str,
    pub number: Option<&'a str>,
}

/// The named groups of one successful grammar match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VersionParts<'a> {
    pub epoch: Option<&'a str>,
    pub release: &'a str,
    pub pre: Option<RawQualifier<'a>>,
    pub post: Option<RawQualifier<'a>>,
    pub dev: Option<RawQualifier<'a>>,
    pub local: Option<&'a str>,
}

/// Decompose `input` into its named groups.
pub(crate) fn match_version(input: &str) -> Result<VersionParts<'_>> {
    let caps = VERSION_RE
        .captures(input)
        .ok_or_else(|| VersionError::malformed(input, "does not match the version grammar"))?;

    let get = |name: &str| caps.name(name).map(|m| m.as_str());

    let pre = get("pre_l").map(|label| RawQualifier {
        label,
        number: get("pre_n"),
    });
    let post = if let Some(number) = get("post_n1") {
        Some(RawQualifier {
            label: "",
            number: Some(number),
        })
    } else {
        get("post_l").map(|label| RawQualifier {
            label,
            number: get("post_n2"),
        })
    };
    let dev = get("dev_l").map(|label| RawQualifier {
        label,
        number: get("dev_n"),
    });

    Ok(VersionParts {
        epoch: get("epoch"),
        release: get("release").unwrap_or_default(),
        pre,
        post,
        dev,
        local: get("local"),
    })
}

/// Whether `input` is shaped like a distribution version.
#[must_use]
pub fn is_version_like(input: &str) -> bool {
    VERSION_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_release() {
        let parts = match_version("1.2.3").unwrap();
        assert_eq!(parts.release, "1.2.3");
        assert_eq!(parts.epoch, None);
        assert!(parts.pre.is_none() && parts.post.is_none() && parts.dev.is_none());
    }

    #[test]
    fn test_all_groups() {
        let parts = match_version("  v2!1.0-RC.1.post2.dev3+ubuntu.1  ").unwrap();
        assert_eq!(parts.epoch, Some("2"));
        assert_eq!(parts.release, "1.0");
        assert_eq!(
            parts.pre,
            Some(RawQualifier {
                label: "RC",
                number: Some("1")
            })
        );
        assert_eq!(parts.post.map(|q| q.label), Some("post"));
        assert_eq!(parts.post.and_then(|q| q.number), Some("2"));
        assert_eq!(parts.dev.and_then(|q| q.number), Some("3"));
        assert_eq!(parts.local, Some("ubuntu.1"));
    }

    #[test]
    fn test_post_shorthand() {
        let parts = match_version("1.0-7").unwrap();
        assert_eq!(
            parts.post,
            Some(RawQualifier {
                label: "",
                number: Some("7")
            })
        );
    }

    #[test]
    fn test_unnumbered_qualifiers() {
        let parts = match_version("1.0a.dev").unwrap();
        assert_eq!(parts.pre.map(|q| q.number), Some(None));
        assert_eq!(parts.dev.map(|q| q.label), Some("dev"));
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", "v", "1..2", "1.2.", "abc", "1.0+", "1.0 beta 2", "1.0~rc1"] {
            let err = match_version(input).unwrap_err();
            assert!(err.is_malformed(), "{input:?} should be malformed");
        }
    }

    #[test]
    fn test_is_version_like() {
        assert!(is_version_like("0.2.3"));
        assert!(!is_version_like("gabcdef"));
    }
}
