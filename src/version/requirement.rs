//! Requirement specifiers: an operator paired with a version.

use super::number::VersionNumber;
use crate::error::{Result, VersionError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of `===` `==` `!=` `>=` `>` `<=` `<` `~=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=== text`, arbitrary string equality
    ExactlyEqual,
    /// `== 1.2.3`
    Equal,
    /// `!= 1.2.3`
    NotEqual,
    /// `>= 1.2.3`
    GreaterThanEqual,
    /// `> 1.2.3`
    GreaterThan,
    /// `<= 1.2.3`
    LessThanEqual,
    /// `< 1.2.3`
    LessThan,
    /// `~= 1.2`, recognized but never evaluated
    Compatible,
}

impl Operator {
    /// Longest tokens first so prefix matching picks `===` over `==`.
    const TOKENS: [(&'static str, Self); 8] = [
        ("===", Self::ExactlyEqual),
        ("==", Self::Equal),
        ("!=", Self::NotEqual),
        (">=", Self::GreaterThanEqual),
        ("<=", Self::LessThanEqual),
        ("~=", Self::Compatible),
        (">", Self::GreaterThan),
        ("<", Self::LessThan),
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactlyEqual => "===",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterThanEqual => ">=",
            Self::GreaterThan => ">",
            Self::LessThanEqual => "<=",
            Self::LessThan => "<",
            Self::Compatible => "~=",
        }
    }

    /// Split a leading operator token off `input`.
    fn split_prefix(input: &str) -> Option<(Self, &str)> {
        Self::TOKENS
            .iter()
            .find_map(|(token, op)| input.strip_prefix(token).map(|rest| (*op, rest)))
    }
}

impl FromStr for Operator {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        Self::TOKENS
            .iter()
            .find(|(candidate, _)| *candidate == token)
            .map(|(_, op)| *op)
            .ok_or_else(|| VersionError::unknown_operator(token))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constraint a candidate version must satisfy, e.g. `>= 1.2`.
#[derive(Debug, Clone)]
pub struct RequirementSpecifier {
    pub operator: Operator,
    pub version: VersionNumber,
}

impl RequirementSpecifier {
    pub const fn new(operator: Operator, version: VersionNumber) -> Self {
        Self { operator, version }
    }

    /// Build a specifier from an operator token and a version string.
    ///
    /// `===` accepts arbitrary text; every other operator requires the
    /// version to match the grammar.
    pub fn from_parts(operator: &str, version: &str) -> Result<Self> {
        let operator: Operator = operator.parse()?;
        let version = match operator {
            Operator::ExactlyEqual => VersionNumber::parse_or_literal(version),
            _ => VersionNumber::parse(version)?,
        };
        Ok(Self { operator, version })
    }

    /// Whether `candidate` satisfies this requirement.
    ///
    /// Comparison operators read inverted on the requirement side: `>= 1.2`
    /// holds when the requirement version is at or below the candidate.
    pub fn satisfied_by(&self, candidate: &VersionNumber) -> Result<bool> {
        let req = &self.version;
        let satisfied = match self.operator {
            Operator::ExactlyEqual => req.exact(candidate),
            Operator::Equal => req.equals(candidate),
            Operator::NotEqual => !req.equals(candidate),
            Operator::GreaterThanEqual => req.precedes_or_equals(candidate),
            Operator::GreaterThan => req.precedes(candidate),
            Operator::LessThanEqual => req.follows_or_equals(candidate),
            Operator::LessThan => req.follows(candidate),
            Operator::Compatible => {
                return Err(VersionError::UnsupportedOperator {
                    operator: self.operator.to_string(),
                })
            }
        };
        Ok(satisfied)
    }
}

impl FromStr for RequirementSpecifier {
    type Err = VersionError;

    /// Parse `">=1.0"` or `"=== 1.0-custom"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (operator, rest) = Operator::split_prefix(trimmed).ok_or_else(|| {
            let token: String = trimmed
                .chars()
                .take_while(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
                .collect();
            VersionError::unknown_operator(if token.is_empty() {
                trimmed
            } else {
                token.as_str()
            })
        })?;
        Self::from_parts(operator.as_str(), rest)
    }
}

impl fmt::Display for RequirementSpecifier {
    /// `===` prints the text it compares; other operators print the
    /// normalized version.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::ExactlyEqual => {
                write!(f, "{}{}", self.operator, self.version.literal_form())
            }
            _ => write!(f, "{}{}", self.operator, self.version),
        }
    }
}

impl Serialize for RequirementSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a comma-separated specifier list such as `>=1.0, !=1.5`.
///
/// An empty or whitespace-only list yields no specifiers.
pub fn parse_specifiers(input: &str) -> Result<Vec<RequirementSpecifier>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> RequirementSpecifier {
        s.parse().unwrap()
    }

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_operator_tokens() {
        for token in ["===", "==", "!=", ">=", ">", "<=", "<", "~="] {
            let op: Operator = token.parse().unwrap();
            assert_eq!(op.as_str(), token);
        }
    }

    #[test]
    fn test_unknown_operator() {
        for token in ["=>", "=", "<>", "^", ""] {
            let err = token.parse::<Operator>().unwrap_err();
            assert!(matches!(err, VersionError::UnknownOperator { .. }), "{token:?}");
        }
        let err = "=> 1.0".parse::<RequirementSpecifier>().unwrap_err();
        assert!(matches!(err, VersionError::UnknownOperator { ref operator } if operator == "=>"));
    }

    #[test]
    fn test_greater_equal_table() {
        let req = spec(">= 1.2.0");
        assert!(req.satisfied_by(&v("1.2.0")).unwrap());
        assert!(!req.satisfied_by(&v("1.1.9")).unwrap());
        assert!(req.satisfied_by(&v("1.3.0")).unwrap());
    }

    #[test]
    fn test_strict_and_upper_bounds() {
        assert!(spec(">1.2").satisfied_by(&v("1.2.1")).unwrap());
        assert!(!spec(">1.2").satisfied_by(&v("1.2")).unwrap());
        assert!(spec("<2").satisfied_by(&v("1.9.9")).unwrap());
        assert!(!spec("<2").satisfied_by(&v("2.0")).unwrap());
        assert!(spec("<=2.0").satisfied_by(&v("2.0")).unwrap());
        assert!(!spec("<=2.0").satisfied_by(&v("2.0.1")).unwrap());
    }

    #[test]
    fn test_equal_does_not_pad() {
        let req = spec("== 1.0");
        assert!(req.satisfied_by(&v("1.0")).unwrap());
        assert!(!req.satisfied_by(&v("1.0.0")).unwrap());
        assert!(spec("!= 1.0").satisfied_by(&v("1.0.0")).unwrap());
    }

    #[test]
    fn test_exactly_equal_is_literal() {
        let req = spec("=== 1.0");
        assert!(req.satisfied_by(&v("1.0")).unwrap());
        assert!(!req.satisfied_by(&v("1.0.0")).unwrap());
        assert!(!req.satisfied_by(&v("v1.0")).unwrap());

        let custom = spec("===1.0-custom_build");
        assert!(custom.version.is_literal());
        assert!(custom
            .satisfied_by(&VersionNumber::parse_or_literal("1.0-custom_build"))
            .unwrap());
    }

    #[test]
    fn test_qualified_requirement_never_orders() {
        let req = spec("> 1.0rc1");
        for candidate in ["0.1", "1.0", "1.0rc1", "1.0rc2", "2.0", "100!1"] {
            assert!(!req.satisfied_by(&v(candidate)).unwrap(), "{candidate}");
        }
    }

    #[test]
    fn test_compatible_is_unsupported() {
        let req = spec("~= 1.0");
        let err = req.satisfied_by(&v("1.0")).unwrap_err();
        assert!(matches!(err, VersionError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_literal_candidate_never_orders() {
        let candidate = VersionNumber::literal("nightly");
        assert!(!spec(">= 1.0").satisfied_by(&candidate).unwrap());
        assert!(!spec("< 1.0").satisfied_by(&candidate).unwrap());
        assert!(spec("!= 1.0").satisfied_by(&candidate).unwrap());
    }

    #[test]
    fn test_malformed_requirement_version() {
        let err = ">= not.a.version".parse::<RequirementSpecifier>().unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_specifiers() {
        let specs = parse_specifiers(">=1.0, !=1.5").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].to_string(), ">=1.0");
        assert_eq!(specs[1].operator, Operator::NotEqual);
        assert!(parse_specifiers("  ").unwrap().is_empty());
    }

    #[test]
    fn test_exactly_equal_display_keeps_compared_text() {
        let candidate = v("1.0");
        for (input, shown) in [("=== v1.0", "===v1.0"), ("===1.0-RC-2", "===1.0-RC-2")] {
            let original = spec(input);
            assert_eq!(original.to_string(), shown);
            let reparsed = spec(&original.to_string());
            assert_eq!(
                original.satisfied_by(&candidate).unwrap(),
                reparsed.satisfied_by(&candidate).unwrap(),
                "{input}"
            );
            assert_eq!(reparsed.version.literal_form(), original.version.literal_form());
        }
        assert_eq!(spec("== v1.0").to_string(), "==1.0");
    }
}
