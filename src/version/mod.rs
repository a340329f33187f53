//! Distribution versions, requirement specifiers and dependency checks.
//!
//! Parsing flows from the version grammar into a [`VersionNumber`], which the
//! [`RequirementSpecifier`] evaluator compares against candidates. A
//! [`Dependency`] is the conjunction of its specifiers.
//!
//! ```
//! use board2kconf::version::{Dependency, Distribution, VersionNumber};
//!
//! let dep: Dependency = "urwid >=2.0, !=2.1.1".parse()?;
//! let installed = Distribution::new("urwid", VersionNumber::parse("2.1.2")?);
//! assert!(dep.satisfied_by(&installed)?);
//! # Ok::<(), board2kconf::VersionError>(())
//! ```

mod dependency;
mod grammar;
mod number;
mod requirement;

pub use dependency::{Dependency, Distribution};
pub use grammar::is_version_like;
pub use number::{align, Qualifier, ReleaseVersion, VersionNumber};
pub use requirement::{parse_specifiers, Operator, RequirementSpecifier};
