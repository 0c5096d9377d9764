//! Target platform identifiers and builder platform flags.
//!
//! A [`TargetPlatform`] names the host application version the package is
//! built for and ends up in the artefact file name. A [`BuildPlatform`] is
//! the value handed to the builder's `--platform` flag.

use crate::error::{Result, YakerizeError};
use std::fmt;
use std::str::FromStr;

/// Supported host application version tags.
const SUPPORTED_TARGETS: &[&str] = &["rh7", "rh8"];

/// Target used when neither arguments nor configuration name one.
pub const DEFAULT_TARGET_PLATFORM: &str = "rh8";

/// A validated host application version tag.
///
/// # Examples
///
/// ```
/// use yakerize::platform::TargetPlatform;
///
/// let target: TargetPlatform = "rh8".try_into().expect("supported platform");
/// assert_eq!(target.as_str(), "rh8");
/// assert!(TargetPlatform::try_from("rh5").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPlatform(String);

impl TargetPlatform {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TargetPlatform {
    type Error = YakerizeError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if SUPPORTED_TARGETS.contains(&trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(YakerizeError::UnsupportedPlatform {
                value: value.to_owned(),
                expected: SUPPORTED_TARGETS.join(", "),
            })
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `--platform` value passed to the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BuildPlatform {
    /// Platform-agnostic package, named with the generic `any-any` tag.
    #[default]
    Any,
    /// Windows-only package.
    Win,
    /// macOS-only package.
    Mac,
}

impl BuildPlatform {
    const ALL: [Self; 3] = [Self::Any, Self::Win, Self::Mac];

    /// Return the flag value understood by the builder.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Win => "win",
            Self::Mac => "mac",
        }
    }

    /// Return true when the built artefact carries the generic platform
    /// tag and must be renamed for the target platform.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, Self::Any)
    }
}

impl FromStr for BuildPlatform {
    type Err = YakerizeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| YakerizeError::UnsupportedBuildPlatform {
                value: s.to_owned(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

impl fmt::Display for BuildPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rh7")]
    #[case("rh8")]
    #[case(" rh8 ")]
    fn accepts_supported_targets(#[case] raw: &str) {
        let target = TargetPlatform::try_from(raw).expect("supported target");
        assert_eq!(target.as_str(), raw.trim());
    }

    #[rstest]
    #[case("rh9")]
    #[case("")]
    #[case("RH8-any")]
    fn rejects_unsupported_targets_listing_valid_set(#[case] raw: &str) {
        let err = TargetPlatform::try_from(raw).expect_err("unsupported target");
        match err {
            YakerizeError::UnsupportedPlatform { expected, .. } => {
                assert_eq!(expected, "rh7, rh8");
            }
            other => panic!("expected UnsupportedPlatform, got {other:?}"),
        }
    }

    #[test]
    fn default_target_is_supported() {
        assert!(TargetPlatform::try_from(DEFAULT_TARGET_PLATFORM).is_ok());
    }

    #[rstest]
    #[case("any", BuildPlatform::Any)]
    #[case("WIN", BuildPlatform::Win)]
    #[case("mac", BuildPlatform::Mac)]
    fn parses_build_platforms(#[case] raw: &str, #[case] expected: BuildPlatform) {
        assert_eq!(raw.parse::<BuildPlatform>().expect("valid"), expected);
    }

    #[test]
    fn rejects_unknown_build_platform() {
        let err = "linux"
            .parse::<BuildPlatform>()
            .expect_err("unknown platform");
        assert!(err.to_string().contains("any, win, mac"));
    }

    #[test]
    fn only_any_is_wildcard() {
        assert!(BuildPlatform::Any.is_wildcard());
        assert!(!BuildPlatform::Win.is_wildcard());
        assert!(!BuildPlatform::Mac.is_wildcard());
    }
}
