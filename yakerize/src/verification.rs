//! Integrity checks for the downloaded builder executable.
//!
//! The vendor endpoint serves an unversioned binary, so by default the
//! download is trusted as received. Configuring `yak.sha256` switches to a
//! digest comparison that rejects anything else before it is persisted.

use crate::error::{Result, YakerizeError};
use log::warn;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// A check run on the downloaded bytes before they become executable.
#[cfg_attr(test, mockall::automock)]
pub trait BuilderVerifier {
    /// Accept or reject the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails verification or cannot be read.
    fn verify(&self, path: &Path) -> Result<()>;
}

/// Accepts any download, logging that no check took place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustOnDownload;

impl BuilderVerifier for TrustOnDownload {
    fn verify(&self, path: &Path) -> Result<()> {
        warn!(
            "no yak.sha256 configured; trusting {} without verification",
            path.display()
        );
        Ok(())
    }
}

/// Compares the SHA-256 digest of the download to an expected value.
///
/// # Examples
///
/// ```
/// use yakerize::verification::Sha256Verifier;
///
/// assert!(Sha256Verifier::new(&"ab".repeat(32)).is_ok());
/// assert!(Sha256Verifier::new("not-a-digest").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha256Verifier {
    expected: String,
}

impl Sha256Verifier {
    /// Create a verifier for a hex digest. Case is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::InvalidConfig`] if `expected` is not 64 hex
    /// characters.
    pub fn new(expected: &str) -> Result<Self> {
        let expected = expected.trim().to_ascii_lowercase();
        if expected.len() != SHA256_HEX_LEN || !expected.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(YakerizeError::InvalidConfig {
                path: crate::config::CONFIG_FILE_NAME.into(),
                reason: format!("yak.sha256 must be {SHA256_HEX_LEN} hex characters"),
            });
        }
        Ok(Self { expected })
    }

    /// Return the expected lowercase digest.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl BuilderVerifier for Sha256Verifier {
    fn verify(&self, path: &Path) -> Result<()> {
        let actual = compute_sha256(path)?;
        if actual != self.expected {
            return Err(YakerizeError::ChecksumMismatch {
                expected: self.expected.clone(),
                actual,
            });
        }
        Ok(())
    }
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns [`YakerizeError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Build the verifier selected by an optional configured digest.
///
/// # Errors
///
/// Returns [`YakerizeError::InvalidConfig`] if the digest is malformed.
pub fn verifier_for(sha256: Option<&str>) -> Result<Box<dyn BuilderVerifier>> {
    Ok(match sha256 {
        Some(digest) => Box::new(Sha256Verifier::new(digest)?),
        None => Box::new(TrustOnDownload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    /// SHA-256 of the ASCII bytes `hello`.
    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn file_with(contents: &[u8]) -> NamedTempFile {
        let file = NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), contents).expect("write temp file");
        file
    }

    #[test]
    fn compute_sha256_matches_known_digest() {
        let file = file_with(b"hello");
        assert_eq!(compute_sha256(file.path()).expect("digest"), HELLO_SHA256);
    }

    #[test]
    fn matching_digest_is_accepted_regardless_of_case() {
        let file = file_with(b"hello");
        let verifier = Sha256Verifier::new(&HELLO_SHA256.to_ascii_uppercase()).expect("valid");
        assert_eq!(verifier.expected(), HELLO_SHA256);
        assert!(verifier.verify(file.path()).is_ok());
    }

    #[test]
    fn mismatching_digest_reports_both_values() {
        let file = file_with(b"goodbye");
        let verifier = Sha256Verifier::new(HELLO_SHA256).expect("valid");

        let err = verifier.verify(file.path()).expect_err("mismatch");
        match err {
            YakerizeError::ChecksumMismatch { expected, actual } => {
                assert_eq!(expected, HELLO_SHA256);
                assert_ne!(actual, HELLO_SHA256);
            }
            other => panic!("expected ChecksumMismatch, got {other:?}"),
        }
    }

    #[rstest]
    #[case::too_short("abc")]
    #[case::not_hex("gggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggg")]
    #[case::empty("")]
    fn malformed_digests_are_rejected(#[case] digest: &str) {
        let err = Sha256Verifier::new(digest).expect_err("malformed digest");
        assert!(err.to_string().contains("yak.sha256"));
    }

    #[test]
    fn trust_on_download_accepts_anything() {
        let file = file_with(b"anything");
        assert!(TrustOnDownload.verify(file.path()).is_ok());
    }

    #[test]
    fn verifier_for_without_digest_trusts_download() {
        let file = file_with(b"anything");
        let verifier = verifier_for(None).expect("verifier");
        assert!(verifier.verify(file.path()).is_ok());
    }
}
