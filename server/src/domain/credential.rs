//! Credential material: plaintext secrets and their stored digests.
//!
//! Both wrappers redact themselves from `Debug` output and neither derives
//! serde traits: plaintext never leaves the process and the digest never
//! crosses the service boundary.

use std::fmt;

use zeroize::Zeroize;

/// Validation errors for credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    EmptySecret,
    EmptyDigest,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "secret must not be empty"),
            Self::EmptyDigest => write!(f, "credential digest must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Plaintext secret supplied at registration.
///
/// The buffer is zeroed on drop. There is intentionally no `Display`, no
/// serde support, and no way to read the plaintext other than
/// [`Secret::expose`].
pub struct Secret(String);

impl Secret {
    /// Wrap a non-empty plaintext secret.
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptySecret);
        }
        Ok(Self(raw))
    }

    /// Read the plaintext. Callers must not log or persist the result.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Constant-shape comparison against another secret.
    pub fn matches(&self, other: &Secret) -> bool {
        self.0 == other.0
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Opaque, salted one-way digest of a confirmed secret.
///
/// The only form of the secret that is ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a non-empty digest produced by a hasher.
    pub fn new(digest: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let digest = digest.into();
        if digest.is_empty() {
            return Err(CredentialValidationError::EmptyDigest);
        }
        Ok(Self(digest))
    }

    /// Borrow the digest for persistence or verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}
