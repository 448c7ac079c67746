//! Authentication error types.
//!
//! Two layers live here:
//!
//! - [`ErrorCode`]: the symbolic codes reported to callers (`INVALID_ISSUER`, `TOKEN_EXPIRED`, ...)
//! - [`AuthError`]: the Rust error returned by fallible operations, which either wraps one or more
//!   codes or describes a construction failure (bad key, unsupported algorithm, bad config)
//!
//! Credential-level failures carry exactly one code. Verifier-level failures
//! carry every code produced by the verifier chain in a [`VerificationErrors`]
//! list.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbolic error codes reported by authenticators and verifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // ========== Credential level ==========
    /// A required credential value (`token`, `username`, `password`) is absent.
    CredentialIsMissing,
    /// No user exists with the supplied username.
    UsernameNotFound,
    /// The supplied password does not match the stored hash.
    InvalidPassword,
    /// The presented token was never issued or is no longer stored.
    SignedJwtTokenNotFound,
    /// The stored token string is not a structurally valid JWT.
    MalformedToken,
    /// The token was issued for a different purpose (e.g. access vs refresh).
    InvalidTokenUse,

    // ========== Verifier level ==========
    /// `iss` does not match the expected issuer.
    InvalidIssuer,
    /// `aud` shares no entry with the expected audience.
    InvalidAudience,
    /// `sub` does not match the expected subject.
    InvalidSubject,
    /// The signature segment is empty.
    InvalidSignature,
    /// The header algorithm is unknown or does not match the signer.
    InvalidAlgorithm,
    /// The signature does not verify against the signing input.
    MissMatchSignature,
    /// `exp` is in the past, absent, or unparseable.
    TokenExpired,
    /// `nbf` is in the future.
    TokenUsedBeforeTheTime,
}

impl ErrorCode {
    /// The wire name of the code, e.g. `"TOKEN_EXPIRED"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CredentialIsMissing => "CREDENTIAL_IS_MISSING",
            Self::UsernameNotFound => "USERNAME_NOT_FOUND",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::SignedJwtTokenNotFound => "SIGNED_JWT_TOKEN_NOT_FOUND",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::InvalidTokenUse => "INVALID_TOKEN_USE",
            Self::InvalidIssuer => "INVALID_ISSUER",
            Self::InvalidAudience => "INVALID_AUDIENCE",
            Self::InvalidSubject => "INVALID_SUBJECT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidAlgorithm => "INVALID_ALGORITHM",
            Self::MissMatchSignature => "MISS_MATCH_SIGNATURE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenUsedBeforeTheTime => "TOKEN_USED_BEFORE_THE_TIME",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every code produced by one run of the verifier chain, in chain order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationErrors(Vec<ErrorCode>);

impl VerificationErrors {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a code.
    pub fn push(&mut self, code: ErrorCode) {
        self.0.push(code);
    }

    /// The collected codes.
    #[must_use]
    pub fn codes(&self) -> &[ErrorCode] {
        &self.0
    }

    /// Whether the given code was reported.
    #[must_use]
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.0.contains(&code)
    }

    /// Number of failed checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no check failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list, returning the codes.
    #[must_use]
    pub fn into_codes(self) -> Vec<ErrorCode> {
        self.0
    }
}

impl fmt::Display for VerificationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(code.as_str())?;
        }
        Ok(())
    }
}

impl From<Vec<ErrorCode>> for VerificationErrors {
    fn from(codes: Vec<ErrorCode>) -> Self {
        Self(codes)
    }
}

impl IntoIterator for VerificationErrors {
    type Item = ErrorCode;
    type IntoIter = std::vec::IntoIter<ErrorCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VerificationErrors {
    type Item = &'a ErrorCode;
    type IntoIter = std::slice::Iter<'a, ErrorCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Authentication, issuance and configuration errors.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`; new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Algorithm name is not in the registry (or is forbidden, like `none`).
    #[error("Unsupported algorithm: {message}")]
    UnsupportedAlgorithm {
        /// Description of the rejection.
        message: String,
    },

    /// Algorithm exists but belongs to the wrong signer family.
    #[error("Invalid algorithm: {message}")]
    InvalidAlgorithm {
        /// Description of the mismatch.
        message: String,
    },

    /// Key material could not be loaded.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of the key problem.
        message: String,
    },

    /// The signing primitive reported failure.
    #[error("Signing failed: {message}")]
    Signing {
        /// Description of the failure.
        message: String,
    },

    /// A required argument is missing or malformed.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the argument problem.
        message: String,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// A token string could not be structurally decoded.
    #[error("Invalid token format: {message}")]
    InvalidTokenFormat {
        /// Description of the decoding problem.
        message: String,
    },

    /// A header or payload could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization problem.
        message: String,
    },

    /// A credential was rejected with a single terminal code.
    #[error("Credential rejected: {code}")]
    Rejected {
        /// The reason for rejection.
        code: ErrorCode,
    },

    /// The verifier chain rejected the token.
    #[error("Token verification failed: {0}")]
    Verification(VerificationErrors),
}

impl AuthError {
    /// Creates an `UnsupportedAlgorithm` error.
    #[must_use]
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm { message: message.into() }
    }

    /// Creates an `InvalidAlgorithm` error.
    #[must_use]
    pub fn invalid_algorithm(message: impl Into<String>) -> Self {
        Self::InvalidAlgorithm { message: message.into() }
    }

    /// Creates an `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey { message: message.into() }
    }

    /// Creates a `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing { message: message.into() }
    }

    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Creates an `InvalidConfig` error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Creates an `InvalidTokenFormat` error.
    #[must_use]
    pub fn invalid_token_format(message: impl Into<String>) -> Self {
        Self::InvalidTokenFormat { message: message.into() }
    }

    /// Creates a `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into() }
    }

    /// Creates a `Rejected` error carrying one code.
    #[must_use]
    pub fn rejected(code: ErrorCode) -> Self {
        Self::Rejected { code }
    }

    /// The symbolic codes a caller should report for this error.
    ///
    /// Empty for construction-level errors, which have no code.
    #[must_use]
    pub fn codes(&self) -> Vec<ErrorCode> {
        match self {
            Self::Rejected { code } => vec![*code],
            Self::Verification(errors) => errors.codes().to_vec(),
            Self::InvalidTokenFormat { .. } => vec![ErrorCode::MalformedToken],
            _ => Vec::new(),
        }
    }
}

impl From<VerificationErrors> for AuthError {
    fn from(errors: VerificationErrors) -> Self {
        Self::Verification(errors)
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidKeyFormat | ErrorKind::InvalidEcdsaKey => {
                AuthError::invalid_key("Key is not in the expected format")
            },
            ErrorKind::InvalidRsaKey(reason) => {
                AuthError::invalid_key(format!("Invalid RSA key: {reason}"))
            },
            ErrorKind::InvalidAlgorithmName | ErrorKind::InvalidAlgorithm => {
                AuthError::unsupported_algorithm("Algorithm not supported")
            },
            ErrorKind::Base64(e) => AuthError::invalid_token_format(format!("Base64: {e}")),
            ErrorKind::Json(e) => AuthError::serialization(e.to_string()),
            ErrorKind::RsaFailedSigning => AuthError::signing("RSA signing failed"),
            _ => AuthError::signing(format!("JWT error: {err}")),
        }
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display_matches_wire_name() {
        assert_eq!(ErrorCode::MissMatchSignature.to_string(), "MISS_MATCH_SIGNATURE");
        assert_eq!(ErrorCode::TokenUsedBeforeTheTime.to_string(), "TOKEN_USED_BEFORE_THE_TIME");
        assert_eq!(ErrorCode::SignedJwtTokenNotFound.to_string(), "SIGNED_JWT_TOKEN_NOT_FOUND");
    }

    #[test]
    fn test_error_code_serde_matches_display() {
        for code in [
            ErrorCode::CredentialIsMissing,
            ErrorCode::UsernameNotFound,
            ErrorCode::InvalidPassword,
            ErrorCode::SignedJwtTokenNotFound,
            ErrorCode::MalformedToken,
            ErrorCode::InvalidTokenUse,
            ErrorCode::InvalidIssuer,
            ErrorCode::InvalidAudience,
            ErrorCode::InvalidSubject,
            ErrorCode::InvalidSignature,
            ErrorCode::InvalidAlgorithm,
            ErrorCode::MissMatchSignature,
            ErrorCode::TokenExpired,
            ErrorCode::TokenUsedBeforeTheTime,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }

    #[test]
    fn test_verification_errors_display() {
        let errors =
            VerificationErrors::from(vec![ErrorCode::InvalidSubject, ErrorCode::TokenExpired]);
        assert_eq!(errors.to_string(), "INVALID_SUBJECT, TOKEN_EXPIRED");

        let err = AuthError::from(errors);
        assert_eq!(
            err.to_string(),
            "Token verification failed: INVALID_SUBJECT, TOKEN_EXPIRED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = AuthError::invalid_token_format("test");
        assert_eq!(err.to_string(), "Invalid token format: test");

        let err = AuthError::rejected(ErrorCode::InvalidPassword);
        assert_eq!(err.to_string(), "Credential rejected: INVALID_PASSWORD");

        let err = AuthError::unsupported_algorithm("none");
        assert_eq!(err.to_string(), "Unsupported algorithm: none");
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            AuthError::rejected(ErrorCode::UsernameNotFound).codes(),
            vec![ErrorCode::UsernameNotFound]
        );
        assert_eq!(
            AuthError::invalid_token_format("x").codes(),
            vec![ErrorCode::MalformedToken]
        );
        assert!(AuthError::invalid_key("x").codes().is_empty());

        let list = VerificationErrors::from(vec![ErrorCode::InvalidIssuer]);
        assert_eq!(AuthError::from(list).codes(), vec![ErrorCode::InvalidIssuer]);
    }

    #[test]
    fn test_error_from_jsonwebtoken() {
        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat);
        assert!(matches!(AuthError::from(jwt_err), AuthError::InvalidKey { .. }));

        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::RsaFailedSigning);
        assert!(matches!(AuthError::from(jwt_err), AuthError::Signing { .. }));
    }
}
