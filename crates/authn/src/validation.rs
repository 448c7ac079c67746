//! JWT algorithm validation.
//!
//! Security checks applied to algorithm names before any signer or registry
//! lookup uses them.
//!
//! # Security
//!
//! - Only the six HMAC/RSA algorithms in [`ACCEPTED_ALGORITHMS`] are allowed
//! - `none` is always rejected, independently of the accepted list
//! - Names are matched exactly; `hs256` is not `HS256`

use crate::error::AuthError;

/// Forbidden JWT algorithms that are never accepted.
///
/// `none` carries no signature and would let anyone mint tokens.
pub const FORBIDDEN_ALGORITHMS: &[&str] = &["none", "None", "NONE"];

/// Accepted JWT algorithms, HMAC family first.
pub const ACCEPTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512", "RS256", "RS384", "RS512"];

/// Validate a JWT algorithm name against security policies.
///
/// # Errors
///
/// Returns [`AuthError::UnsupportedAlgorithm`] if:
/// - Algorithm is `none`
/// - Algorithm is not in [`ACCEPTED_ALGORITHMS`]
///
/// # Examples
///
/// ```
/// use sigil_authn::validation::validate_algorithm;
///
/// assert!(validate_algorithm("HS256").is_ok());
/// assert!(validate_algorithm("RS512").is_ok());
/// assert!(validate_algorithm("none").is_err());
/// assert!(validate_algorithm("ES256").is_err());
/// ```
pub fn validate_algorithm(alg: &str) -> Result<(), AuthError> {
    if FORBIDDEN_ALGORITHMS.contains(&alg) {
        return Err(AuthError::unsupported_algorithm(format!(
            "Algorithm '{alg}' is not allowed for security reasons"
        )));
    }

    if !ACCEPTED_ALGORITHMS.contains(&alg) {
        return Err(AuthError::unsupported_algorithm(format!(
            "Algorithm '{alg}' is not in accepted list"
        )));
    }

    Ok(())
}
