//! Shared test utilities for token issuance and verification tests.
//!
//! Provides fixed RSA key pairs, ready-made signers and contexts, and a
//! helper for crafting raw (unsigned or tampered) JWT strings for attack
//! tests. Feature-gated behind `testutil` so it never reaches production
//! builds.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! sigil-authn = { path = "../authn", features = ["testutil"] }
//! ```
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use sigil_authn::testutil::{craft_raw_jwt, hmac_signer};
//! ```

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{
    config::IssuerConfig,
    context::VerificationContext,
    signer::{HmacSigner, RsaSigner, Signer},
};

/// 2048-bit RSA private key (PKCS#1 PEM).
pub const RSA_PRIVATE_KEY_PEM: &[u8] = include_bytes!("../testdata/rsa_private.pem");
/// Public half of [`RSA_PRIVATE_KEY_PEM`].
pub const RSA_PUBLIC_KEY_PEM: &[u8] = include_bytes!("../testdata/rsa_public.pem");
/// An unrelated RSA private key.
pub const RSA_OTHER_PRIVATE_KEY_PEM: &[u8] = include_bytes!("../testdata/rsa_private_other.pem");
/// Public half of [`RSA_OTHER_PRIVATE_KEY_PEM`].
pub const RSA_OTHER_PUBLIC_KEY_PEM: &[u8] = include_bytes!("../testdata/rsa_public_other.pem");

/// Secret used by [`hmac_signer`].
pub const TEST_HMAC_SECRET: &[u8] = b"test-hmac-secret";

/// Issuer used by [`issuer_config`] and [`verification_context`].
pub const TEST_ISSUER: &str = "app";
/// Client id used by [`issuer_config`].
pub const TEST_CLIENT_ID: &str = "c1";
/// Resource URI used by [`issuer_config`].
pub const TEST_RESOURCE_URI: &str = "https://api";

/// An HMAC signer over [`TEST_HMAC_SECRET`].
///
/// # Panics
///
/// Panics if `algorithm` is not an HMAC algorithm.
pub fn hmac_signer(algorithm: &str) -> Arc<dyn Signer> {
    Arc::new(HmacSigner::new(algorithm, TEST_HMAC_SECRET).expect("HMAC test signer"))
}

/// An RSA signer over the primary test key pair.
///
/// # Panics
///
/// Panics if `algorithm` is not an RSA algorithm.
pub fn rsa_signer(algorithm: &str) -> Arc<dyn Signer> {
    Arc::new(
        RsaSigner::new(algorithm, RSA_PRIVATE_KEY_PEM, RSA_PUBLIC_KEY_PEM).expect("RSA test signer"),
    )
}

/// Issuer configuration: `app`, `c1`, `https://api`, 1 hour lifetime.
///
/// # Panics
///
/// Never in practice; the values are valid.
pub fn issuer_config() -> IssuerConfig {
    IssuerConfig::builder()
        .issuer(TEST_ISSUER)
        .client_id(TEST_CLIENT_ID)
        .resource_uri(TEST_RESOURCE_URI)
        .build()
        .expect("test issuer config")
}

/// A context expecting the test issuer and client audience.
pub fn verification_context(signer: Arc<dyn Signer>) -> VerificationContext {
    VerificationContext::builder()
        .signer(signer)
        .issuer(TEST_ISSUER)
        .audience(vec![TEST_CLIENT_ID.to_owned()])
        .build()
}

/// Creates a raw JWT string from arbitrary header and payload JSON.
///
/// The result is `{header_b64}.{payload_b64}.` with an empty signature,
/// useful for `alg: "none"`, algorithm confusion and malformed-claim tests.
///
/// # Panics
///
/// Panics if JSON serialization fails.
pub fn craft_raw_jwt(header_json: &serde_json::Value, payload_json: &serde_json::Value) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header_json).expect("header json"));
    let payload_b64 =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload_json).expect("payload json"));
    format!("{header_b64}.{payload_b64}.")
}

/// Like [`craft_raw_jwt`] but signed by `signer` over the crafted segments.
///
/// Lets tests put any header on a correctly signed token, e.g. an `alg`
/// that disagrees with the signer.
///
/// # Panics
///
/// Panics if JSON serialization or signing fails.
pub fn craft_signed_jwt(
    header_json: &serde_json::Value,
    payload_json: &serde_json::Value,
    signer: &dyn Signer,
) -> String {
    let unsigned = craft_raw_jwt(header_json, payload_json);
    let signing_input = unsigned.trim_end_matches('.');
    let signature = signer.sign(signing_input.as_bytes()).expect("test signature");
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
}

/// Asserts that a [`Result<T, AuthError>`](crate::AuthError) is an `Err` matching the given
/// [`AuthError`](crate::AuthError) variant.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use sigil_authn::{AuthError, assert_auth_error};
///
/// let result: Result<(), AuthError> = Err(AuthError::invalid_key("empty"));
/// assert_auth_error!(result, InvalidKey);
/// ```
#[macro_export]
macro_rules! assert_auth_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::AuthError::$variant { .. })),
            "expected AuthError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::AuthError::$variant { .. })),
            "{}: expected AuthError::{}, got: {:?}",
            $msg,
            stringify!($variant),
            $result,
        );
    };
}

/// Asserts that a [`Result<T, AuthError>`](crate::AuthError) failed with exactly the given
/// error codes, in order.
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use sigil_authn::{AuthError, ErrorCode, assert_error_codes};
///
/// let result: Result<(), AuthError> = Err(AuthError::rejected(ErrorCode::InvalidPassword));
/// assert_error_codes!(result, [ErrorCode::InvalidPassword]);
/// ```
#[macro_export]
macro_rules! assert_error_codes {
    ($result:expr, [$($code:expr),* $(,)?]) => {{
        let expected: Vec<$crate::error::ErrorCode> = vec![$($code),*];
        match &$result {
            Err(err) => assert_eq!(err.codes(), expected, "unexpected error codes for {:?}", err),
            Ok(_) => panic!("expected failure with codes {:?}, got Ok", expected),
        }
    }};
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{AuthError, ErrorCode};

    #[test]
    fn test_craft_raw_jwt_format() {
        let jwt = craft_raw_jwt(&json!({"alg": "none", "typ": "JWT"}), &json!({"sub": "test"}));
        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[2].is_empty(), "signature should be empty for raw JWTs");
    }

    #[test]
    fn test_craft_signed_jwt_verifies() {
        let signer = hmac_signer("HS256");
        let jwt = craft_signed_jwt(&json!({"alg": "HS256"}), &json!({"sub": "x"}), signer.as_ref());
        let (input, sig) = jwt.rsplit_once('.').unwrap();
        let sig = URL_SAFE_NO_PAD.decode(sig).unwrap();
        assert!(signer.verify(&sig, input.as_bytes()));
    }

    #[test]
    fn test_signers_match_algorithms() {
        assert_eq!(hmac_signer("HS512").algorithm_name(), "HS512");
        assert_eq!(rsa_signer("RS384").algorithm_name(), "RS384");
    }

    #[test]
    fn test_fixtures_are_valid() {
        assert_eq!(issuer_config().issuer(), TEST_ISSUER);
        let ctx = verification_context(hmac_signer("HS256"));
        assert_eq!(ctx.issuer(), Some(TEST_ISSUER));
        assert_eq!(ctx.audience(), [TEST_CLIENT_ID.to_owned()]);
    }

    #[test]
    fn test_assert_auth_error_macro() {
        let result: Result<(), AuthError> = Err(AuthError::invalid_key("empty"));
        assert_auth_error!(result, InvalidKey);
        assert_auth_error!(result, InvalidKey, "key should be rejected");
    }

    #[test]
    fn test_assert_error_codes_macro() {
        let result: Result<(), AuthError> =
            Err(AuthError::from(crate::error::VerificationErrors::from(vec![
                ErrorCode::InvalidIssuer,
                ErrorCode::TokenExpired,
            ])));
        assert_error_codes!(result, [ErrorCode::InvalidIssuer, ErrorCode::TokenExpired]);
    }
}
