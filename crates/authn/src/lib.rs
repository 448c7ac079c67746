//! # Sigil Authentication
//!
//! JWT issuance and verification for Sigil services.
//!
//! This crate provides:
//! - **Algorithm registry and signers**: `HS256/384/512` and `RS256/384/512`
//! - **Token model**: header, typed claims and the three-segment wire form
//! - **Credential factories**: access and refresh token issuance
//! - **Verifier chain**: six independent checks, all failures reported
//! - **Authenticators**: stored-JWT and username/password strategies
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use sigil_authn::{
//!     Authenticator, HmacSigner, JwtAuth, Signer, VerificationContext,
//!     config::IssuerConfig,
//!     factory::{CredentialFactory, signed_token_verification_credential},
//!     token::Payload,
//! };
//! use sigil_storage::MemoryTokenRepository;
//!
//! let signer: Arc<dyn Signer> = Arc::new(HmacSigner::new("HS256", b"secret")?);
//! let config = IssuerConfig::builder()
//!     .issuer("app")
//!     .client_id("c1")
//!     .resource_uri("https://api")
//!     .build()?;
//!
//! // Issue and persist
//! let factory = CredentialFactory::access_tokens(config, signer.clone())?;
//! let issued = factory.create_credential([("sub", "u1")].into_iter().collect::<Payload>())?;
//! let token = issued.token().unwrap_or_default().to_owned();
//! let tokens = Arc::new(MemoryTokenRepository::new());
//! tokens.insert(token.clone())?;
//!
//! // Authenticate
//! let ctx = VerificationContext::builder()
//!     .signer(signer)
//!     .issuer("app")
//!     .audience(vec!["c1".to_owned()])
//!     .subject("u1")
//!     .build();
//! let auth = JwtAuth::new(tokens, ctx);
//! auth.authenticate(&signed_token_verification_credential([("token", token)])?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Algorithm registry.
pub mod algorithm;
/// Authenticators.
pub mod auth;
/// Issuer and signer configuration.
pub mod config;
/// Verification context.
pub mod context;
/// Credentials.
pub mod credential;
/// Authentication error types.
pub mod error;
/// Credential factories.
pub mod factory;
/// Password hashing.
pub mod password;
/// Signers.
pub mod signer;
/// Token model.
pub mod token;
/// Algorithm validation.
pub mod validation;
/// Verifier chain.
pub mod verifier;

/// Test utilities (feature-gated).
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

// Re-export key types for convenience
pub use algorithm::{AlgorithmFamily, AlgorithmRegistry};
pub use auth::{Authenticator, JwtAuth, JwtRefreshTokenAuth, UsernamePasswordAuth};
pub use config::{IssuerConfig, ReservedClaimPolicy, SignerConfig};
pub use context::VerificationContext;
pub use credential::{Credential, CredentialType};
pub use error::{AuthError, ErrorCode, Result, VerificationErrors};
pub use factory::{
    CredentialFactory, TokenPurpose, signed_token_verification_credential,
    username_password_credential,
};
pub use password::{Argon2PasswordVerifier, PasswordVerifier, hash_password};
pub use signer::{HmacSigner, RsaSigner, Signer};
pub use token::{ClaimValue, Header, Payload, Token};
pub use validation::{ACCEPTED_ALGORITHMS, FORBIDDEN_ALGORITHMS, validate_algorithm};
pub use verifier::{ClaimVerifier, JwtVerifier};
