//! Issuer and signer configuration.
//!
//! Configuration is supplied programmatically by the embedding service,
//! either through the builders or by deserializing from any serde format.
//! Deserialized values should be passed through `validate` before use;
//! the builders validate on `build()`.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    error::{AuthError, Result},
    signer::{HmacSigner, RsaSigner, Signer},
};

/// Default token lifetime (1 hour).
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

/// Longest accepted token lifetime (100 years).
pub const MAX_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn default_lifetime() -> Duration {
    DEFAULT_LIFETIME
}

/// What to do when a custom claim reuses a reserved claim name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedClaimPolicy {
    /// The custom value silently replaces the standard one.
    #[default]
    Override,
    /// Issuance fails with [`AuthError::InvalidArgument`].
    Reject,
}

/// Settings for a credential factory.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sigil_authn::config::IssuerConfig;
///
/// let config = IssuerConfig::builder()
///     .issuer("app")
///     .client_id("c1")
///     .resource_uri("https://api")
///     .lifetime(Duration::from_secs(900))
///     .build()?;
///
/// assert_eq!(config.issuer(), "app");
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerConfig {
    /// Value of the `iss` claim.
    pub(crate) issuer: String,

    /// OAuth client the tokens are issued to; first audience entry.
    pub(crate) client_id: String,

    /// Protected resource; second audience entry of access tokens.
    pub(crate) resource_uri: String,

    /// Time between `nbf` and `exp` for tokens issued "now".
    #[serde(with = "humantime_serde", default = "default_lifetime")]
    pub(crate) lifetime: Duration,

    /// Handling of custom claims named like reserved claims.
    #[serde(default)]
    pub(crate) reserved_claims: ReservedClaimPolicy,
}

#[bon::bon]
impl IssuerConfig {
    /// Creates a new configuration, validating all required fields.
    ///
    /// # Optional Fields
    ///
    /// * `lifetime` - Token lifetime (default: 1 hour).
    /// * `reserved_claims` - Reserved claim policy (default: override).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if a required field is empty or
    /// the lifetime is zero or exceeds [`MAX_LIFETIME`].
    #[builder]
    pub fn new(
        #[builder(into)] issuer: String,
        #[builder(into)] client_id: String,
        #[builder(into)] resource_uri: String,
        #[builder(default = DEFAULT_LIFETIME)] lifetime: Duration,
        #[builder(default)] reserved_claims: ReservedClaimPolicy,
    ) -> Result<Self> {
        let config = Self { issuer, client_id, resource_uri, lifetime, reserved_claims };
        config.validate()?;
        Ok(config)
    }

    /// Checks a configuration obtained through deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.issuer.trim().is_empty() {
            return Err(AuthError::invalid_config("issuer cannot be empty"));
        }
        if self.client_id.trim().is_empty() {
            return Err(AuthError::invalid_config("client_id cannot be empty"));
        }
        if self.resource_uri.trim().is_empty() {
            return Err(AuthError::invalid_config("resource_uri cannot be empty"));
        }
        if self.lifetime.is_zero() {
            return Err(AuthError::invalid_config("lifetime must be greater than zero"));
        }
        if self.lifetime > MAX_LIFETIME {
            return Err(AuthError::invalid_config("lifetime is too large"));
        }
        Ok(())
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the resource URI.
    #[must_use]
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// Returns the token lifetime.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Returns the reserved claim policy.
    #[must_use]
    pub fn reserved_claims(&self) -> ReservedClaimPolicy {
        self.reserved_claims
    }
}

/// Key material and algorithm for a signer.
///
/// The signer is built once per configuration with [`SignerConfig::build`]
/// and then shared.
///
/// ```
/// use sigil_authn::config::SignerConfig;
///
/// let config: SignerConfig = serde_json::from_str(
///     r#"{"type": "hmac", "algorithm": "HS512", "secret": "s3cr3t"}"#,
/// )?;
/// let signer = config.build()?;
/// assert_eq!(signer.algorithm_name(), "HS512");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignerConfig {
    /// Symmetric HMAC signer.
    Hmac {
        /// `HS256`, `HS384` or `HS512`.
        algorithm: String,
        /// Shared secret.
        secret: Zeroizing<String>,
    },
    /// Asymmetric RSA signer.
    Rsa {
        /// `RS256`, `RS384` or `RS512`.
        algorithm: String,
        /// PEM private key; omit for verification-only signers.
        #[serde(default)]
        private_key_pem: Option<Zeroizing<String>>,
        /// PEM public key.
        public_key_pem: String,
    },
}

impl SignerConfig {
    /// Builds the configured signer.
    ///
    /// # Errors
    ///
    /// Propagates algorithm and key errors from [`HmacSigner::new`],
    /// [`RsaSigner::new`] and [`RsaSigner::verifier`].
    pub fn build(&self) -> Result<Arc<dyn Signer>> {
        let signer: Arc<dyn Signer> = match self {
            Self::Hmac { algorithm, secret } => {
                Arc::new(HmacSigner::new(algorithm, secret.as_bytes())?)
            },
            Self::Rsa { algorithm, private_key_pem: Some(private), public_key_pem } => Arc::new(
                RsaSigner::new(algorithm, private.as_bytes(), public_key_pem.as_bytes())?,
            ),
            Self::Rsa { algorithm, private_key_pem: None, public_key_pem } => {
                Arc::new(RsaSigner::verifier(algorithm, public_key_pem.as_bytes())?)
            },
        };
        tracing::debug!(algorithm = signer.algorithm_name(), "Signer configured");
        Ok(signer)
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hmac { algorithm, .. } => {
                f.debug_struct("Hmac").field("algorithm", algorithm).finish_non_exhaustive()
            },
            Self::Rsa { algorithm, private_key_pem, .. } => f
                .debug_struct("Rsa")
                .field("algorithm", algorithm)
                .field("has_private_key", &private_key_pem.is_some())
                .finish_non_exhaustive(),
        }
    }
}
