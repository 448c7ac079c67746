//! Credential factories.
//!
//! A [`CredentialFactory`] issues signed tokens for one [`TokenPurpose`] and
//! wraps them in [`Credential`]s. The purpose decides the audience, the
//! credential type and the `token_use` claim; everything else is shared.
//!
//! Standard claims are written first and custom claims merged afterwards.
//! Under [`ReservedClaimPolicy::Override`] a custom claim with a reserved
//! name replaces the standard value; [`ReservedClaimPolicy::Reject`] refuses
//! such claims instead.

use std::{fmt, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    config::{IssuerConfig, ReservedClaimPolicy},
    credential::{Credential, CredentialType, TOKEN_KEY},
    error::{AuthError, Result},
    signer::Signer,
    token::{Header, Payload, Token, claims},
};

/// Parameters that distinguish one kind of issued token from another.
#[derive(Clone, Copy)]
pub struct TokenPurpose {
    /// Type of the produced credential.
    pub credential_type: CredentialType,
    /// Builds the `aud` claim from the issuer configuration.
    pub audience: fn(&IssuerConfig) -> Vec<String>,
    /// Value of the `token_use` claim, if any.
    pub token_use: Option<&'static str>,
}

fn access_audience(config: &IssuerConfig) -> Vec<String> {
    vec![config.client_id().to_owned(), config.resource_uri().to_owned()]
}

fn refresh_audience(config: &IssuerConfig) -> Vec<String> {
    vec![config.client_id().to_owned()]
}

impl TokenPurpose {
    /// Access tokens: audience `[client_id, resource_uri]`.
    pub const ACCESS_TOKEN: Self = Self {
        credential_type: CredentialType::AccessToken,
        audience: access_audience,
        token_use: Some("access"),
    };

    /// Refresh tokens: audience `[client_id]`, presented back to the issuer.
    pub const REFRESH_TOKEN: Self = Self {
        credential_type: CredentialType::RefreshToken,
        audience: refresh_audience,
        token_use: Some("refresh"),
    };
}

impl fmt::Debug for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPurpose")
            .field("credential_type", &self.credential_type)
            .field("token_use", &self.token_use)
            .finish_non_exhaustive()
    }
}

/// Issues signed tokens for one purpose.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sigil_authn::{
///     HmacSigner,
///     config::IssuerConfig,
///     credential::CredentialType,
///     factory::CredentialFactory,
///     token::Payload,
/// };
///
/// let config = IssuerConfig::builder()
///     .issuer("app")
///     .client_id("c1")
///     .resource_uri("https://api")
///     .build()?;
/// let factory = CredentialFactory::access_tokens(config, Arc::new(HmacSigner::new("HS256", b"k")?))?;
///
/// let credential = factory.create_credential([("sub", "u1")].into_iter().collect::<Payload>())?;
/// assert_eq!(credential.credential_type(), CredentialType::AccessToken);
/// assert!(credential.token().is_some());
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CredentialFactory {
    config: IssuerConfig,
    signer: Arc<dyn Signer>,
    purpose: TokenPurpose,
}

impl CredentialFactory {
    /// Creates a factory.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: IssuerConfig, signer: Arc<dyn Signer>, purpose: TokenPurpose) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, signer, purpose })
    }

    /// Creates an access token factory.
    ///
    /// # Errors
    ///
    /// Same as [`CredentialFactory::new`].
    pub fn access_tokens(config: IssuerConfig, signer: Arc<dyn Signer>) -> Result<Self> {
        Self::new(config, signer, TokenPurpose::ACCESS_TOKEN)
    }

    /// Creates a refresh token factory.
    ///
    /// # Errors
    ///
    /// Same as [`CredentialFactory::new`].
    pub fn refresh_tokens(config: IssuerConfig, signer: Arc<dyn Signer>) -> Result<Self> {
        Self::new(config, signer, TokenPurpose::REFRESH_TOKEN)
    }

    /// The purpose this factory issues for.
    #[must_use]
    pub fn purpose(&self) -> TokenPurpose {
        self.purpose
    }

    /// The issuer configuration.
    #[must_use]
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Issues a credential valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// See [`CredentialFactory::issue_token`].
    pub fn create_credential(&self, custom_claims: Payload) -> Result<Credential> {
        let started = Utc::now();
        let expired = TimeDelta::from_std(self.config.lifetime())
            .ok()
            .and_then(|lifetime| started.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::invalid_config("lifetime is too large"))?;
        self.create_credential_at(custom_claims, started, expired)
    }

    /// Issues a credential valid between `started` and `expired`.
    ///
    /// # Errors
    ///
    /// See [`CredentialFactory::issue_token`].
    pub fn create_credential_at(
        &self,
        custom_claims: Payload,
        started: DateTime<Utc>,
        expired: DateTime<Utc>,
    ) -> Result<Credential> {
        let token = self.issue_token(custom_claims, started, expired)?;
        Ok(Credential::new(self.purpose.credential_type, [(TOKEN_KEY, token.into_string())]))
    }

    /// Builds and signs a token valid between `started` and `expired`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidArgument`] if `expired` is not after `started`, or a custom claim
    ///   uses a reserved name under [`ReservedClaimPolicy::Reject`]
    /// - [`AuthError::Signing`] if the signer fails
    #[tracing::instrument(
        skip(self, custom_claims),
        fields(
            purpose = ?self.purpose.credential_type,
            algorithm = self.signer.algorithm_name(),
        )
    )]
    pub fn issue_token(
        &self,
        custom_claims: Payload,
        started: DateTime<Utc>,
        expired: DateTime<Utc>,
    ) -> Result<Token> {
        if expired <= started {
            return Err(AuthError::invalid_argument("expiration must be after the start time"));
        }

        let payload = self.build_payload(custom_claims, Utc::now(), started, expired)?;
        let token = Token::issue(Header::for_signer(self.signer.as_ref()), payload, self.signer.as_ref())?;

        tracing::debug!(exp = expired.timestamp(), "Token issued");
        Ok(token)
    }

    fn build_payload(
        &self,
        custom_claims: Payload,
        issued_at: DateTime<Utc>,
        started: DateTime<Utc>,
        expired: DateTime<Utc>,
    ) -> Result<Payload> {
        let mut payload = Payload::new();
        payload.insert(claims::AUDIENCE, (self.purpose.audience)(&self.config));
        payload.insert(claims::ISSUER, self.config.issuer());
        payload.insert(claims::ISSUED_AT, issued_at);
        payload.insert(claims::NOT_BEFORE, started);
        payload.insert(claims::EXPIRATION, expired);
        if let Some(token_use) = self.purpose.token_use {
            payload.insert(claims::TOKEN_USE, token_use);
        }

        for (name, value) in custom_claims {
            let reserved = claims::RESERVED.contains(&name.as_str());
            if reserved {
                match self.config.reserved_claims() {
                    ReservedClaimPolicy::Reject => {
                        return Err(AuthError::invalid_argument(format!(
                            "custom claim '{name}' collides with a reserved claim"
                        )));
                    },
                    ReservedClaimPolicy::Override if payload.contains(&name) => {
                        tracing::debug!(claim = %name, "Custom claim overrides standard claim");
                    },
                    ReservedClaimPolicy::Override => {},
                }
            }
            payload.insert(name, value);
        }

        Ok(payload)
    }
}

/// Wraps an already-issued token for the authentication pipeline without
/// signing anything.
///
/// # Errors
///
/// Returns [`AuthError::InvalidArgument`] if `values` has no `token` entry.
pub fn signed_token_verification_credential<K, V>(
    values: impl IntoIterator<Item = (K, V)>,
) -> Result<Credential>
where
    K: Into<String>,
    V: Into<String>,
{
    Credential::signed_token_verification(values)
}

/// Builds a username/password credential.
#[must_use]
pub fn username_password_credential(
    username: impl Into<String>,
    password: impl Into<String>,
) -> Credential {
    Credential::username_password(username, password)
}
