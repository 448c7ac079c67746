//! Authenticators.
//!
//! An [`Authenticator`] accepts or rejects one [`Credential`]. Rejections
//! carry exactly one [`ErrorCode`], except when the verifier chain itself
//! fails, in which case every chain code is reported through
//! [`AuthError::Verification`].

use std::sync::Arc;

use chrono::Utc;
use sigil_storage::{SignedTokenRepository, UserRepository};

use crate::{
    context::VerificationContext,
    credential::{Credential, PASSWORD_KEY, USERNAME_KEY},
    error::{AuthError, ErrorCode, Result},
    password::PasswordVerifier,
    token::Token,
    verifier::JwtVerifier,
};

/// `token_use` value required by [`JwtRefreshTokenAuth::require_token_use`].
pub const REFRESH_TOKEN_USE: &str = "refresh";

/// Accepts or rejects credentials.
pub trait Authenticator: Send + Sync {
    /// Authenticates `credential`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] with a single code for credential-level failures
    /// - [`AuthError::Verification`] with every failing code when the verifier chain rejects
    fn authenticate(&self, credential: &Credential) -> Result<()>;
}

/// Authenticates a previously issued JWT.
///
/// The token must still be known to the token repository; only then is it
/// decoded and run through the verifier chain.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sigil_authn::{
///     Authenticator, HmacSigner, JwtAuth, VerificationContext,
///     credential::Credential,
/// };
/// use sigil_storage::MemoryTokenRepository;
///
/// let signer = Arc::new(HmacSigner::new("HS256", b"secret")?);
/// let auth = JwtAuth::new(
///     Arc::new(MemoryTokenRepository::new()),
///     VerificationContext::new(signer),
/// );
///
/// let credential = Credential::signed_token_verification([("token", "h.p.s")])?;
/// let err = auth.authenticate(&credential).unwrap_err();
/// assert_eq!(err.codes(), [sigil_authn::ErrorCode::SignedJwtTokenNotFound]);
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone)]
pub struct JwtAuth {
    tokens: Arc<dyn SignedTokenRepository>,
    context: VerificationContext,
}

impl JwtAuth {
    /// Creates an authenticator reading from `tokens` and judging against `context`.
    #[must_use]
    pub fn new(tokens: Arc<dyn SignedTokenRepository>, context: VerificationContext) -> Self {
        Self { tokens, context }
    }

    /// The verification context.
    #[must_use]
    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    /// Authenticates `credential` as of `now` (seconds since the epoch).
    ///
    /// # Errors
    ///
    /// See [`Authenticator::authenticate`].
    pub fn authenticate_at(&self, credential: &Credential, now: i64) -> Result<()> {
        self.verified_token(credential, now).map(drop)
    }

    /// Runs every check and hands back the decoded token on success.
    #[tracing::instrument(skip_all, fields(credential_type = ?credential.credential_type()))]
    fn verified_token(&self, credential: &Credential, now: i64) -> Result<Token> {
        let Some(presented) = credential.token() else {
            tracing::warn!("Credential carries no token");
            return Err(AuthError::rejected(ErrorCode::CredentialIsMissing));
        };

        let stored = match self.tokens.get_by_signed_token(presented) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::warn!("Presented token is not known to the repository");
                return Err(AuthError::rejected(ErrorCode::SignedJwtTokenNotFound));
            },
            Err(e) => {
                tracing::warn!(error = %e, "Token lookup failed, treating as not found");
                return Err(AuthError::rejected(ErrorCode::SignedJwtTokenNotFound));
            },
        };

        let token = Token::parse(&stored).map_err(|e| {
            tracing::warn!(error = %e, "Stored token is malformed");
            AuthError::rejected(ErrorCode::MalformedToken)
        })?;

        if let Err(errors) = JwtVerifier::verify_at(&token, &self.context, now) {
            tracing::warn!(codes = %errors, "Token rejected by verifier chain");
            return Err(errors.into());
        }

        tracing::debug!(sub = token.payload().subject(), "Token authenticated");
        Ok(token)
    }
}

impl Authenticator for JwtAuth {
    fn authenticate(&self, credential: &Credential) -> Result<()> {
        self.authenticate_at(credential, Utc::now().timestamp())
    }
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth").field("context", &self.context).finish_non_exhaustive()
    }
}

/// Authenticates a refresh token.
///
/// Behaves exactly like [`JwtAuth`]. With
/// [`require_token_use`](Self::require_token_use) enabled it additionally
/// rejects tokens whose `token_use` claim is not `refresh`, so an access
/// token cannot be presented in its place.
#[derive(Clone, Debug)]
pub struct JwtRefreshTokenAuth {
    inner: JwtAuth,
    require_token_use: bool,
}

impl JwtRefreshTokenAuth {
    /// Creates a refresh token authenticator.
    #[must_use]
    pub fn new(tokens: Arc<dyn SignedTokenRepository>, context: VerificationContext) -> Self {
        Self { inner: JwtAuth::new(tokens, context), require_token_use: false }
    }

    /// Enables or disables the `token_use` check.
    #[must_use]
    pub fn require_token_use(mut self, require: bool) -> Self {
        self.require_token_use = require;
        self
    }

    /// Authenticates `credential` as of `now` (seconds since the epoch).
    ///
    /// # Errors
    ///
    /// Same as [`JwtAuth::authenticate_at`], plus [`ErrorCode::InvalidTokenUse`] when the
    /// `token_use` check is enabled and fails.
    pub fn authenticate_at(&self, credential: &Credential, now: i64) -> Result<()> {
        let token = self.inner.verified_token(credential, now)?;
        if self.require_token_use && token.payload().token_use() != Some(REFRESH_TOKEN_USE) {
            tracing::warn!(token_use = token.payload().token_use(), "Token is not a refresh token");
            return Err(AuthError::rejected(ErrorCode::InvalidTokenUse));
        }
        Ok(())
    }
}

impl Authenticator for JwtRefreshTokenAuth {
    fn authenticate(&self, credential: &Credential) -> Result<()> {
        self.authenticate_at(credential, Utc::now().timestamp())
    }
}

/// Authenticates a username/password pair against stored hashes.
#[derive(Clone)]
pub struct UsernamePasswordAuth {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl UsernamePasswordAuth {
    /// Creates an authenticator over `users`, comparing with `passwords`.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordVerifier>) -> Self {
        Self { users, passwords }
    }
}

impl Authenticator for UsernamePasswordAuth {
    #[tracing::instrument(skip_all, fields(username = tracing::field::Empty))]
    fn authenticate(&self, credential: &Credential) -> Result<()> {
        let (Some(username), Some(password)) =
            (credential.get(USERNAME_KEY), credential.get(PASSWORD_KEY))
        else {
            tracing::warn!("Credential is missing username or password");
            return Err(AuthError::rejected(ErrorCode::CredentialIsMissing));
        };
        tracing::Span::current().record("username", username);

        let user = match self.users.get_by_username(username) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!("Unknown username");
                return Err(AuthError::rejected(ErrorCode::UsernameNotFound));
            },
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed, treating as not found");
                return Err(AuthError::rejected(ErrorCode::UsernameNotFound));
            },
        };

        let matches = user.hashed_password().is_some_and(|hash| self.passwords.is_valid(password, hash));
        if !matches {
            tracing::warn!("Password mismatch");
            return Err(AuthError::rejected(ErrorCode::InvalidPassword));
        }

        tracing::debug!("User authenticated");
        Ok(())
    }
}

impl std::fmt::Debug for UsernamePasswordAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernamePasswordAuth").finish_non_exhaustive()
    }
}
