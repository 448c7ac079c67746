//! Credentials passed from factories to authenticators.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Credential value key holding a signed token.
pub const TOKEN_KEY: &str = "token";
/// Credential value key holding a username.
pub const USERNAME_KEY: &str = "username";
/// Credential value key holding a plaintext password.
pub const PASSWORD_KEY: &str = "password";

/// What a credential carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialType {
    /// A freshly issued access token.
    AccessToken,
    /// A freshly issued refresh token.
    RefreshToken,
    /// An already-issued token presented for verification.
    SignedTokenVerification,
    /// A username/password pair.
    UsernamePassword,
}

/// Immutable bundle of authentication values.
///
/// # Example
///
/// ```
/// use sigil_authn::credential::{Credential, CredentialType};
///
/// let credential = Credential::username_password("bob", "secret");
/// assert_eq!(credential.credential_type(), CredentialType::UsernamePassword);
/// assert_eq!(credential.get("username"), Some("bob"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    credential_type: CredentialType,
    values: BTreeMap<String, String>,
}

impl Credential {
    /// Creates a credential from raw values.
    #[must_use]
    pub fn new<K, V>(credential_type: CredentialType, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            credential_type,
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Wraps an already-issued token for the authentication pipeline.
    ///
    /// `values` may carry extra context next to the token; they are kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidArgument`] if `values` has no `token` entry.
    pub fn signed_token_verification<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let credential = Self::new(CredentialType::SignedTokenVerification, values);
        if !credential.values.contains_key(TOKEN_KEY) {
            return Err(AuthError::invalid_argument("the 'token' claim is required"));
        }
        Ok(credential)
    }

    /// Builds a username/password credential.
    #[must_use]
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        let values: [(&str, String); 2] =
            [(USERNAME_KEY, username.into()), (PASSWORD_KEY, password.into())];
        Self::new(CredentialType::UsernamePassword, values)
    }

    /// The credential type.
    #[must_use]
    pub fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The signed token, if this credential carries one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.get(TOKEN_KEY)
    }

    /// All values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        f.debug_struct("Credential")
            .field("credential_type", &self.credential_type)
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_token_verification_requires_token() {
        let err = Credential::signed_token_verification([("client", "c1")]).unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument { .. }));

        let credential =
            Credential::signed_token_verification([("token", "h.p.s"), ("client", "c1")]).unwrap();
        assert_eq!(credential.credential_type(), CredentialType::SignedTokenVerification);
        assert_eq!(credential.token(), Some("h.p.s"));
        assert_eq!(credential.get("client"), Some("c1"));
    }

    #[test]
    fn test_username_password() {
        let credential = Credential::username_password("bob", "secret");
        assert_eq!(credential.get(USERNAME_KEY), Some("bob"));
        assert_eq!(credential.get(PASSWORD_KEY), Some("secret"));
        assert_eq!(credential.token(), None);
    }

    #[test]
    fn test_debug_hides_values() {
        let rendered = format!("{:?}", Credential::username_password("bob", "hunter2"));
        assert!(rendered.contains("password"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_credential_type_serde() {
        let json = serde_json::to_string(&CredentialType::SignedTokenVerification).unwrap();
        assert_eq!(json, "\"SIGNED_TOKEN_VERIFICATION\"");
    }
}
