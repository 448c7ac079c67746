//! User records and their repository.

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{StorageError, StorageResult};

/// A user as seen by password authentication.
///
/// Only the fields the authenticator needs are modeled. The hashed password
/// is optional: accounts created through an external identity provider have
/// no local password and can never pass a password check.
///
/// # Example
///
/// ```
/// use sigil_storage::UserRecord;
///
/// let user = UserRecord::builder()
///     .username("bob")
///     .hashed_password("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA")
///     .build();
///
/// assert_eq!(user.username, "bob");
/// assert!(user.hashed_password().is_some());
///
/// let sso_only = UserRecord::builder().username("alice").build();
/// assert!(sso_only.hashed_password().is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    /// Unique login name.
    #[builder(into)]
    pub username: String,

    /// PHC-format password hash, wrapped in [`Zeroizing`] so it is scrubbed
    /// from memory on drop.
    #[builder(with = |hash: impl Into<String>| Zeroizing::new(hash.into()))]
    #[serde(default)]
    pub hashed_password: Option<Zeroizing<String>>,
}

impl UserRecord {
    /// Returns the stored password hash, or `None` if the account has no
    /// local password.
    #[must_use]
    pub fn hashed_password(&self) -> Option<&str> {
        self.hashed_password.as_deref().map(String::as_str)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("hashed_password", &self.hashed_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Lookup of users by username.
pub trait UserRepository: Send + Sync {
    /// Returns the user with the given username, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn get_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>>;
}

impl<R: UserRepository + ?Sized> UserRepository for Arc<R> {
    fn get_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        (**self).get_by_username(username)
    }
}

/// In-memory implementation of [`UserRepository`].
///
/// # Thread Safety
///
/// Uses [`parking_lot::RwLock`]; clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if the username is taken.
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    pub fn insert(&self, user: UserRecord) -> StorageResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(StorageError::already_exists(user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }
}

impl UserRepository for MemoryUserRepository {
    #[tracing::instrument(skip(self))]
    fn get_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        Ok(self.users.read().get(username).cloned())
    }
}
