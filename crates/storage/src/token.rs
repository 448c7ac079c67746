//! Repository of previously issued signed tokens.
//!
//! Authenticators use [`SignedTokenRepository`] to confirm that a presented
//! token was actually issued and persisted before spending time verifying its
//! claims. A token missing from the repository is rejected without ever
//! reaching the verifier chain.

use std::{collections::HashSet, sync::Arc};

use parking_lot::RwLock;

use crate::error::{StorageError, StorageResult};

/// Lookup of signed tokens by their canonical string form.
///
/// Implementations may apply their own locking or transaction discipline.
/// Callers issue at most one read per authentication attempt.
pub trait SignedTokenRepository: Send + Sync {
    /// Returns whether the exact signed token string is known.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn has(&self, signed_token: &str) -> StorageResult<bool>;

    /// Returns the stored signed token string, if present.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))` if the token exists
    /// - `Ok(None)` if it was never issued or has been removed
    /// - `Err(...)` on storage errors
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn get_by_signed_token(&self, signed_token: &str) -> StorageResult<Option<String>>;
}

impl<R: SignedTokenRepository + ?Sized> SignedTokenRepository for Arc<R> {
    fn has(&self, signed_token: &str) -> StorageResult<bool> {
        (**self).has(signed_token)
    }

    fn get_by_signed_token(&self, signed_token: &str) -> StorageResult<Option<String>> {
        (**self).get_by_signed_token(signed_token)
    }
}

/// In-memory implementation of [`SignedTokenRepository`].
///
/// Stores token strings in a thread-safe set. Suitable for tests and for
/// embedding in single-process deployments; nothing is persisted.
///
/// # Examples
///
/// ```
/// use sigil_storage::{MemoryTokenRepository, SignedTokenRepository};
///
/// let repo = MemoryTokenRepository::new();
/// repo.insert("aaa.bbb.ccc").unwrap();
///
/// assert!(repo.has("aaa.bbb.ccc").unwrap());
/// assert_eq!(repo.get_by_signed_token("xxx.yyy.zzz").unwrap(), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenRepository {
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl MemoryTokenRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issued token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if the token is already stored.
    #[tracing::instrument(skip_all)]
    pub fn insert(&self, signed_token: impl Into<String>) -> StorageResult<()> {
        let signed_token = signed_token.into();
        let mut tokens = self.tokens.write();
        if tokens.contains(&signed_token) {
            return Err(StorageError::already_exists(redact(&signed_token)));
        }
        tokens.insert(signed_token);
        Ok(())
    }

    /// Forgets a token, e.g. on logout or refresh rotation.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the token is unknown.
    #[tracing::instrument(skip_all)]
    pub fn remove(&self, signed_token: &str) -> StorageResult<()> {
        if self.tokens.write().remove(signed_token) {
            Ok(())
        } else {
            Err(StorageError::not_found(redact(signed_token)))
        }
    }

    /// Number of stored tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Returns `true` if no token is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl SignedTokenRepository for MemoryTokenRepository {
    #[tracing::instrument(skip_all)]
    fn has(&self, signed_token: &str) -> StorageResult<bool> {
        Ok(self.tokens.read().contains(signed_token))
    }

    #[tracing::instrument(skip_all)]
    fn get_by_signed_token(&self, signed_token: &str) -> StorageResult<Option<String>> {
        Ok(self.tokens.read().get(signed_token).cloned())
    }
}

/// Keeps only the header segment so full tokens never land in error messages.
fn redact(signed_token: &str) -> String {
    match signed_token.split_once('.') {
        Some((header, _)) => format!("{header}.…"),
        None => "<malformed>".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_lookup() {
        let repo = MemoryTokenRepository::new();
        repo.insert("h.p.s").unwrap();

        assert!(repo.has("h.p.s").unwrap());
        assert_eq!(repo.get_by_signed_token("h.p.s").unwrap().as_deref(), Some("h.p.s"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_unknown_token_is_none() {
        let repo = MemoryTokenRepository::new();
        assert!(!repo.has("h.p.s").unwrap());
        assert!(repo.get_by_signed_token("h.p.s").unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let repo = MemoryTokenRepository::new();
        repo.insert("h.p.s").unwrap();
        let err = repo.insert("h.p.s").unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { ref key } if key == "h.…"));
    }

    #[test]
    fn test_remove() {
        let repo = MemoryTokenRepository::new();
        repo.insert("h.p.s").unwrap();
        repo.remove("h.p.s").unwrap();
        assert!(!repo.has("h.p.s").unwrap());
        assert!(matches!(repo.remove("h.p.s"), Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let repo = MemoryTokenRepository::new();
        repo.insert("h.p.s").unwrap();
        assert!(repo.get_by_signed_token("h.p.t").unwrap().is_none());
        assert!(repo.get_by_signed_token("h.p.s ").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let repo = MemoryTokenRepository::new();
        let clone = repo.clone();
        repo.insert("h.p.s").unwrap();
        assert!(clone.has("h.p.s").unwrap());
    }

    #[test]
    fn test_arc_dyn_repository() {
        let repo: Arc<dyn SignedTokenRepository> = {
            let memory = MemoryTokenRepository::new();
            memory.insert("h.p.s").unwrap();
            Arc::new(memory)
        };
        assert!(repo.has("h.p.s").unwrap());
    }
}
