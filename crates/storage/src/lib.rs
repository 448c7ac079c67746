//! # Sigil Storage
//!
//! Narrow repository interfaces consumed by the Sigil authenticators.
//!
//! The authentication layer never owns persistence. It reads through two
//! traits:
//!
//! - [`SignedTokenRepository`]: confirms that a presented token was issued
//! - [`UserRepository`]: resolves a username to a [`UserRecord`]
//!
//! In-memory implementations ([`MemoryTokenRepository`],
//! [`MemoryUserRepository`]) are provided for tests and single-process use.
//!
//! ## Example
//!
//! ```
//! use sigil_storage::{MemoryUserRepository, UserRecord, UserRepository};
//!
//! let users = MemoryUserRepository::new();
//! users.insert(UserRecord::builder().username("bob").build())?;
//!
//! assert!(users.get_by_username("bob")?.is_some());
//! # Ok::<(), sigil_storage::StorageError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Storage error types.
pub mod error;
/// Signed token repository.
pub mod token;
/// User records and repository.
pub mod user;

pub use error::{StorageError, StorageResult};
pub use token::{MemoryTokenRepository, SignedTokenRepository};
pub use user::{MemoryUserRepository, UserRecord, UserRepository};
