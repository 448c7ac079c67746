//! Algorithm registry.
//!
//! Maps the symbolic names carried in JWT headers to the signing primitives
//! of [`jsonwebtoken`]. The table is fixed at compile time; a registry value
//! only adds the "current" algorithm chosen at construction.

use std::{collections::BTreeMap, fmt};

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use crate::{error::AuthError, validation::validate_algorithm};

/// The fixed name → primitive table.
const TABLE: [(&str, Algorithm); 6] = [
    ("HS256", Algorithm::HS256),
    ("HS384", Algorithm::HS384),
    ("HS512", Algorithm::HS512),
    ("RS256", Algorithm::RS256),
    ("RS384", Algorithm::RS384),
    ("RS512", Algorithm::RS512),
];

/// Signer family an algorithm belongs to, derived from its name prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmFamily {
    /// Symmetric keyed digest; names start with `H`.
    Hmac,
    /// Asymmetric RSA PKCS#1 v1.5 signature; names start with `R`.
    Rsa,
}

impl AlgorithmFamily {
    /// Family of a symbolic name, or `None` if the prefix is neither `H` nor `R`.
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        match name.as_bytes().first() {
            Some(b'H') => Some(Self::Hmac),
            Some(b'R') => Some(Self::Rsa),
            _ => None,
        }
    }

    /// The required first character of names in this family.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Hmac => 'H',
            Self::Rsa => 'R',
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hmac => f.write_str("HMAC"),
            Self::Rsa => f.write_str("RSA"),
        }
    }
}

/// Pure lookup table plus the algorithm selected at construction.
///
/// # Example
///
/// ```
/// use jsonwebtoken::Algorithm;
/// use sigil_authn::AlgorithmRegistry;
///
/// let registry = AlgorithmRegistry::new("HS384")?;
/// assert_eq!(registry.current(), Algorithm::HS384);
/// assert_eq!(AlgorithmRegistry::get("RS256"), Some(Algorithm::RS256));
/// assert!(!AlgorithmRegistry::is_available("ES256"));
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmRegistry {
    name: &'static str,
    current: Algorithm,
}

impl AlgorithmRegistry {
    /// Creates a registry whose current algorithm is `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedAlgorithm`] if `name` is forbidden or
    /// not one of the six registered algorithms.
    pub fn new(name: &str) -> Result<Self, AuthError> {
        validate_algorithm(name)?;
        TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(name, current)| Self { name, current })
            .ok_or_else(|| AuthError::unsupported_algorithm(format!("Algorithm '{name}'")))
    }

    /// Resolves a symbolic name to its primitive.
    #[must_use]
    pub fn get(name: &str) -> Option<Algorithm> {
        TABLE.iter().find(|(n, _)| *n == name).map(|&(_, alg)| alg)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn is_available(name: &str) -> bool {
        Self::get(name).is_some()
    }

    /// The full table.
    #[must_use]
    pub fn all() -> BTreeMap<&'static str, Algorithm> {
        TABLE.into_iter().collect()
    }

    /// Symbolic name of a registered primitive.
    #[must_use]
    pub fn name_of(algorithm: Algorithm) -> Option<&'static str> {
        TABLE.iter().find(|(_, a)| *a == algorithm).map(|&(name, _)| name)
    }

    /// The algorithm selected at construction.
    #[must_use]
    pub fn current(&self) -> Algorithm {
        self.current
    }

    /// Symbolic name of the current algorithm.
    #[must_use]
    pub fn current_name(&self) -> &'static str {
        self.name
    }

    /// Family of the current algorithm.
    #[must_use]
    pub fn family(&self) -> AlgorithmFamily {
        match self.current {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            _ => AlgorithmFamily::Rsa,
        }
    }
}
