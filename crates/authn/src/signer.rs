//! Signers.
//!
//! A [`Signer`] produces and checks signatures over arbitrary bytes. Two
//! implementations exist:
//!
//! - [`HmacSigner`]: one symmetric secret, `HS*` algorithms
//! - [`RsaSigner`]: private key for signing, public key for verification, `RS*` algorithms
//!
//! Key material is parsed once at construction; signers hold no per-request
//! state and are shared behind `Arc` across concurrent authentications.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, crypto};

use crate::{
    algorithm::{AlgorithmFamily, AlgorithmRegistry},
    error::{AuthError, Result},
};

/// Capability to sign and verify byte strings with one fixed algorithm.
pub trait Signer: Send + Sync + fmt::Debug {
    /// The primitive used by this signer.
    fn algorithm(&self) -> Algorithm;

    /// Symbolic name of [`algorithm`](Self::algorithm), e.g. `"HS256"`.
    fn algorithm_name(&self) -> &'static str;

    /// Family this signer belongs to.
    fn family(&self) -> AlgorithmFamily;

    /// Signs `payload`, returning raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the primitive reports failure.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;

    /// Checks `signature` against `payload`. Never errors; any failure is `false`.
    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool;

    /// Resolves an algorithm name for use with this signer.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidAlgorithm`] if the name belongs to another family
    /// - [`AuthError::UnsupportedAlgorithm`] if the name is not registered
    fn resolve_algorithm(&self, name: &str) -> Result<Algorithm> {
        resolve_in_family(name, self.family())
    }
}

/// Resolves `name` after checking its family prefix.
fn resolve_in_family(name: &str, family: AlgorithmFamily) -> Result<Algorithm> {
    if !name.starts_with(family.prefix()) {
        return Err(AuthError::invalid_algorithm(format!(
            "'{name}' cannot be used with a {family} signer"
        )));
    }
    Ok(AlgorithmRegistry::new(name)?.current())
}

fn registry_for(name: &str, family: AlgorithmFamily) -> Result<AlgorithmRegistry> {
    resolve_in_family(name, family)?;
    AlgorithmRegistry::new(name)
}

fn encode_and_verify(
    signature: &[u8],
    payload: &[u8],
    key: &DecodingKey,
    algorithm: Algorithm,
) -> bool {
    let encoded = URL_SAFE_NO_PAD.encode(signature);
    crypto::verify(&encoded, payload, key, algorithm).unwrap_or(false)
}

fn sign_and_decode(payload: &[u8], key: &EncodingKey, algorithm: Algorithm) -> Result<Vec<u8>> {
    let encoded = crypto::sign(payload, key, algorithm)
        .map_err(|e| AuthError::signing(format!("{algorithm:?}: {e}")))?;
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| AuthError::signing(format!("primitive returned invalid base64: {e}")))
}

/// HMAC signer for `HS256`, `HS384` and `HS512`.
///
/// # Example
///
/// ```
/// use sigil_authn::{HmacSigner, Signer};
///
/// let signer = HmacSigner::new("HS256", b"top-secret")?;
/// let sig = signer.sign(b"header.payload")?;
/// assert!(signer.verify(&sig, b"header.payload"));
/// assert!(!signer.verify(&sig, b"header.payloaD"));
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone)]
pub struct HmacSigner {
    registry: AlgorithmRegistry,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl HmacSigner {
    /// Creates an HMAC signer.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidAlgorithm`] if `algorithm` does not start with `H`
    /// - [`AuthError::UnsupportedAlgorithm`] if it is not registered
    /// - [`AuthError::InvalidKey`] if the secret is empty
    pub fn new(algorithm: &str, secret: impl AsRef<[u8]>) -> Result<Self> {
        let registry = registry_for(algorithm, AlgorithmFamily::Hmac)?;
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::invalid_key("HMAC secret must not be empty"));
        }
        Ok(Self {
            registry,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner").field("algorithm", &self.registry.current_name()).finish()
    }
}

impl Signer for HmacSigner {
    fn algorithm(&self) -> Algorithm {
        self.registry.current()
    }

    fn algorithm_name(&self) -> &'static str {
        self.registry.current_name()
    }

    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Hmac
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        sign_and_decode(payload, &self.encoding, self.algorithm())
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        // Recomputes the MAC and compares in constant time.
        encode_and_verify(signature, payload, &self.decoding, self.algorithm())
    }
}

/// RSA signer for `RS256`, `RS384` and `RS512`.
///
/// Verification-only instances (no private key) are built with
/// [`RsaSigner::verifier`]; signing with them fails.
#[derive(Clone)]
pub struct RsaSigner {
    registry: AlgorithmRegistry,
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
}

impl RsaSigner {
    /// Creates a signer able to sign and verify.
    ///
    /// Both keys are PEM encoded (PKCS#1 or PKCS#8 private key, PKCS#1 or
    /// SPKI public key).
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidAlgorithm`] if `algorithm` does not start with `R`
    /// - [`AuthError::UnsupportedAlgorithm`] if it is not registered
    /// - [`AuthError::InvalidKey`] if either PEM document cannot be read
    pub fn new(algorithm: &str, private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<Self> {
        let registry = registry_for(algorithm, AlgorithmFamily::Rsa)?;
        Ok(Self {
            registry,
            encoding: Some(EncodingKey::from_rsa_pem(private_key_pem)?),
            decoding: DecodingKey::from_rsa_pem(public_key_pem)?,
        })
    }

    /// Creates a verification-only signer from a public key.
    ///
    /// # Errors
    ///
    /// Same as [`RsaSigner::new`].
    pub fn verifier(algorithm: &str, public_key_pem: &[u8]) -> Result<Self> {
        let registry = registry_for(algorithm, AlgorithmFamily::Rsa)?;
        Ok(Self { registry, encoding: None, decoding: DecodingKey::from_rsa_pem(public_key_pem)? })
    }

    /// Whether this signer holds a private key.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.encoding.is_some()
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("algorithm", &self.registry.current_name())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl Signer for RsaSigner {
    fn algorithm(&self) -> Algorithm {
        self.registry.current()
    }

    fn algorithm_name(&self) -> &'static str {
        self.registry.current_name()
    }

    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Rsa
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let key = self
            .encoding
            .as_ref()
            .ok_or_else(|| AuthError::signing("RSA signer holds no private key"))?;
        sign_and_decode(payload, key, self.algorithm())
    }

    fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        if signature.is_empty() {
            return false;
        }
        encode_and_verify(signature, payload, &self.decoding, self.algorithm())
    }
}
