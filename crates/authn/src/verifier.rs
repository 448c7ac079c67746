//! Verifier chain.
//!
//! Six independent [`ClaimVerifier`]s each judge one aspect of a decoded
//! token against a [`VerificationContext`]. [`JwtVerifier`] runs all of them
//! in a fixed order, never stopping at the first failure, and collects one
//! [`ErrorCode`] per failing verifier. A token is valid only if the list
//! stays empty.
//!
//! | Verifier | Fails with |
//! |---|---|
//! | [`IssuerVerifier`] | `INVALID_ISSUER` |
//! | [`AudienceVerifier`] | `INVALID_AUDIENCE` |
//! | [`SubjectVerifier`] | `INVALID_SUBJECT` |
//! | [`SignatureVerifier`] | `INVALID_SIGNATURE`, `INVALID_ALGORITHM`, `MISS_MATCH_SIGNATURE` |
//! | [`ExpirationVerifier`] | `TOKEN_EXPIRED` |
//! | [`NotBeforeTimeVerifier`] | `TOKEN_USED_BEFORE_THE_TIME` |

use chrono::Utc;

use crate::{
    algorithm::AlgorithmRegistry,
    context::VerificationContext,
    error::{ErrorCode, VerificationErrors},
    token::Token,
    validation::validate_algorithm,
};

/// One rule checked against a decoded token.
pub trait ClaimVerifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks `token` at time `now` (seconds since the epoch).
    ///
    /// # Errors
    ///
    /// Returns the code describing the failure.
    fn verify(&self, token: &Token, ctx: &VerificationContext, now: i64) -> Result<(), ErrorCode>;
}

/// Passes when no issuer is expected or `iss` equals it.
#[derive(Clone, Copy, Debug, Default)]
pub struct IssuerVerifier;

impl ClaimVerifier for IssuerVerifier {
    fn name(&self) -> &'static str {
        "issuer"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, _now: i64) -> Result<(), ErrorCode> {
        match ctx.issuer() {
            Some(expected) if token.payload().issuer() != Some(expected) => {
                Err(ErrorCode::InvalidIssuer)
            },
            _ => Ok(()),
        }
    }
}

/// Passes when no audience is expected or `aud` shares at least one entry
/// with the expected set.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudienceVerifier;

impl ClaimVerifier for AudienceVerifier {
    fn name(&self) -> &'static str {
        "audience"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, _now: i64) -> Result<(), ErrorCode> {
        let expected = ctx.audience();
        if expected.is_empty() {
            return Ok(());
        }
        let presented = token.payload().audience();
        if presented.iter().any(|aud| expected.iter().any(|e| e == aud)) {
            Ok(())
        } else {
            Err(ErrorCode::InvalidAudience)
        }
    }
}

/// Passes when no subject is expected or `sub` equals it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubjectVerifier;

impl ClaimVerifier for SubjectVerifier {
    fn name(&self) -> &'static str {
        "subject"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, _now: i64) -> Result<(), ErrorCode> {
        match ctx.subject() {
            Some(expected) if token.payload().subject() != Some(expected) => {
                Err(ErrorCode::InvalidSubject)
            },
            _ => Ok(()),
        }
    }
}

/// Checks the signature over the transmitted `header.payload` text.
///
/// In order: an empty signature is `INVALID_SIGNATURE`; a header algorithm
/// that is forbidden, unregistered or different from the context signer's
/// is `INVALID_ALGORITHM`; a signature the signer rejects is
/// `MISS_MATCH_SIGNATURE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureVerifier;

impl ClaimVerifier for SignatureVerifier {
    fn name(&self) -> &'static str {
        "signature"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, _now: i64) -> Result<(), ErrorCode> {
        if token.signature().is_empty() {
            return Err(ErrorCode::InvalidSignature);
        }

        let alg = token.header().alg.as_str();
        if validate_algorithm(alg).is_err() || !AlgorithmRegistry::is_available(alg) {
            return Err(ErrorCode::InvalidAlgorithm);
        }
        // The signer decides the algorithm; a header naming another one is
        // an algorithm confusion attempt.
        if alg != ctx.signer().algorithm_name() {
            return Err(ErrorCode::InvalidAlgorithm);
        }

        if ctx.signer().verify(token.signature(), token.signing_input().as_bytes()) {
            Ok(())
        } else {
            Err(ErrorCode::MissMatchSignature)
        }
    }
}

/// Passes when `exp` is strictly after `now` (widened by the leeway).
///
/// A missing or unparseable `exp` fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpirationVerifier;

impl ClaimVerifier for ExpirationVerifier {
    fn name(&self) -> &'static str {
        "expiration"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, now: i64) -> Result<(), ErrorCode> {
        match token.payload().expiration() {
            Some(exp) if exp.saturating_add(ctx.leeway_secs()) > now => Ok(()),
            _ => Err(ErrorCode::TokenExpired),
        }
    }
}

/// Passes when `nbf` is absent or not after `now` (widened by the leeway).
///
/// An `nbf` that is present but unparseable fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotBeforeTimeVerifier;

impl ClaimVerifier for NotBeforeTimeVerifier {
    fn name(&self) -> &'static str {
        "not_before"
    }

    fn verify(&self, token: &Token, ctx: &VerificationContext, now: i64) -> Result<(), ErrorCode> {
        let payload = token.payload();
        if !payload.contains(crate::token::claims::NOT_BEFORE) {
            return Ok(());
        }
        match payload.not_before() {
            Some(nbf) if nbf.saturating_sub(ctx.leeway_secs()) <= now => Ok(()),
            _ => Err(ErrorCode::TokenUsedBeforeTheTime),
        }
    }
}

const CHAIN: [&dyn ClaimVerifier; 6] = [
    &IssuerVerifier,
    &AudienceVerifier,
    &SubjectVerifier,
    &SignatureVerifier,
    &ExpirationVerifier,
    &NotBeforeTimeVerifier,
];

/// Runs the full verifier chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct JwtVerifier;

impl JwtVerifier {
    /// Verifies `token` against `ctx` at the current time.
    ///
    /// # Errors
    ///
    /// Returns every failing verifier's code, in chain order.
    pub fn verify(token: &Token, ctx: &VerificationContext) -> Result<(), VerificationErrors> {
        Self::verify_at(token, ctx, Utc::now().timestamp())
    }

    /// Verifies `token` against `ctx` at time `now` (seconds since the epoch).
    ///
    /// Pure: the same inputs always give the same result.
    ///
    /// # Errors
    ///
    /// Returns every failing verifier's code, in chain order.
    #[tracing::instrument(
        skip(token, ctx),
        fields(alg = %token.header().alg, signer = ctx.signer().algorithm_name())
    )]
    pub fn verify_at(
        token: &Token,
        ctx: &VerificationContext,
        now: i64,
    ) -> Result<(), VerificationErrors> {
        let mut errors = VerificationErrors::new();
        for verifier in CHAIN {
            if let Err(code) = verifier.verify(token, ctx, now) {
                tracing::debug!(verifier = verifier.name(), %code, "Verifier failed");
                errors.push(code);
            }
        }

        if errors.is_empty() {
            tracing::debug!("Token verified");
            Ok(())
        } else {
            Err(errors)
        }
    }
}
