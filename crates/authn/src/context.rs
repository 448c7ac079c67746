//! Expected claim values a token is judged against.

use std::{sync::Arc, time::Duration};

use crate::signer::Signer;

/// Caller-supplied expectations for one verification.
///
/// Unset `issuer`/`subject` and an empty `audience` disable the
/// corresponding check. `leeway` widens the `exp` and `nbf` comparisons to
/// tolerate clock skew; it defaults to zero.
///
/// # Example
///
/// ```
/// use std::{sync::Arc, time::Duration};
/// use sigil_authn::{HmacSigner, VerificationContext};
///
/// let ctx = VerificationContext::builder()
///     .signer(Arc::new(HmacSigner::new("HS256", b"secret")?))
///     .issuer("app")
///     .audience(vec!["c1".to_owned()])
///     .leeway(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(ctx.issuer(), Some("app"));
/// assert_eq!(ctx.subject(), None);
/// # Ok::<(), sigil_authn::AuthError>(())
/// ```
#[derive(Clone, Debug, bon::Builder)]
pub struct VerificationContext {
    /// Signer used to check the token signature.
    signer: Arc<dyn Signer>,

    /// Expected `iss`.
    #[builder(into)]
    issuer: Option<String>,

    /// Expected `sub`.
    #[builder(into)]
    subject: Option<String>,

    /// Accepted audiences; the token must name at least one of them.
    #[builder(default)]
    audience: Vec<String>,

    /// Clock-skew allowance for `exp` and `nbf`.
    #[builder(default)]
    leeway: Duration,
}

impl VerificationContext {
    /// Creates a context that only checks signature and validity window.
    #[must_use]
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self::builder().signer(signer).build()
    }

    /// The signer.
    #[must_use]
    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    /// Expected issuer, if any.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Expected subject, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Accepted audiences.
    #[must_use]
    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    /// Clock-skew allowance.
    #[must_use]
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// [`leeway`](Self::leeway) in whole seconds, saturating.
    pub(crate) fn leeway_secs(&self) -> i64 {
        i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX)
    }
}
