//! Integration test verifying that `#[instrument]` annotations on the
//! verifier chain and authenticators produce the expected spans, and that no
//! secret ever lands in a span field.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use sigil_authn::{
    Argon2PasswordVerifier, Authenticator, JwtAuth, JwtVerifier, Token, UsernamePasswordAuth,
    VerificationContext, hash_password, signed_token_verification_credential,
    testutil::{craft_signed_jwt, hmac_signer},
    username_password_credential,
};
use sigil_storage::{MemoryTokenRepository, MemoryUserRepository, UserRecord};
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

// ---------------------------------------------------------------------------
// Collecting layer: records span names, initial fields and later records
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct SpanCollector {
    spans: Arc<Mutex<Vec<String>>>,
}

impl<S> tracing_subscriber::Layer<S> for SpanCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let mut fields = String::new();
            attrs.record(&mut FieldWriter(&mut fields));
            self.spans.lock().expect("lock poisoned").push(format!("{}{}", span.name(), fields));
        }
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let mut fields = String::new();
            values.record(&mut FieldWriter(&mut fields));
            self.spans
                .lock()
                .expect("lock poisoned")
                .push(format!("{}.record{}", span.name(), fields));
        }
    }
}

struct FieldWriter<'a>(&'a mut String);

impl tracing::field::Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push_str(&format!(" {}={:?}", field.name(), value));
    }
}

fn collect<F: FnOnce()>(f: F) -> Vec<String> {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);

    let subscriber = tracing_subscriber::registry().with(collector);
    tracing::subscriber::with_default(subscriber, f);

    let recorded = spans.lock().expect("lock poisoned");
    recorded.clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn verifier_chain_records_algorithms() {
    let signer = hmac_signer("HS256");
    let raw = craft_signed_jwt(
        &serde_json::json!({"alg": "HS256"}),
        &serde_json::json!({"exp": 4_000_000_000_i64}),
        signer.as_ref(),
    );
    let token = Token::parse(&raw).unwrap();
    let ctx = VerificationContext::new(signer);

    let spans = collect(|| {
        let _ = JwtVerifier::verify(&token, &ctx);
    });
    assert!(
        spans.iter().any(|s| s.starts_with("verify_at") && s.contains("alg=HS256")),
        "expected a 'verify_at' span carrying the header algorithm, got: {spans:?}"
    );
}

#[test]
fn jwt_auth_never_records_the_token() {
    let signer = hmac_signer("HS256");
    let raw = craft_signed_jwt(
        &serde_json::json!({"alg": "HS256"}),
        &serde_json::json!({"exp": 4_000_000_000_i64, "secret": "do-not-log"}),
        signer.as_ref(),
    );
    let tokens = Arc::new(MemoryTokenRepository::new());
    tokens.insert(raw.as_str()).unwrap();
    let auth = JwtAuth::new(tokens, VerificationContext::new(signer));
    let credential = signed_token_verification_credential([("token", raw.as_str())]).unwrap();
    let payload_segment = raw.split('.').nth(1).unwrap().to_owned();

    let spans = collect(|| {
        auth.authenticate(&credential).unwrap();
    });
    assert!(spans.iter().any(|s| s.starts_with("verified_token")), "got: {spans:?}");
    assert!(spans.iter().any(|s| s.starts_with("get_by_signed_token")), "got: {spans:?}");
    assert!(
        spans.iter().all(|s| !s.contains(&payload_segment)),
        "token text leaked into span fields: {spans:?}"
    );
}

#[test]
fn password_auth_records_username_not_password() {
    let users = Arc::new(MemoryUserRepository::new());
    let hash = hash_password("hunter2").unwrap();
    users.insert(UserRecord::builder().username("bob").hashed_password(hash.as_str()).build()).unwrap();
    let auth = UsernamePasswordAuth::new(users, Arc::new(Argon2PasswordVerifier));

    let spans = collect(|| {
        auth.authenticate(&username_password_credential("bob", "hunter2")).unwrap();
    });
    assert!(
        spans.iter().any(|s| s.starts_with("authenticate.record") && s.contains("bob")),
        "expected the username to be recorded on the 'authenticate' span, got: {spans:?}"
    );
    assert!(spans.iter().all(|s| !s.contains("hunter2")), "password leaked: {spans:?}");
}
