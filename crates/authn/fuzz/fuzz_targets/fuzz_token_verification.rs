//! Structured fuzz target for the verifier chain.
//!
//! Builds plausible JWTs from `arbitrary` inputs, optionally signs them with
//! the fuzzing key, and runs them through the full chain. The chain must
//! never panic, and a token that passes must carry a signature produced by
//! the fuzzing key.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use libfuzzer_sys::fuzz_target;
use sigil_authn::{HmacSigner, JwtVerifier, Signer, Token, VerificationContext};

#[derive(Debug, Arbitrary)]
enum FuzzedAlg {
    Hs256,
    Hs384,
    None,
    Other(String),
}

#[derive(Debug, Arbitrary)]
struct FuzzedJwt {
    alg: FuzzedAlg,
    iss: Option<String>,
    sub: Option<String>,
    aud: Vec<String>,
    exp: Option<i64>,
    nbf: Option<i64>,
    exp_as_text: bool,
    sign: bool,
    trailing_signature: Vec<u8>,
    now: i64,
    expected_issuer: Option<String>,
    expected_audience: Vec<String>,
}

fuzz_target!(|input: FuzzedJwt| {
    let Ok(signer) = HmacSigner::new("HS256", b"fuzz-secret") else {
        return;
    };
    let signer: Arc<dyn Signer> = Arc::new(signer);

    let alg = match &input.alg {
        FuzzedAlg::Hs256 => "HS256".to_owned(),
        FuzzedAlg::Hs384 => "HS384".to_owned(),
        FuzzedAlg::None => "none".to_owned(),
        FuzzedAlg::Other(s) => s.clone(),
    };

    let mut claims = serde_json::Map::new();
    if let Some(iss) = &input.iss {
        claims.insert("iss".into(), iss.clone().into());
    }
    if let Some(sub) = &input.sub {
        claims.insert("sub".into(), sub.clone().into());
    }
    claims.insert("aud".into(), input.aud.clone().into());
    if let Some(exp) = input.exp {
        let value = if input.exp_as_text { exp.to_string().into() } else { exp.into() };
        claims.insert("exp".into(), value);
    }
    if let Some(nbf) = input.nbf {
        claims.insert("nbf".into(), nbf.into());
    }

    let Ok(header) = serde_json::to_vec(&serde_json::json!({"alg": alg, "typ": "JWT"})) else {
        return;
    };
    let Ok(payload) = serde_json::to_vec(&claims) else {
        return;
    };
    let signing_input =
        format!("{}.{}", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(payload));
    let signature = if input.sign {
        signer.sign(signing_input.as_bytes()).unwrap_or_default()
    } else {
        input.trailing_signature.clone()
    };
    let raw = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(&signature));

    let Ok(token) = Token::parse(&raw) else {
        return;
    };
    let ctx = VerificationContext::builder()
        .signer(signer.clone())
        .maybe_issuer(input.expected_issuer.clone())
        .audience(input.expected_audience.clone())
        .build();

    let first = JwtVerifier::verify_at(&token, &ctx, input.now);
    assert_eq!(first, JwtVerifier::verify_at(&token, &ctx, input.now));

    if first.is_ok() {
        assert_eq!(token.header().alg, "HS256");
        assert!(signer.verify(token.signature(), token.signing_input().as_bytes()));
    }
});
