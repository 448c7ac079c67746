//! Fuzz target for token parsing.
//!
//! Feeds arbitrary strings to `Token::parse`. Every input must produce
//! either a token or `AuthError::InvalidTokenFormat`, never a panic. Parsed
//! tokens must re-render to exactly the input text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sigil_authn::{AuthError, ClaimValue, Token};

fuzz_target!(|data: &[u8]| {
    // Tokens are always UTF-8 strings
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    match Token::parse(raw) {
        Ok(token) => {
            assert_eq!(token.as_str(), raw);
            assert!(raw.starts_with(token.signing_input()));

            // Claim accessors must tolerate any value shape
            let payload = token.payload();
            let _ = payload.issuer();
            let _ = payload.audience();
            let _ = payload.expiration();
            let _ = payload.not_before();
            for (_, value) in payload.iter() {
                let _ = value.as_timestamp();
                let _ = ClaimValue::as_strings(value);
            }

            let _ = sigil_authn::validate_algorithm(&token.header().alg);
        },
        Err(AuthError::InvalidTokenFormat { .. }) => {},
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
