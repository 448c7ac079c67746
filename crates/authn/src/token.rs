//! JWT token model.
//!
//! A [`Token`] is the triple ([`Header`], [`Payload`], signature bytes) plus
//! its canonical three-segment string:
//!
//! ```text
//! base64url(JSON(header)) . base64url(JSON(payload)) . base64url(signature)
//! ```
//!
//! Tokens are built either at issuance ([`Token::issue`]) or by structurally
//! decoding an untrusted string ([`Token::parse`]). Parsing never checks the
//! signature; that is the job of the verifier chain. A parsed token keeps the
//! exact transmitted text so the signing input is never re-encoded.
//!
//! # Example
//!
//! ```
//! use sigil_authn::{HmacSigner, token::{Header, Payload, Token, claims}};
//!
//! let signer = HmacSigner::new("HS256", b"secret")?;
//! let mut payload = Payload::new();
//! payload.insert(claims::ISSUER, "app");
//! payload.insert(claims::EXPIRATION, 1_900_000_000_i64);
//!
//! let token = Token::issue(Header::new("HS256"), payload, &signer)?;
//! let parsed: Token = token.as_str().parse()?;
//!
//! assert_eq!(parsed.payload().issuer(), Some("app"));
//! assert_eq!(parsed, token);
//! # Ok::<(), sigil_authn::AuthError>(())
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AuthError, Result},
    signer::Signer,
};

/// Registered claim names.
pub mod claims {
    /// Issuer.
    pub const ISSUER: &str = "iss";
    /// Audience (string or list of strings).
    pub const AUDIENCE: &str = "aud";
    /// Subject.
    pub const SUBJECT: &str = "sub";
    /// Issued-at timestamp.
    pub const ISSUED_AT: &str = "iat";
    /// Not-before timestamp.
    pub const NOT_BEFORE: &str = "nbf";
    /// Expiration timestamp.
    pub const EXPIRATION: &str = "exp";
    /// Purpose the token was issued for (`access` or `refresh`).
    pub const TOKEN_USE: &str = "token_use";

    /// Claims set by the issuer before custom claims are merged.
    pub const RESERVED: &[&str] =
        &[ISSUER, AUDIENCE, SUBJECT, ISSUED_AT, NOT_BEFORE, EXPIRATION, TOKEN_USE];
}

/// The value of a single claim.
///
/// Deserialization tries the variants in order, so integers become
/// [`ClaimValue::Timestamp`], strings [`ClaimValue::Text`], string arrays
/// [`ClaimValue::List`], and anything else falls back to
/// [`ClaimValue::Json`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// A string.
    Text(String),
    /// A list of strings.
    List(Vec<String>),
    /// Any other JSON value (custom claims only).
    ///
    /// [`Payload`] stores integers, strings and string arrays given in this
    /// form under their typed variants.
    Json(serde_json::Value),
}

impl ClaimValue {
    /// The value as a string, if it is [`ClaimValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a point in time (seconds since the epoch).
    ///
    /// Integers are taken as-is; strings are accepted as a decimal integer or
    /// an RFC 3339 date-time. Anything else is not a timestamp.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Text(s) => s.trim().parse::<i64>().ok().or_else(|| {
                DateTime::parse_from_rfc3339(s.trim()).ok().map(|dt| dt.timestamp())
            }),
            _ => None,
        }
    }

    /// The value as a set of strings: one for `Text`, all for `List`.
    #[must_use]
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            Self::Text(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.timestamp())
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ClaimValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<serde_json::Value> for ClaimValue {
    fn from(value: serde_json::Value) -> Self {
        // Route through deserialization so plain strings and integers land in
        // their typed variants.
        serde_json::from_value(value.clone()).unwrap_or(Self::Json(value))
    }
}

impl ClaimValue {
    /// Moves a [`ClaimValue::Json`] holding an integer, string or string
    /// array into its typed variant, matching what decoding produces.
    fn normalized(self) -> Self {
        match self {
            Self::Json(value) => Self::from(value),
            other => other,
        }
    }
}

/// JOSE header: `{"alg": ..., "typ": "JWT"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Symbolic algorithm name.
    pub alg: String,
    /// Token type, always `JWT` for issued tokens.
    #[serde(default = "default_typ")]
    pub typ: String,
}

fn default_typ() -> String {
    Header::TYPE.to_owned()
}

impl Header {
    /// The `typ` value written on every issued token.
    pub const TYPE: &'static str = "JWT";

    /// Creates a header for the given algorithm name.
    #[must_use]
    pub fn new(alg: impl Into<String>) -> Self {
        Self { alg: alg.into(), typ: Self::TYPE.to_owned() }
    }

    /// Creates a header matching a signer's algorithm.
    #[must_use]
    pub fn for_signer(signer: &dyn Signer) -> Self {
        Self::new(signer.algorithm_name())
    }
}

/// Claim name → value mapping.
///
/// Inserting a name that already exists replaces the previous value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    claims: BTreeMap<String, ClaimValue>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a claim, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        self.claims.insert(name.into(), value.into().normalized())
    }

    /// Looks up a claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// Whether a claim is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Iterates over all claims in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if there are no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// `iss`, if present and a string.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.get(claims::ISSUER).and_then(ClaimValue::as_str)
    }

    /// `aud` as a set; a single string counts as a one-element set.
    #[must_use]
    pub fn audience(&self) -> Vec<&str> {
        self.get(claims::AUDIENCE).map(ClaimValue::as_strings).unwrap_or_default()
    }

    /// `sub`, if present and a string.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get(claims::SUBJECT).and_then(ClaimValue::as_str)
    }

    /// `iat`, if present and parseable.
    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.get(claims::ISSUED_AT).and_then(ClaimValue::as_timestamp)
    }

    /// `nbf`, if present and parseable.
    #[must_use]
    pub fn not_before(&self) -> Option<i64> {
        self.get(claims::NOT_BEFORE).and_then(ClaimValue::as_timestamp)
    }

    /// `exp`, if present and parseable.
    #[must_use]
    pub fn expiration(&self) -> Option<i64> {
        self.get(claims::EXPIRATION).and_then(ClaimValue::as_timestamp)
    }

    /// `token_use`, if present and a string.
    #[must_use]
    pub fn token_use(&self) -> Option<&str> {
        self.get(claims::TOKEN_USE).and_then(ClaimValue::as_str)
    }
}

impl<K: Into<String>, V: Into<ClaimValue>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { claims: iter.into_iter().map(|(k, v)| (k.into(), v.into().normalized())).collect() }
    }
}

impl IntoIterator for Payload {
    type Item = (String, ClaimValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}

/// A JWT: header, payload, signature and canonical string form.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: Payload,
    signature: Vec<u8>,
    encoded: String,
    /// Byte offset of the dot separating the payload and signature segments.
    signature_dot: usize,
}

impl Token {
    /// Builds and signs a token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidAlgorithm`] if the header algorithm differs from the signer's
    /// - [`AuthError::Serialization`] if the header or payload cannot be serialized
    /// - [`AuthError::Signing`] if the signer fails
    pub fn issue(header: Header, payload: Payload, signer: &dyn Signer) -> Result<Self> {
        if header.alg != signer.algorithm_name() {
            return Err(AuthError::invalid_algorithm(format!(
                "header declares '{}' but signer uses '{}'",
                header.alg,
                signer.algorithm_name()
            )));
        }

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?);
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = signer.sign(signing_input.as_bytes())?;

        let signature_dot = signing_input.len();
        let encoded = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(&signature));

        Ok(Self { header, payload, signature, encoded, signature_dot })
    }

    /// Structurally decodes an untrusted token string.
    ///
    /// The signature is decoded but not checked.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTokenFormat`] if:
    /// - The string does not have exactly 3 dot-separated parts
    /// - Any segment is not unpadded base64url
    /// - The header or payload is not the expected JSON object
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = parts.as_slice() else {
            return Err(AuthError::invalid_token_format(
                "JWT must have 3 parts separated by dots",
            ));
        };

        let header_bytes = URL_SAFE_NO_PAD.decode(header_b64).map_err(|e| {
            AuthError::invalid_token_format(format!("Failed to decode JWT header: {e}"))
        })?;
        let header: Header = serde_json::from_slice(&header_bytes).map_err(|e| {
            AuthError::invalid_token_format(format!("Failed to parse JWT header: {e}"))
        })?;

        let payload_bytes = URL_SAFE_NO_PAD.decode(payload_b64).map_err(|e| {
            AuthError::invalid_token_format(format!("Failed to decode JWT payload: {e}"))
        })?;
        let payload: Payload = serde_json::from_slice(&payload_bytes).map_err(|e| {
            AuthError::invalid_token_format(format!("Failed to parse JWT claims: {e}"))
        })?;

        let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
            AuthError::invalid_token_format(format!("Failed to decode JWT signature: {e}"))
        })?;

        Ok(Self {
            header,
            payload,
            signature,
            encoded: token.to_owned(),
            signature_dot: header_b64.len() + 1 + payload_b64.len(),
        })
    }

    /// The decoded header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The decoded claims.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Raw signature bytes (empty if the signature segment was empty).
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The first two segments exactly as transmitted: `header.payload`.
    #[must_use]
    pub fn signing_input(&self) -> &str {
        &self.encoded[..self.signature_dot]
    }

    /// The canonical three-segment string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Consumes the token, returning its string form.
    #[must_use]
    pub fn into_string(self) -> String {
        self.encoded
    }
}

impl FromStr for Token {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header)
            .field("payload", &self.payload)
            .field("signature_len", &self.signature.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{signer::HmacSigner, testutil::craft_raw_jwt};

    fn signer() -> HmacSigner {
        HmacSigner::new("HS256", b"secret").unwrap()
    }

    fn sample_payload() -> Payload {
        let mut payload = Payload::new();
        payload.insert(claims::ISSUER, "app");
        payload.insert(claims::AUDIENCE, vec!["c1", "https://api"]);
        payload.insert(claims::SUBJECT, "u1");
        payload.insert(claims::ISSUED_AT, 1_700_000_000_i64);
        payload.insert(claims::EXPIRATION, 1_700_003_600_i64);
        payload.insert("scope", json!({"read": true}));
        payload
    }

    #[test]
    fn test_issue_produces_three_segments() {
        let token = Token::issue(Header::new("HS256"), sample_payload(), &signer()).unwrap();
        let parts: Vec<&str> = token.as_str().split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.is_empty()));
        assert_eq!(token.signing_input(), format!("{}.{}", parts[0], parts[1]));
    }

    #[test]
    fn test_issue_rejects_header_signer_mismatch() {
        let result = Token::issue(Header::new("HS512"), sample_payload(), &signer());
        assert!(matches!(result, Err(AuthError::InvalidAlgorithm { .. })));
    }

    #[test]
    fn test_parse_round_trip() {
        let token = Token::issue(Header::new("HS256"), sample_payload(), &signer()).unwrap();
        let parsed = Token::parse(token.as_str()).unwrap();
        assert_eq!(parsed.header(), token.header());
        assert_eq!(parsed.payload(), token.payload());
        assert_eq!(parsed.signature(), token.signature());
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_json_scalars_stored_as_typed_claims() {
        let mut payload = Payload::new();
        payload.insert("name", ClaimValue::Json(json!("s")));
        payload.insert("count", ClaimValue::Json(json!(7)));
        payload.insert("roles", ClaimValue::Json(json!(["a", "b"])));
        payload.insert("ratio", ClaimValue::Json(json!(0.5)));
        assert_eq!(payload.get("name"), Some(&ClaimValue::Text("s".into())));
        assert_eq!(payload.get("count"), Some(&ClaimValue::Timestamp(7)));
        assert_eq!(payload.get("roles"), Some(&ClaimValue::List(vec!["a".into(), "b".into()])));
        assert_eq!(payload.get("ratio"), Some(&ClaimValue::Json(json!(0.5))));

        let collected: Payload = [("name", ClaimValue::Json(json!("s")))].into_iter().collect();
        assert_eq!(collected.get("name"), Some(&ClaimValue::Text("s".into())));

        let token = Token::issue(Header::new("HS256"), payload, &signer()).unwrap();
        assert_eq!(Token::parse(token.as_str()).unwrap(), token);
    }

    #[test]
    fn test_header_json_shape() {
        let token = Token::issue(Header::new("HS256"), Payload::new(), &signer()).unwrap();
        let header_b64 = token.as_str().split('.').next().unwrap();
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_b64).unwrap()).unwrap();
        assert_eq!(header, json!({"alg": "HS256", "typ": "JWT"}));
    }

    #[test]
    fn test_payload_accessors() {
        let payload = sample_payload();
        assert_eq!(payload.issuer(), Some("app"));
        assert_eq!(payload.audience(), vec!["c1", "https://api"]);
        assert_eq!(payload.subject(), Some("u1"));
        assert_eq!(payload.issued_at(), Some(1_700_000_000));
        assert_eq!(payload.expiration(), Some(1_700_003_600));
        assert_eq!(payload.not_before(), None);
        assert_eq!(payload.get("scope"), Some(&ClaimValue::Json(json!({"read": true}))));
    }

    #[test]
    fn test_single_string_audience() {
        let mut payload = Payload::new();
        payload.insert(claims::AUDIENCE, "c1");
        assert_eq!(payload.audience(), vec!["c1"]);
    }

    #[test]
    fn test_timestamp_parsing() {
        assert_eq!(ClaimValue::from(42_i64).as_timestamp(), Some(42));
        assert_eq!(ClaimValue::from("1700000000").as_timestamp(), Some(1_700_000_000));
        assert_eq!(
            ClaimValue::from("2023-11-14T22:13:20Z").as_timestamp(),
            Some(1_700_000_000)
        );
        assert_eq!(ClaimValue::from("tomorrow").as_timestamp(), None);
        assert_eq!(ClaimValue::from(vec!["1"]).as_timestamp(), None);
        assert_eq!(ClaimValue::Json(json!(1.5)).as_timestamp(), None);
    }

    #[test]
    fn test_claim_value_from_json_prefers_typed_variants() {
        assert_eq!(ClaimValue::from(json!("x")), ClaimValue::Text("x".into()));
        assert_eq!(ClaimValue::from(json!(7)), ClaimValue::Timestamp(7));
        assert_eq!(ClaimValue::from(json!(["a", "b"])), ClaimValue::from(vec!["a", "b"]));
        assert_eq!(ClaimValue::from(json!([1, 2])), ClaimValue::Json(json!([1, 2])));
    }

    #[test]
    fn test_insert_overrides() {
        let mut payload = Payload::new();
        assert!(payload.insert(claims::EXPIRATION, 1_i64).is_none());
        assert_eq!(payload.insert(claims::EXPIRATION, 2_i64), Some(ClaimValue::Timestamp(1)));
        assert_eq!(payload.expiration(), Some(2));
    }

    #[test]
    fn test_parse_wrong_part_count() {
        for bad in ["", "only.two", "too.many.parts.here", "nodots"] {
            assert!(
                matches!(Token::parse(bad), Err(AuthError::InvalidTokenFormat { .. })),
                "'{bad}' should not parse"
            );
        }
    }

    #[test]
    fn test_parse_bad_base64_and_json() {
        assert!(Token::parse("!!!.e30.").is_err());
        // header decodes but is not JSON
        let not_json = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(Token::parse(&format!("{not_json}.e30.")).is_err());
        // payload is a JSON array, not an object
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let array = URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert!(Token::parse(&format!("{header}.{array}.")).is_err());
    }

    #[test]
    fn test_parse_empty_signature() {
        let raw = craft_raw_jwt(&json!({"alg": "HS256", "typ": "JWT"}), &json!({"iss": "app"}));
        let token = Token::parse(&raw).unwrap();
        assert!(token.signature().is_empty());
        assert_eq!(token.payload().issuer(), Some("app"));
    }

    #[test]
    fn test_parse_defaults_missing_typ() {
        let raw = craft_raw_jwt(&json!({"alg": "RS256"}), &json!({}));
        let token = Token::parse(&raw).unwrap();
        assert_eq!(token.header().typ, "JWT");
        assert_eq!(token.header().alg, "RS256");
    }

    #[test]
    fn test_signing_input_is_never_reencoded() {
        // Whitespace and key order that serde would not reproduce.
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{ "typ" : "JWT", "alg" : "HS256" }"#);
        let payload_b64 = URL_SAFE_NO_PAD.encode(br#"{"sub":"u1",   "iss":"app"}"#);
        let signing_input = format!("{header_b64}.{payload_b64}");
        let sig = signer().sign(signing_input.as_bytes()).unwrap();
        let raw = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(&sig));

        let token = Token::parse(&raw).unwrap();
        assert_eq!(token.signing_input(), signing_input);
        assert_eq!(token.as_str(), raw);
        assert!(signer().verify(token.signature(), token.signing_input().as_bytes()));
    }

    #[test]
    fn test_from_str_and_display() {
        let token = Token::issue(Header::new("HS256"), sample_payload(), &signer()).unwrap();
        let parsed: Token = token.to_string().parse().unwrap();
        assert_eq!(parsed.as_str(), token.as_str());
    }

    #[test]
    fn test_debug_omits_signature_bytes() {
        let token = Token::issue(Header::new("HS256"), sample_payload(), &signer()).unwrap();
        let rendered = format!("{token:?}");
        assert!(rendered.contains("signature_len: 32"));
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        fn arb_payload() -> impl Strategy<Value = Payload> {
            (
                "[a-zA-Z0-9:/._-]{1,32}",
                proptest::collection::vec("[a-z0-9]{1,12}", 1..4),
                proptest::option::of("[a-zA-Z0-9_-]{1,32}"),
                1_000_000_000i64..2_000_000_000i64,
                proptest::option::of(1_000_000_000i64..2_000_000_000i64),
                1_000_000_000i64..2_000_000_000i64,
                proptest::collection::btree_map("x_[a-z]{1,8}", "[ -~]{0,16}", 0..4),
            )
                .prop_map(|(iss, aud, sub, iat, nbf, exp, custom)| {
                    let mut payload = Payload::new();
                    payload.insert(claims::ISSUER, iss);
                    payload.insert(claims::AUDIENCE, aud);
                    if let Some(sub) = sub {
                        payload.insert(claims::SUBJECT, sub);
                    }
                    payload.insert(claims::ISSUED_AT, iat);
                    if let Some(nbf) = nbf {
                        payload.insert(claims::NOT_BEFORE, nbf);
                    }
                    payload.insert(claims::EXPIRATION, exp);
                    for (k, v) in custom {
                        payload.insert(k, v);
                    }
                    payload
                })
        }

        proptest! {
            /// Decoding an encoded token yields the same header, payload and
            /// signature bytes.
            #[test]
            fn token_round_trip(payload in arb_payload(), alg in prop::sample::select(vec!["HS256", "HS384", "HS512"])) {
                let signer = HmacSigner::new(alg, b"proptest-secret").expect("signer");
                let token = Token::issue(Header::new(alg), payload, &signer).expect("issue");
                let parsed = Token::parse(token.as_str()).expect("parse");
                prop_assert_eq!(parsed.header(), token.header());
                prop_assert_eq!(parsed.payload(), token.payload());
                prop_assert_eq!(parsed.signature(), token.signature());
            }

            /// Parsing arbitrary strings never panics.
            #[test]
            fn parse_never_panics(input in "[A-Za-z0-9_.=-]{0,64}") {
                let _ = Token::parse(&input);
            }
        }
    }
}
