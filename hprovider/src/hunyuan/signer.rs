//! TC3-HMAC-SHA256 request signing for Tencent Cloud API 3.0.
//!
//! Every outbound call gets its own [`SigningContext`]; the signature covers
//! the body digest and is bound to the second-resolution timestamp, so a retry
//! must be signed again.
//!
//! ```rust
//! use hprovider::Credentials;
//! use hprovider::hunyuan::{SigningTarget, Tc3Signer};
//!
//! let credentials = Credentials::new("AKIDexample", "secret").expect("credentials");
//! let signer = Tc3Signer::new(credentials, SigningTarget::default());
//!
//! let first = signer.sign_at(br#"{"Model":"hunyuan-pro"}"#, 1_700_000_000).expect("sign");
//! let second = signer.sign_at(br#"{"Model":"hunyuan-pro"}"#, 1_700_000_000).expect("sign");
//! assert_eq!(first.signature(), second.signature());
//! assert_eq!(first.get("X-TC-Timestamp"), Some("1700000000"));
//! ```

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{Credentials, ProviderError};

use super::{API_VERSION, CHAT_ACTION, DEFAULT_HOST, SERVICE};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const TERMINATOR: &str = "tc3_request";
const SECRET_PREFIX: &str = "TC3";
const HTTP_METHOD: &str = "POST";
const CANONICAL_URI: &str = "/";

/// Service coordinates covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTarget {
    pub service: String,
    pub host: String,
    pub action: String,
    pub version: String,
    pub region: Option<String>,
}

impl Default for SigningTarget {
    fn default() -> Self {
        Self {
            service: SERVICE.to_string(),
            host: DEFAULT_HOST.to_string(),
            action: CHAT_ACTION.to_string(),
            version: API_VERSION.to_string(),
            region: None,
        }
    }
}

impl SigningTarget {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

/// Intermediate values of one signing pass.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub timestamp: i64,
    pub date: String,
    pub credential_scope: String,
    pub canonical_request: String,
    pub string_to_sign: String,
    signing_key: Vec<u8>,
    pub signature: String,
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("timestamp", &self.timestamp)
            .field("date", &self.date)
            .field("credential_scope", &self.credential_scope)
            .field("canonical_request", &self.canonical_request)
            .field("string_to_sign", &self.string_to_sign)
            .field("signing_key", &"[REDACTED]")
            .field("signature", &self.signature)
            .finish()
    }
}

impl SigningContext {
    pub fn signing_key_hex(&self) -> String {
        hex::encode(&self.signing_key)
    }
}

/// Headers to merge into the outbound request, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    context: SigningContext,
    headers: Vec<(&'static str, String)>,
}

impl SignedHeaders {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }

    pub fn authorization(&self) -> Option<&str> {
        self.get("Authorization")
    }

    pub fn signature(&self) -> &str {
        &self.context.signature
    }

    pub fn context(&self) -> &SigningContext {
        &self.context
    }
}

/// Stateless signer; cheap to clone and safe to share across calls.
#[derive(Debug, Clone)]
pub struct Tc3Signer {
    credentials: Credentials,
    target: SigningTarget,
}

impl Tc3Signer {
    pub fn new(credentials: Credentials, target: SigningTarget) -> Self {
        Self {
            credentials,
            target,
        }
    }

    pub fn target(&self) -> &SigningTarget {
        &self.target
    }

    /// Signs `body` with the current wall-clock second.
    pub fn sign(&self, body: &[u8]) -> Result<SignedHeaders, ProviderError> {
        self.sign_at(body, Utc::now().timestamp())
    }

    pub fn sign_at(&self, body: &[u8], timestamp: i64) -> Result<SignedHeaders, ProviderError> {
        let context = self.signing_context(body, timestamp)?;

        let authorization = format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.credentials.secret_id(),
            context.credential_scope,
            signed_header_names(),
            context.signature
        );

        let mut headers = vec![
            ("Authorization", authorization),
            ("Content-Type", JSON_CONTENT_TYPE.to_string()),
            ("Host", self.target.host.clone()),
            ("X-TC-Action", self.target.action.clone()),
            ("X-TC-Timestamp", timestamp.to_string()),
            ("X-TC-Version", self.target.version.clone()),
        ];
        if let Some(region) = self.target.region.as_ref().filter(|r| !r.is_empty()) {
            headers.push(("X-TC-Region", region.clone()));
        }

        tracing::debug!(
            action = %self.target.action,
            timestamp,
            date = %context.date,
            "signed request"
        );

        Ok(SignedHeaders { context, headers })
    }

    pub fn signing_context(
        &self,
        body: &[u8],
        timestamp: i64,
    ) -> Result<SigningContext, ProviderError> {
        let date = utc_date(timestamp)?;
        let credential_scope = format!("{date}/{}/{TERMINATOR}", self.target.service);

        let canonical_request = format!(
            "{HTTP_METHOD}\n{CANONICAL_URI}\n\n{}\n{}\n{}",
            self.canonical_headers(),
            signed_header_names(),
            sha256_hex(body)
        );

        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let secret = format!("{SECRET_PREFIX}{}", self.credentials.secret_key().expose());
        let secret_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
        let secret_service = hmac_sha256(&secret_date, self.target.service.as_bytes())?;
        let signing_key = hmac_sha256(&secret_service, TERMINATOR.as_bytes())?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(SigningContext {
            timestamp,
            date,
            credential_scope,
            canonical_request,
            string_to_sign,
            signing_key,
            signature,
        })
    }

    fn canonical_headers(&self) -> String {
        let mut headers = [
            ("content-type", JSON_CONTENT_TYPE.to_string()),
            ("host", self.target.host.clone()),
            ("x-tc-action", self.target.action.clone()),
        ]
        .map(|(name, value)| (name, value.trim().to_ascii_lowercase()));
        headers.sort_by(|left, right| left.0.cmp(right.0));

        headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect()
    }
}

fn signed_header_names() -> &'static str {
    "content-type;host;x-tc-action"
}

fn utc_date(timestamp: i64) -> Result<String, ProviderError> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|instant| instant.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ProviderError::configuration(format!("timestamp {timestamp} is out of range")))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|err| ProviderError::configuration(format!("invalid signing key: {err}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: i64 = 1_551_113_065;

    fn signer() -> Tc3Signer {
        let credentials = Credentials::new(
            "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE",
            "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE",
        )
        .expect("credentials");
        Tc3Signer::new(credentials, SigningTarget::default())
    }

    #[test]
    fn sha256_of_empty_body_matches_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn canonical_request_uses_sorted_lowercase_headers_and_body_digest() {
        let context = signer()
            .signing_context(b"", TIMESTAMP)
            .expect("context");

        assert_eq!(
            context.canonical_request,
            "POST\n/\n\n\
             content-type:application/json; charset=utf-8\n\
             host:hunyuan.tencentcloudapi.com\n\
             x-tc-action:chatcompletions\n\
             \n\
             content-type;host;x-tc-action\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn string_to_sign_carries_scope_and_canonical_digest() {
        let context = signer()
            .signing_context(b"{}", TIMESTAMP)
            .expect("context");

        assert_eq!(context.date, "2019-02-25");
        assert_eq!(context.credential_scope, "2019-02-25/hunyuan/tc3_request");

        let lines = context.string_to_sign.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "TC3-HMAC-SHA256");
        assert_eq!(lines[1], "1551113065");
        assert_eq!(lines[2], "2019-02-25/hunyuan/tc3_request");
        assert_eq!(lines[3], sha256_hex(context.canonical_request.as_bytes()));
    }

    #[test]
    fn signature_matches_independently_derived_key_chain() {
        let context = signer()
            .signing_context(b"{\"Model\":\"hunyuan-lite\"}", TIMESTAMP)
            .expect("context");

        let k_date = hmac_sha256(b"TC3Gu5t9xGARNpq86cd98joQYCN3EXAMPLE", b"2019-02-25").expect("date");
        let k_service = hmac_sha256(&k_date, b"hunyuan").expect("service");
        let k_signing = hmac_sha256(&k_service, b"tc3_request").expect("signing");
        let expected =
            hex::encode(hmac_sha256(&k_signing, context.string_to_sign.as_bytes()).expect("sig"));

        assert_eq!(context.signing_key_hex(), hex::encode(&k_signing));
        assert_eq!(context.signature, expected);
        assert_eq!(context.signature.len(), 64);
    }

    #[test]
    fn signing_is_deterministic_and_body_sensitive() {
        let signer = signer();
        let first = signer.sign_at(b"{\"a\":1}", TIMESTAMP).expect("first");
        let second = signer.sign_at(b"{\"a\":1}", TIMESTAMP).expect("second");
        let changed = signer.sign_at(b"{\"a\":2}", TIMESTAMP).expect("changed");
        let later = signer.sign_at(b"{\"a\":1}", TIMESTAMP + 1).expect("later");

        assert_eq!(first, second);
        assert_ne!(first.signature(), changed.signature());
        assert_ne!(first.signature(), later.signature());
    }

    #[test]
    fn signed_headers_include_authorization_and_companions() {
        let signer = Tc3Signer::new(
            Credentials::new("AKIDid", "key").expect("credentials"),
            SigningTarget::default().with_region("ap-guangzhou"),
        );
        let headers = signer.sign_at(b"{}", TIMESTAMP).expect("headers");

        let authorization = headers.authorization().expect("authorization");
        assert!(authorization.starts_with(
            "TC3-HMAC-SHA256 Credential=AKIDid/2019-02-25/hunyuan/tc3_request, \
             SignedHeaders=content-type;host;x-tc-action, Signature="
        ));
        assert!(authorization.ends_with(headers.signature()));
        assert_eq!(headers.get("x-tc-action"), Some("ChatCompletions"));
        assert_eq!(headers.get("X-TC-Version"), Some("2023-09-01"));
        assert_eq!(headers.get("X-TC-Region"), Some("ap-guangzhou"));
        assert_eq!(headers.get("Content-Type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(headers.iter().count(), 7);
    }

    #[test]
    fn region_header_is_omitted_when_unset() {
        let headers = signer().sign_at(b"{}", TIMESTAMP).expect("headers");
        assert_eq!(headers.get("X-TC-Region"), None);
    }

    #[test]
    fn debug_output_hides_signing_key() {
        let context = signer().signing_context(b"{}", TIMESTAMP).expect("context");
        let rendered = format!("{context:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(&context.signing_key_hex()));
    }
}
