//! Webhook Signature Verification
//! Mission: Only accept payment events signed with the shared secret
//!
//! The sender signs the exact request body with HMAC-SHA256 and puts the
//! lowercase hex digest in the `X-Signature` header. Verification must run
//! on the raw bytes as received, before any JSON decoding.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded HMAC of the request body
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Hex length of a SHA-256 digest
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Compute the lowercase hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a claimed signature against the payload.
///
/// Surrounding whitespace on the claim is ignored. A claim whose length
/// differs from the 64-char digest is rejected before the constant-time
/// comparison; the digest length is public so this leaks nothing.
pub fn verify(secret: &[u8], payload: &[u8], claimed: &str) -> bool {
    let claimed = claimed.trim();
    let expected = sign(secret, payload);

    if claimed.len() != expected.len() {
        return false;
    }

    expected.as_bytes().ct_eq(claimed.as_bytes()).into()
}

/// Authenticate a request given the raw `X-Signature` header value.
///
/// An absent or blank header is [`SignatureError::Missing`], so callers can
/// tell "no attempt" from a failed attempt.
pub fn authenticate(
    secret: &[u8],
    payload: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let claimed = header.map(str::trim).unwrap_or_default();
    if claimed.is_empty() {
        return Err(SignatureError::Missing);
    }

    if verify(secret, payload, claimed) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Signature failures. Both variants are unauthorized to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    Missing,
    Mismatch,
}

impl SignatureError {
    /// Short tag for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Mismatch => "mismatch",
        }
    }

    /// Message returned to the sender
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing => "Missing X-Signature",
            Self::Mismatch => "Bad signature",
        }
    }
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SignatureError {}
