use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex MD5 of a request body; the empty body hashes like any other.
pub fn content_md5(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

/// The string an API client signs.
///
/// Format: `method\npath\ncontent_md5\ncontent_type\nnonce\n`
pub fn hmac_content(
    method: &str,
    path: &str,
    content_md5: &str,
    content_type: &str,
    nonce: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        method, path, content_md5, content_type, nonce
    )
}

/// Hex HMAC-SHA256 of `content` keyed by the API secret
pub fn generate_signature(secret: &str, content: &str) -> Result<String, anyhow::Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid key length: {}", e))?;
    mac.update(content.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hex signature using constant-time comparison
pub fn verify_signature(
    secret: &str,
    content: &str,
    signature: &str,
) -> Result<bool, anyhow::Error> {
    let expected = generate_signature(secret, content)?;
    Ok(constant_time_eq(expected.as_bytes(), signature.as_bytes()))
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Headers carry hex digests wrapped in base64.
pub fn encode_header_value(hex_digest: &str) -> String {
    general_purpose::STANDARD.encode(hex_digest.as_bytes())
}

pub fn decode_header_value(value: &str) -> Option<String> {
    let bytes = general_purpose::STANDARD.decode(value.trim()).ok()?;
    String::from_utf8(bytes).ok()
}
