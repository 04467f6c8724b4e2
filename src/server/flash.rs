//! Signed one-shot flash messages carried in a cookie
//!
//! Cookie value: `base64url(json).base64url(hmac_sha256(payload))`.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::templates::FlashData;

type HmacSha256 = Hmac<Sha256>;

/// Name of the flash cookie
pub const FLASH_COOKIE: &str = "folio_flash";

/// Signs and verifies flash cookies with the site secret
#[derive(Clone)]
pub struct FlashSigner {
    key: Vec<u8>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).ok()
    }

    /// Encode messages into a signed cookie value
    pub fn encode(&self, flashes: &[FlashData]) -> Option<String> {
        let payload = serde_json::to_vec(flashes).ok()?;
        let payload_part = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Some(format!("{}.{}", payload_part, sig_part))
    }

    /// Verify and decode a cookie value. Tampered or garbled values yield `None`.
    pub fn decode(&self, value: &str) -> Option<Vec<FlashData>> {
        let (payload_part, sig_part) = value.split_once('.')?;

        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        let sig = URL_SAFE_NO_PAD.decode(sig_part).ok()?;
        mac.verify_slice(&sig).ok()?;

        let payload = URL_SAFE_NO_PAD.decode(payload_part).ok()?;
        serde_json::from_slice(&payload).ok()
    }
}

/// `Set-Cookie` value storing the given signed payload
pub fn set_cookie(value: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", FLASH_COOKIE, value)
}

/// `Set-Cookie` value expiring the flash cookie
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", FLASH_COOKIE)
}

/// Find the raw flash cookie value among the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_signed_value_decodes() {
        let signer = FlashSigner::new("secret");
        let flashes = vec![
            FlashData::success("Saved"),
            FlashData::warning("Not emailed"),
        ];

        let value = signer.encode(&flashes).unwrap();
        assert_eq!(signer.decode(&value).unwrap(), flashes);
    }

    #[test]
    fn test_rejects_other_secret_and_tampering() {
        let value = FlashSigner::new("secret")
            .encode(&[FlashData::success("Saved")])
            .unwrap();

        assert!(FlashSigner::new("other").decode(&value).is_none());

        let forged_payload = URL_SAFE_NO_PAD.encode(r#"[{"category":"success","message":"Hacked"}]"#);
        let (_, sig) = value.split_once('.').unwrap();
        let forged = format!("{}.{}", forged_payload, sig);
        assert!(FlashSigner::new("secret").decode(&forged).is_none());

        assert!(FlashSigner::new("secret").decode("garbage").is_none());
    }

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; folio_flash=abc.def; b=2"),
        );

        assert_eq!(read_cookie(&headers), Some("abc.def"));
        assert_eq!(read_cookie(&HeaderMap::new()), None);
    }
}
