//! Signed bearer token encoding.
//!
//! A token is `base64(json({payload, hash}))` where `hash` is the hex
//! HMAC-SHA256 of the payload's canonical JSON. Encoding is deterministic:
//! the same payload and key always produce the same token string.

use base64::engine::general_purpose::STANDARD as Base64Engine;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::token::{SignedToken, TokenPayload};
use crate::errors::{DecodeError, TokenGenerationError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct TokenCodec {
    secret_key: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.as_bytes().to_vec(),
        }
    }

    pub fn encode(&self, payload: &TokenPayload) -> Result<String, TokenGenerationError> {
        let signature = self.sign(payload)?;
        let signed = SignedToken {
            payload: payload.clone(),
            signature,
        };
        let body = serde_json::to_vec(&signed)?;
        Ok(Base64Engine.encode(body))
    }

    /// Accepts tokens with or without trailing `=` padding.
    pub fn decode(&self, token: &str) -> Result<SignedToken, DecodeError> {
        let padded = add_base64_padding(token);
        let body = Base64Engine.decode(padded.as_bytes())?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub fn sign(&self, payload: &TokenPayload) -> Result<String, TokenGenerationError> {
        let mut mac = self.mac()?;
        mac.update(&serde_json::to_vec(payload)?);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex signature against `payload`.
    pub fn verify(&self, payload: &TokenPayload, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(bytes) = serde_json::to_vec(payload) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(&bytes);
        mac.verify_slice(&expected).is_ok()
    }

    fn mac(&self) -> Result<HmacSha256, TokenGenerationError> {
        HmacSha256::new_from_slice(&self.secret_key).map_err(|_| TokenGenerationError::InvalidKey)
    }
}

/// Appends the minimal `=` padding, `(4 - len % 4) % 4` characters.
pub fn add_base64_padding(token: &str) -> String {
    let padding = (4 - token.len() % 4) % 4;
    let mut padded = String::with_capacity(token.len() + padding);
    padded.push_str(token);
    padded.extend(std::iter::repeat('=').take(padding));
    padded
}
