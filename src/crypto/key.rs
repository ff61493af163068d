use std::fmt;

use base64::prelude::*;
use jsonwebtoken::Algorithm;
use log::debug;
use p256::{
    ecdsa::{signature::Signer as _, Signature},
    pkcs8::DecodePrivateKey,
};

use crate::error::{AuthError, Result};

const PEM_PREFIX: &str = "-----BEGIN";
const ED25519_SEED_LEN: usize = ed25519_dalek::SECRET_KEY_LENGTH;

/// A parsed API private key
///
/// The variant is fixed when the key text is parsed; the two signing paths
/// never fall through to each other.
pub enum PrivateKey {
    /// P-256 key from a PEM block, signs ES256
    Ec(p256::ecdsa::SigningKey),
    /// Ed25519 key from a base64 seed, signs EdDSA
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Parse private key text
    ///
    /// Text starting with a PEM armor header is read as a SEC1
    /// `EC PRIVATE KEY` block, or as a PKCS#8 `PRIVATE KEY` block holding a
    /// P-256 key. Anything else must be standard base64 decoding to exactly
    /// 32 bytes of Ed25519 seed.
    ///
    /// # Errors
    /// - `KeySelection` if the PEM block or the EC key inside cannot be
    ///   decoded, the text is not valid base64, or the decoded Ed25519 key
    ///   has the wrong length
    ///
    /// # Example
    /// ```rust
    /// use cdpcurl::crypto::key::PrivateKey;
    /// use jsonwebtoken::Algorithm;
    ///
    /// let seed = "AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyA=";
    /// let key = PrivateKey::parse(seed).unwrap();
    /// assert_eq!(key.algorithm(), Algorithm::EdDSA);
    ///
    /// assert!(PrivateKey::parse("dG9vIHNob3J0").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        if text.starts_with(PEM_PREFIX) {
            let secret = p256::SecretKey::from_sec1_pem(text)
                .or_else(|_| p256::SecretKey::from_pkcs8_pem(text))
                .map_err(|e| {
                    AuthError::KeySelection(format!("error parsing EC private key: {}", e))
                })?;
            debug!("selected ES256 for PEM private key");
            return Ok(PrivateKey::Ec(secret.into()));
        }

        let decoded = BASE64_STANDARD
            .decode(text)
            .map_err(|e| AuthError::KeySelection(format!("error base64 decoding key: {}", e)))?;
        let seed: [u8; ED25519_SEED_LEN] = decoded.as_slice().try_into().map_err(|_| {
            AuthError::KeySelection(format!(
                "invalid Ed25519 private key length: got {}, expected {}",
                decoded.len(),
                ED25519_SEED_LEN
            ))
        })?;
        debug!("selected EdDSA for base64 private key");
        Ok(PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
    }

    /// JWS `alg` value for this key
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PrivateKey::Ec(_) => Algorithm::ES256,
            PrivateKey::Ed25519(_) => Algorithm::EdDSA,
        }
    }

    /// Sign `message`, returning the raw JWS signature bytes
    ///
    /// ES256 signatures use the fixed 64-byte `r || s` form JWS requires.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            PrivateKey::Ec(key) => {
                let signature: Signature = key.sign(message);
                signature.to_bytes().to_vec()
            }
            PrivateKey::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::Ec(_) => f.write_str("PrivateKey::Ec(..)"),
            PrivateKey::Ed25519(_) => f.write_str("PrivateKey::Ed25519(..)"),
        }
    }
}
