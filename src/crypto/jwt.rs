use crate::{
    api_key::ApiKey,
    crypto::{key::PrivateKey, nonce::generate_nonce},
    error::{AuthError, Result},
};
use base64::prelude::*;
use chrono::Utc;
use jsonwebtoken::Algorithm;
use log::trace;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// `iss` claim of every token
pub const ISSUER: &str = "coinbase-cloud";
/// Token lifetime; `exp` is always `nbf` plus this many seconds
pub const TOKEN_TTL_SECS: i64 = 60;

/// Protected JWS header
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Header {
    pub alg: Algorithm,
    /// API key name
    pub kid: String,
    /// Anti-replay nonce, fresh for every token
    pub nonce: String,
    pub typ: String,
}

/// JWT claims binding a token to the requests it may authenticate
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// API key name
    pub sub: String,
    pub iss: String,
    /// Not-before timestamp (Unix timestamp)
    pub nbf: i64,
    /// Expiration timestamp (Unix timestamp)
    pub exp: i64,
    pub aud: Vec<String>,
    /// Requests this token is valid for, each `"<METHOD> <HOST><PATH>"`
    pub uris: Vec<String>,
}

impl Claims {
    fn new(key_name: &str, service: &str, uris: &[String]) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: key_name.to_string(),
            iss: ISSUER.to_string(),
            nbf: now,
            exp: now + TOKEN_TTL_SECS,
            aud: vec![service.to_string()],
            uris: uris.to_vec(),
        }
    }
}

/// Sign a JWT for `uris` with an API key
///
/// Parses the private key on every call; use [`crate::Authenticator`] to
/// parse once and sign many times.
///
/// # Arguments
/// * `api_key` - Key name and private key text
/// * `service` - Audience the token is issued for
/// * `uris` - Request bindings, each `"<METHOD> <HOST><PATH>"`
///
/// # Returns
/// * `Ok(String)` - Compact serialized JWT
/// * `Err(AuthError)` - Incomplete key, bad key encoding, or signing failure
///
/// # Example
/// ```rust
/// use cdpcurl::{crypto::jwt::sign, ApiKey};
///
/// let api_key = ApiKey::new(
///     "organizations/o/apiKeys/k",
///     "AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyA=",
/// );
/// let token = sign(&api_key, "cdp_service", &["GET api.example.com/v1/me".to_string()]).unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn sign(api_key: &ApiKey, service: &str, uris: &[String]) -> Result<String> {
    if !api_key.is_complete() {
        return Err(AuthError::KeyLoad("could not load api key".to_string()));
    }
    let key = PrivateKey::parse(api_key.private_key().expose_secret())?;
    create_jwt(api_key.name(), &key, service, uris)
}

/// Build and sign a compact JWT with an already parsed key
///
/// The header carries `alg`, `kid` (the key name), a fresh `nonce` and
/// `typ: "JWT"`. The payload is [`Claims`] with `nbf` set to now and `exp`
/// [`TOKEN_TTL_SECS`] later. Output is `header.payload.signature`, each part
/// base64url without padding.
pub fn create_jwt(
    key_name: &str,
    key: &PrivateKey,
    service: &str,
    uris: &[String],
) -> Result<String> {
    let header = Header {
        alg: key.algorithm(),
        kid: key_name.to_string(),
        nonce: generate_nonce()?,
        typ: "JWT".to_string(),
    };
    let claims = Claims::new(key_name, service, uris);

    let signing_input = format!("{}.{}", encode_part(&header)?, encode_part(&claims)?);
    let signature = key.sign(signing_input.as_bytes());
    trace!("signed {:?} token for {:?}", header.alg, claims.uris);

    Ok(format!(
        "{}.{}",
        signing_input,
        BASE64_URL_SAFE_NO_PAD.encode(signature)
    ))
}

fn encode_part<T: Serialize>(part: &T) -> Result<String> {
    let json = serde_json::to_vec(part)
        .map_err(|e| AuthError::Signing(format!("error serializing token: {}", e)))?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use p256::pkcs8::{EncodePublicKey, LineEnding};
    use rand::rngs::OsRng;

    const KEY_NAME: &str = "organizations/test/apiKeys/key";
    const SERVICE: &str = "cdp_service";

    fn uris() -> Vec<String> {
        vec!["GET api.example.com/v1/accounts".to_string()]
    }

    fn validation(alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_audience(&[SERVICE]);
        validation.set_issuer(&[ISSUER]);
        validation.validate_nbf = true;
        validation
    }

    fn decode_header(token: &str) -> Header {
        let part = token.split('.').next().unwrap();
        serde_json::from_slice(&BASE64_URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn test_es256_token_verifies() {
        let secret = p256::SecretKey::random(&mut OsRng);
        let public_pem = secret.public_key().to_public_key_pem(LineEnding::LF).unwrap();
        let key = PrivateKey::Ec(secret.into());

        let token = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_ec_pem(public_pem.as_bytes()).unwrap(),
            &validation(Algorithm::ES256),
        )
        .unwrap();

        assert_eq!(data.header.alg, Algorithm::ES256);
        assert_eq!(data.header.kid.as_deref(), Some(KEY_NAME));
        assert_eq!(data.header.typ.as_deref(), Some("JWT"));
        assert_eq!(data.claims.sub, KEY_NAME);
        assert_eq!(data.claims.iss, ISSUER);
        assert_eq!(data.claims.aud, vec![SERVICE.to_string()]);
        assert_eq!(data.claims.uris, uris());
    }

    #[test]
    fn test_eddsa_token_verifies() {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&[42u8; 32]);
        let public = BASE64_URL_SAFE_NO_PAD.encode(signing_key.verifying_key().to_bytes());
        let key = PrivateKey::Ed25519(signing_key);

        let token = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_ed_components(&public).unwrap(),
            &validation(Algorithm::EdDSA),
        )
        .unwrap();

        assert_eq!(data.header.alg, Algorithm::EdDSA);
        assert_eq!(data.claims.uris, uris());
    }

    #[test]
    fn test_expiry_is_sixty_seconds_after_nbf() {
        let key = PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[1u8; 32]));
        let token = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();

        let payload = token.split('.').nth(1).unwrap();
        let claims: Claims =
            serde_json::from_slice(&BASE64_URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.nbf, TOKEN_TTL_SECS);
        assert!((claims.nbf - Utc::now().timestamp()).abs() <= 5);
    }

    #[test]
    fn test_successive_tokens_differ() {
        // Ed25519 signatures are deterministic, so any difference comes from the nonce.
        let key = PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[3u8; 32]));
        let first = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();
        let second = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();

        let (h1, h2) = (decode_header(&first), decode_header(&second));
        assert_ne!(h1.nonce, h2.nonce);
        assert_ne!(first.rsplit('.').next(), second.rsplit('.').next());
    }

    #[test]
    fn test_no_base64_padding() {
        let key = PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[5u8; 32]));
        let token = create_jwt(KEY_NAME, &key, SERVICE, &uris()).unwrap();
        assert!(!token.contains('='));
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_sign_rejects_incomplete_key() {
        let api_key = ApiKey::new(KEY_NAME, "");
        let result = sign(&api_key, SERVICE, &uris());
        assert!(matches!(result, Err(AuthError::KeyLoad(_))));
    }

    #[test]
    fn test_sign_rejects_short_ed25519_key() {
        let api_key = ApiKey::new(KEY_NAME, BASE64_STANDARD.encode([0u8; 16]));
        let result = sign(&api_key, SERVICE, &uris());
        assert!(matches!(result, Err(AuthError::KeySelection(_))));
    }
}
