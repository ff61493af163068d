use rand::{rngs::OsRng, RngCore};

use crate::error::{AuthError, Result};

/// Exclusive upper bound of the nonce range, `2^63 - 1`
const NONCE_BOUND: u64 = i64::MAX as u64;

/// Generate a fresh JWS header nonce
///
/// Returns the decimal form of a value drawn uniformly from `[0, 2^63 - 1)`
/// using the operating system RNG. A new value is drawn on every call.
///
/// # Errors
/// - `Signing` if the operating system RNG fails
///
/// # Example
/// ```rust
/// use cdpcurl::crypto::nonce::generate_nonce;
///
/// let nonce = generate_nonce().unwrap();
/// let value: u64 = nonce.parse().unwrap();
/// assert!(value < i64::MAX as u64);
/// ```
pub fn generate_nonce() -> Result<String> {
    let mut rng = OsRng;
    loop {
        let mut bytes = [0u8; 8];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| AuthError::Signing(format!("error generating nonce: {}", e)))?;
        // 63 uniform bits; rejecting the single top value keeps the range uniform.
        let candidate = u64::from_le_bytes(bytes) >> 1;
        if candidate < NONCE_BOUND {
            return Ok(candidate.to_string());
        }
    }
}
