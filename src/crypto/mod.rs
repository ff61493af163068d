pub mod jwt;
pub mod key;
pub mod nonce;

// Re-export main items for easier access
pub use jwt::{create_jwt, sign, Claims};
pub use key::PrivateKey;
