//! # cdpcurl
//!
//! API-key loading and per-request JWT signing for Coinbase Cloud style APIs.
//! Turns any blocking HTTP transport into one that authenticates every request
//! with a short-lived bearer token bound to that request.
//!
//! ## Features
//!
//! - **Key Resolution** - Load an API key from an explicit file, the nearest
//!   `.coinbase_cloud_api_key.json` above the working directory, environment
//!   variables, or directly supplied values
//! - **Two Key Formats** - PEM EC (P-256) keys sign ES256, base64 Ed25519 seeds
//!   sign EdDSA
//! - **Request-Bound Tokens** - Each token lives 60 seconds, carries a fresh
//!   nonce, and names the exact `METHOD HOST/PATH` it authenticates
//! - **Transport Wrapper** - [`AuthTransport`] signs and forwards; it can wrap
//!   anything implementing [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdpcurl::{config::KeyLoaderConfig, AuthTransport, Transport, UreqTransport, DEFAULT_SERVICE_NAME};
//!
//! // Search for the key file upward from the working directory,
//! // falling back to COINBASE_CLOUD_API_KEY_NAME / COINBASE_CLOUD_API_PRIVATE_KEY
//! let config = KeyLoaderConfig::builder().build();
//! let transport = AuthTransport::new(DEFAULT_SERVICE_NAME, UreqTransport::new(), &config)?;
//!
//! let request = http::Request::get("https://api.developer.coinbase.com/platform/v1/networks")
//!     .body(Vec::new())
//!     .unwrap();
//! let response = transport.send(request)?;
//! println!("{}", response.status());
//! # Ok::<(), cdpcurl::AuthError>(())
//! ```
//!
//! ## Examples
//!
//! See the [basic_workflow demo](demos/basic_workflow.rs) for a complete flow:
//!
//! ```bash
//! cargo run --example basic_workflow
//! ```

pub mod api_key;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod loader;
pub mod transport;

// Re-export main types for easier access
pub use api_key::ApiKey;
pub use auth::Authenticator;
pub use config::KeyLoaderConfig;
pub use crypto::jwt::{create_jwt, sign};
pub use error::{AuthError, Result};
pub use loader::load_api_key;
pub use transport::{AuthTransport, Transport, UreqTransport, DEFAULT_SERVICE_NAME};
