// demos/basic_workflow.rs

use base64::prelude::*;
use cdpcurl::{
    config::KeyLoaderConfig, AuthTransport, Authenticator, Result, Transport, DEFAULT_SERVICE_NAME,
};
use http::{Request, Response};
use std::sync::Mutex;

/// Stands in for a real HTTP stack and remembers the Authorization header it saw
#[derive(Default)]
struct EchoTransport {
    last_authorization: Mutex<Option<String>>,
}

impl Transport for EchoTransport {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let auth = request
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.lock().unwrap() = auth;
        Ok(Response::new(b"{\"ok\":true}".to_vec()))
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("cdpcurl Basic Workflow Example");

    // 1. Supply an Ed25519 key directly (normally this comes from a key file)
    let seed = BASE64_STANDARD.encode([7u8; 32]);
    let config = KeyLoaderConfig::builder()
        .env_only()
        .direct("organizations/example/apiKeys/demo", seed)
        .build();

    // 2. Mint a token by hand
    let authenticator = Authenticator::from_config(&config)?;
    let token = authenticator.build_jwt(
        DEFAULT_SERVICE_NAME,
        &["GET api.example.com/v1/accounts".to_string()],
    )?;
    println!("Algorithm: {:?}", authenticator.algorithm());
    println!("Created JWT: {}...", &token[..40]);

    // 3. Let the transport do it for every request
    let transport = AuthTransport::new(DEFAULT_SERVICE_NAME, EchoTransport::default(), &config)?;
    let request = Request::post("https://api.example.com/v1/accounts")
        .body(b"{\"name\":\"demo\"}".to_vec())?;
    let response = transport.send(request)?;

    println!("\nResponse status: {}", response.status());
    if let Some(header) = transport.inner().last_authorization.lock().unwrap().as_deref() {
        println!("Sent Authorization: {}...", &header[..47]);
    }

    println!("\nExample completed!");
    Ok(())
}
