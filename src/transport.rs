use http::{header::AUTHORIZATION, HeaderValue, Request, Response};
use log::trace;

use crate::{
    api_key::ApiKey,
    auth::Authenticator,
    config::KeyLoaderConfig,
    error::{AuthError, Result},
};

/// Audience used by the CLI; tokens carry `aud: [""]`
pub const DEFAULT_SERVICE_NAME: &str = "";

/// Something that sends an HTTP request and returns the response
pub trait Transport {
    /// Send `request`, returning the response whatever its status
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a [`ureq::Agent`]
///
/// Non-2xx responses are returned as responses rather than errors.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let (parts, body) = request.into_parts();
        let response = if body.is_empty() {
            self.agent.run(Request::from_parts(parts, ()))
        } else {
            self.agent.run(Request::from_parts(parts, body))
        }
        .map_err(|e| AuthError::Transport(e.to_string()))?;

        let (parts, mut body) = response.into_parts();
        let bytes = body
            .read_to_vec()
            .map_err(|e| AuthError::Transport(format!("reading response body: {}", e)))?;
        Ok(Response::from_parts(parts, bytes))
    }
}

/// Transport that signs every request before handing it to `inner`
///
/// Each request gets its own token bound to `"<METHOD> <HOST><PATH>"` and
/// sent as `Authorization: Bearer <token>`, replacing any existing
/// `Authorization` header. If a token cannot be minted, nothing is sent.
///
/// # Example
/// ```rust
/// use cdpcurl::{ApiKey, AuthTransport, Transport, UreqTransport, DEFAULT_SERVICE_NAME};
///
/// let api_key = ApiKey::new(
///     "organizations/o/apiKeys/k",
///     "AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyA=",
/// );
/// let transport =
///     AuthTransport::with_api_key(DEFAULT_SERVICE_NAME, UreqTransport::new(), &api_key).unwrap();
/// # let _ = &transport;
/// ```
#[derive(Debug)]
pub struct AuthTransport<T> {
    inner: T,
    authenticator: Authenticator,
    service: String,
}

impl<T: Transport> AuthTransport<T> {
    /// Resolve the API key with `config` and wrap `inner`
    pub fn new(service: impl Into<String>, inner: T, config: &KeyLoaderConfig) -> Result<Self> {
        let authenticator = Authenticator::from_config(config)?;
        Ok(Self::with_authenticator(service, inner, authenticator))
    }

    /// Wrap `inner` using an API key that has already been resolved
    pub fn with_api_key(service: impl Into<String>, inner: T, api_key: &ApiKey) -> Result<Self> {
        let authenticator = Authenticator::new(api_key)?;
        Ok(Self::with_authenticator(service, inner, authenticator))
    }

    pub fn with_authenticator(service: impl Into<String>, inner: T, authenticator: Authenticator) -> Self {
        Self {
            inner,
            authenticator,
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for AuthTransport<T> {
    fn send(&self, mut request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let uri = request_uri(&request)?;
        let token = self.authenticator.build_jwt(&self.service, &[uri])?;
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AuthError::InvalidRequest(format!("authorization header: {}", e)))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        trace!("sending signed {} {}", request.method(), request.uri());
        self.inner.send(request)
    }
}

/// The `uris` claim entry for `request`: `"<METHOD> <HOST><PATH>"`
///
/// The host keeps an explicit port; user info and the query string are left
/// out. The path is percent-decoded.
///
/// # Errors
/// - `InvalidRequest` if the request URI has no host
///
/// # Example
/// ```rust
/// use cdpcurl::transport::request_uri;
///
/// let request = http::Request::post("https://svc.example.com/v1/items?limit=5")
///     .body(Vec::<u8>::new())
///     .unwrap();
/// assert_eq!(request_uri(&request).unwrap(), "POST svc.example.com/v1/items");
/// ```
pub fn request_uri<B>(request: &Request<B>) -> Result<String> {
    let uri = request.uri();
    let authority = uri.authority().ok_or_else(|| {
        AuthError::InvalidRequest(format!("no host in request uri {}", uri))
    })?;
    let host = match authority.port() {
        Some(port) => format!("{}:{}", authority.host(), port),
        None => authority.host().to_string(),
    };
    let path = urlencoding::decode_binary(uri.path().as_bytes());
    Ok(format!(
        "{} {}{}",
        request.method(),
        host,
        String::from_utf8_lossy(&path)
    ))
}
