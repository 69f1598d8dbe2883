//! HTTP Basic authentication for the organization endpoint.
//!
//! Credentials are checked through the [`CredentialVerifier`] trait so the
//! handler never knows where the accepted credentials come from. The bundled
//! [`StaticCredentials`] compares against one configured user/password pair.
//!
//! # Security Properties
//!
//! - **Constant-time comparison**: both the user name and the password are
//!   compared with `subtle`, and both comparisons always run
//! - **Uniform rejection**: missing, malformed and wrong credentials all
//!   produce the same 401 response, so callers cannot tell which part failed
//!
//! # Example
//!
//! ```rust
//! use antivirus_api::server::auth::{CredentialVerifier, StaticCredentials};
//!
//! let verifier = StaticCredentials::new("admin", "s3cret");
//! assert!(verifier.verify("admin", "s3cret"));
//! assert!(!verifier.verify("admin", "guess"));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Default realm sent in the `WWW-Authenticate` challenge.
pub const DEFAULT_REALM: &str = "Please enter valid username and password";

/// Body returned with every 401 response.
pub const UNAUTHORIZED_BODY: &str = "You are Unauthorized to access the application.\n";

// =============================================================================
// Credential Verification
// =============================================================================

/// Decides whether a user/password pair is allowed through.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, user: &str, password: &str) -> bool;
}

/// A single fixed user/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    user: Vec<u8>,
    password: Vec<u8>,
}

impl StaticCredentials {
    pub fn new(user: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Self {
        Self {
            user: user.as_ref().to_vec(),
            password: password.as_ref().to_vec(),
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("user", &String::from_utf8_lossy(&self.user))
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, user: &str, password: &str) -> bool {
        let user_ok = user.as_bytes().ct_eq(&self.user);
        let password_ok = password.as_bytes().ct_eq(&self.password);
        (user_ok & password_ok).into()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a request was rejected. Only logged; the client sees the same
/// response for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header
    MissingCredentials,

    /// Header present but not a decodable `Basic` credential
    MalformedCredentials,

    /// Credentials decoded but were not accepted
    InvalidCredentials,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Missing credentials"),
            AuthError::MalformedCredentials => write!(f, "Malformed credentials"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
        }
    }
}

/// A 401 challenge carrying the realm to advertise.
#[derive(Debug, Clone)]
pub struct AuthRejection {
    pub reason: AuthError,
    realm: Arc<str>,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self.reason {
            AuthError::InvalidCredentials => {
                warn!(status = 401, "Authentication failed: {}", self.reason)
            }
            _ => debug!(status = 401, "Authentication failed: {}", self.reason),
        }

        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));

        (
            StatusCode::UNAUTHORIZED,
            [
                (header::WWW_AUTHENTICATE, challenge),
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
            ],
            UNAUTHORIZED_BODY,
        )
            .into_response()
    }
}

// =============================================================================
// Basic Auth
// =============================================================================

/// Middleware state: the verifier plus the realm used in challenges.
#[derive(Clone)]
pub struct BasicAuth {
    verifier: Arc<dyn CredentialVerifier>,
    realm: Arc<str>,
}

impl BasicAuth {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, realm: &str) -> Self {
        Self {
            verifier,
            realm: Arc::from(realm),
        }
    }

    /// Check a raw `Authorization` header value.
    pub fn check(&self, authorization: Option<&HeaderValue>) -> Result<(), AuthRejection> {
        let reject = |reason| AuthRejection {
            reason,
            realm: Arc::clone(&self.realm),
        };

        let header = authorization.ok_or_else(|| reject(AuthError::MissingCredentials))?;
        let header = header
            .to_str()
            .map_err(|_| reject(AuthError::MalformedCredentials))?;
        let (user, password) =
            parse_basic_credentials(header).ok_or_else(|| reject(AuthError::MalformedCredentials))?;

        if self.verifier.verify(&user, &password) {
            Ok(())
        } else {
            Err(reject(AuthError::InvalidCredentials))
        }
    }
}

/// Decode a `Basic <base64(user:password)>` header value.
///
/// The scheme name is matched case-insensitively. The password may contain
/// colons; the user name may not.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;

    Some((user.to_string(), password.to_string()))
}

/// Axum middleware rejecting requests without valid Basic credentials.
///
/// Rejected requests never reach the inner handler, so no query runs.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
///
/// let auth = BasicAuth::new(Arc::new(StaticCredentials::new("admin", "pw")), DEFAULT_REALM);
/// let app = Router::new()
///     .route("/getOrg", get(organizations_handler))
///     .layer(middleware::from_fn_with_state(auth, basic_auth_middleware));
/// ```
pub async fn basic_auth_middleware(
    State(auth): State<BasicAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    auth.check(request.headers().get(header::AUTHORIZATION))?;
    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
