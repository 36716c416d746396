//! # Authentication Client
//!
//! Username/password login against the cloud account service.
//!
//! ## The Redirect Rule
//! Some deployments sit behind a proxy that redirects `/auth/token`
//! (http→https, trailing-slash rewrites). A generic HTTP client follows
//! those redirects by re-issuing a GET, which silently turns the login into
//! the wrong method and drops the body. This client disables automatic
//! redirects and re-issues the POST itself against the Location target.

use reqwest::{header, redirect, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{CloudError, CloudResult};

/// Login request timeout.
const AUTH_TIMEOUT_SECS: u64 = 10;

/// How many manual redirect hops we tolerate before giving up.
const MAX_REDIRECTS: usize = 3;

/// The login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The user profile as returned by the account service.
///
/// Only `id` and `username` are interpreted; everything else is kept
/// verbatim so the credential file round-trips fields we don't model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A successful login: token plus profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// HTTP client for the authentication endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Creates an auth client for the given base URL.
    pub fn new(base_url: &str) -> CloudResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(AUTH_TIMEOUT_SECS))
            // Redirects are handled manually in login(), preserving POST.
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(AuthClient { client, base_url })
    }

    /// Logs in with username and password.
    ///
    /// ## Returns
    /// * `Ok(AuthSession)` - HTTP 200 with an access token
    /// * `Err(CloudError::Unauthorized)` - HTTP 401/403, bad credentials
    /// * `Err(_)` - transport, status, decode or redirect failure
    pub async fn login(&self, username: &str, password: &str) -> CloudResult<AuthSession> {
        let mut endpoint = Url::parse(&format!("{}/auth/token", self.base_url))?;
        debug!(username = %username, url = %endpoint, "Logging in");

        let body = LoginRequest { username, password };

        for _ in 0..=MAX_REDIRECTS {
            let response = self.client.post(endpoint.clone()).json(&body).send().await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or(CloudError::BadRedirect)?;

                // Relative Location targets resolve against the current URL.
                endpoint = endpoint.join(location)?;
                debug!(url = %endpoint, "Following auth redirect with POST");
                continue;
            }

            return match status {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let session: AuthSession = serde_json::from_str(&body)?;
                    debug!(username = %username, "Login succeeded");
                    Ok(session)
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    warn!(username = %username, "Login rejected");
                    Err(CloudError::Unauthorized)
                }
                other => Err(CloudError::Status(other.as_u16())),
            };
        }

        Err(CloudError::RedirectLoop)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses() {
        let body = r#"{
            "access_token": "tok-123",
            "user": {"id": "u-1", "username": "aliya", "role": "owner"}
        }"#;

        let session: AuthSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.access_token, "tok-123");

        let user = session.user.unwrap();
        assert_eq!(user.id.as_deref(), Some("u-1"));
        assert_eq!(user.username.as_deref(), Some("aliya"));
        // Unmodeled fields survive in `extra`
        assert_eq!(user.extra.get("role").and_then(Value::as_str), Some("owner"));
    }

    #[test]
    fn test_token_response_without_user() {
        let session: AuthSession =
            serde_json::from_str(r#"{"access_token": "tok"}"#).unwrap();
        assert!(session.user.is_none());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(serde_json::from_str::<AuthSession>(r#"{"user": {}}"#).is_err());
    }

    #[test]
    fn test_user_profile_roundtrip() {
        let body = r#"{"id": "u-1", "shop": "central"}"#;
        let profile: UserProfile = serde_json::from_str(body).unwrap();
        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["shop"], "central");
    }
}
