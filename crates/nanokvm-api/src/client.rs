// NanoKVM HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization, the `{ code, msg,
// data }` envelope, and token-based session handling. Endpoint groups
// (status, actions) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{CODE_UNAUTHORIZED, Envelope, LoginResponse};
use crate::transport::TransportConfig;

/// Cookie name carrying the session token.
const TOKEN_COOKIE: &str = "nano-kvm-token";

/// Raw HTTP client for the NanoKVM REST API.
///
/// Owns the session: [`login`](Self::login) obtains a token which is sent
/// as a cookie on every subsequent request, and any request that hits an
/// expired token is retried exactly once through a fresh login. Callers
/// never see auth renewal.
pub struct NanoKvmClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    token: RwLock<Option<String>>,
}

impl NanoKvmClient {
    /// Create a new client for the device at `host`.
    ///
    /// `host` may be a bare hostname/IP, with or without a scheme; the
    /// base URL is normalized to `http://{host}/api/`. Does NOT log in --
    /// call [`login`](Self::login), or let the first request trigger it.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_base(host)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            username: username.into(),
            password,
            token: RwLock::new(None),
        })
    }

    /// The normalized API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Authenticate with the device and store the session token.
    ///
    /// `POST /api/auth/login`. A non-zero envelope code here is always an
    /// authentication failure, never a generic API error.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        });

        let resp = self.http.post(url).json(&body).send().await?;
        let envelope: Envelope<LoginResponse> = decode(resp).await?;

        if envelope.code != 0 {
            return Err(Error::Authentication {
                message: if envelope.msg.is_empty() {
                    format!("login rejected (code {})", envelope.code)
                } else {
                    envelope.msg
                },
            });
        }

        let login = envelope.data.ok_or_else(|| Error::Deserialization {
            message: "login response missing token".into(),
            body: String::new(),
        })?;

        *self.token.write().expect("token lock poisoned") = Some(login.token);
        debug!("login successful");
        Ok(())
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base,
    /// e.g. `vm/gpio` -> `http://host/api/vm/gpio`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ─────────────────────────────────────────────

    /// Send a GET request, unwrapping the envelope. Retries once through
    /// a fresh login if the token has expired.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let data = match self.get_once(path).await {
            Err(e) if e.is_auth_expired() => {
                debug!("token expired, re-authenticating");
                self.login().await?;
                self.get_once(path).await
            }
            other => other,
        }?;
        data.ok_or_else(missing_data)
    }

    /// Send a POST request with a JSON body, unwrapping the envelope.
    /// Retries once through a fresh login if the token has expired.
    /// Action endpoints answer with `data: null`, which is fine here.
    pub(crate) async fn post_unit(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let _: Option<serde_json::Value> = match self.post_once(path, body).await {
            Err(e) if e.is_auth_expired() => {
                debug!("token expired, re-authenticating");
                self.login().await?;
                self.post_once(path, body).await
            }
            other => other,
        }?;
        Ok(())
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, self.cookie_header())
            .send()
            .await?;

        self.parse_envelope(resp).await
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(reqwest::header::COOKIE, self.cookie_header())
            .json(body)
            .send()
            .await?;

        self.parse_envelope(resp).await
    }

    fn cookie_header(&self) -> String {
        match self.token.read().expect("token lock poisoned").as_deref() {
            Some(token) => format!("{TOKEN_COOKIE}={token}"),
            None => String::new(),
        }
    }

    /// Parse the `{ code, msg, data }` envelope, returning `data` on
    /// success, `Error::TokenExpired` on an auth rejection, or
    /// `Error::Api` for any other non-zero code.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::TokenExpired);
        }

        let envelope: Envelope<T> = decode(resp).await?;

        match envelope.code {
            0 => Ok(envelope.data),
            CODE_UNAUTHORIZED => Err(Error::TokenExpired),
            code => Err(Error::Api {
                code,
                message: if envelope.msg.is_empty() {
                    "unspecified device error".into()
                } else {
                    envelope.msg
                },
            }),
        }
    }
}

fn missing_data() -> Error {
    Error::Deserialization {
        message: "envelope missing data field".into(),
        body: String::new(),
    }
}

impl std::fmt::Debug for NanoKvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NanoKvmClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Decode a response body as JSON, keeping the raw text for diagnostics.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Normalize a host string into the API base URL `http://{host}/api/`.
fn normalize_base(host: &str) -> Result<Url, Error> {
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };

    let trimmed = with_scheme.trim_end_matches('/');
    let full = if trimmed.ends_with("/api") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/api/")
    };

    Url::parse(&full).map_err(Error::InvalidUrl)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::normalize_base;

    #[test]
    fn bare_host_gets_scheme_and_api_suffix() {
        let url = normalize_base("192.168.1.50").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/api/");
    }

    #[test]
    fn existing_scheme_is_kept() {
        let url = normalize_base("https://kvm.local/").unwrap();
        assert_eq!(url.as_str(), "https://kvm.local/api/");
    }

    #[test]
    fn api_suffix_is_not_duplicated() {
        let url = normalize_base("http://10.0.0.2/api").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2/api/");
    }

    #[test]
    fn relative_paths_resolve_under_api() {
        let url = normalize_base("kvm.local").unwrap();
        assert_eq!(url.join("vm/gpio").unwrap().as_str(), "http://kvm.local/api/vm/gpio");
    }
}
