use super::error::ApiError;
use super::types::{Article, ArticleId, AuthReply, SessionStatus};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response body accepted from the service.
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct InteractionBody<'a> {
    article_id: &'a ArticleId,
}

/// Client for the news service.
///
/// Cloning is cheap and clones share one connection pool and one cookie
/// store, so a session established by `login` is visible to every clone.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base: Url,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl NewsClient {
    /// Build a client for the service at `base_url`.
    ///
    /// The base must be HTTPS; plain HTTP is accepted only for `localhost`
    /// and `127.0.0.1` since the session cookie rides on every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::limited(3))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;

        tracing::debug!(base_url = %base, timeout_secs = timeout.as_secs(), "News client ready");
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    /// `GET /api/news`. Empty or absent axes are left unconstrained.
    pub async fn fetch_articles(
        &self,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Article>, ApiError> {
        let mut url = self.endpoint("/api/news");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = query.filter(|q| !q.is_empty()) {
                pairs.append_pair("q", q);
            }
            if let Some(c) = category.filter(|c| !c.is_empty()) {
                pairs.append_pair("category", c);
            }
        }
        // Drop the dangling '?' left behind when no pair was appended
        if url.query() == Some("") {
            url.set_query(None);
        }

        tracing::debug!(url = %url, "Fetching articles");
        let response = send(self.http.get(url)).await?;
        read_json(response).await
    }

    /// `GET /api/recommendations`, surfacing failures.
    pub async fn try_fetch_recommendations(&self) -> Result<Vec<Article>, ApiError> {
        let response = send(self.http.get(self.endpoint("/api/recommendations"))).await?;
        read_json(response).await
    }

    /// `GET /api/recommendations`, degrading to an empty list on any failure.
    pub async fn fetch_recommendations(&self) -> Vec<Article> {
        match self.try_fetch_recommendations().await {
            Ok(articles) => articles,
            Err(ApiError::NotAuthenticated) => {
                tracing::debug!("Recommendations requested without a session");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch recommendations");
                Vec::new()
            }
        }
    }

    /// `POST /api/interactions`. The response body is ignored.
    pub async fn record_interaction(&self, article_id: &ArticleId) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.endpoint("/api/interactions"))
            .json(&InteractionBody { article_id });
        let response = send(request).await?;
        check_status(response).await.map(|_| ())
    }

    /// `GET /api/is_logged_in`. Any failure reads as logged out.
    pub async fn check_session(&self) -> SessionStatus {
        let result = async {
            let response = send(self.http.get(self.endpoint("/api/is_logged_in"))).await?;
            read_json::<SessionStatus>(response).await
        }
        .await;

        match result {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed, treating as logged out");
                SessionStatus {
                    logged_in: false,
                    username: None,
                }
            }
        }
    }

    /// `POST /api/login`. On success the service sets the session cookie and
    /// the confirmed username is returned.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<String, ApiError> {
        let reply = self.post_credentials("/api/login", username, password).await?;
        Ok(reply.username.unwrap_or_else(|| username.to_string()))
    }

    /// `POST /api/register`.
    pub async fn register(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        self.post_credentials("/api/register", username, password)
            .await
            .map(|_| ())
    }

    /// `POST /api/logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = send(self.http.post(self.endpoint("/api/logout"))).await?;
        check_status(response).await.map(|_| ())
    }

    /// Login and register judge success by the presence of `message` in the
    /// body rather than by status, and report failures through `error`.
    async fn post_credentials(
        &self,
        path: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthReply, ApiError> {
        let request = self.http.post(self.endpoint(path)).json(&Credentials {
            username,
            password: password.expose_secret(),
        });
        let response = send(request).await?;
        let status = response.status();
        let bytes = read_limited_bytes(response).await?;

        let reply: AuthReply = match serde_json::from_slice(&bytes) {
            Ok(reply) => reply,
            Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
            Err(_) => AuthReply::default(),
        };

        if reply.message.is_some() {
            tracing::info!(path, username, "Credential request accepted");
            Ok(reply)
        } else {
            tracing::info!(path, status = status.as_u16(), "Credential request rejected");
            Err(ApiError::Api {
                status: status.as_u16(),
                message: reply.error,
            })
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let base = Url::parse(base_url.trim())
        .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

    match base.scheme() {
        "https" => {}
        "http" => {
            let is_localhost = matches!(base.host_str(), Some("localhost") | Some("127.0.0.1"));
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS API base URL");
                return Err(ApiError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS API base URL (localhost only)");
        }
        scheme => {
            return Err(ApiError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                scheme
            )))
        }
    }

    if base.host_str().is_none() {
        return Err(ApiError::InvalidBaseUrl(format!("{}: missing host", base_url)));
    }

    Ok(base)
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    request.send().await.map_err(transport_error)
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e)
    }
}

/// Map non-success statuses to errors, keeping the server's `error` text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::NotAuthenticated);
    }
    if !status.is_success() {
        let message = read_limited_bytes(response)
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<AuthReply>(&bytes).ok())
            .and_then(|reply| reply.error);
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let bytes = read_limited_bytes(response).await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_limited_bytes(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > MAX_BODY_SIZE {
            return Err(ApiError::Decode(format!(
                "response exceeds {} bytes",
                MAX_BODY_SIZE
            )));
        }
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    if bytes.len() > MAX_BODY_SIZE {
        return Err(ApiError::Decode(format!(
            "response exceeds {} bytes",
            MAX_BODY_SIZE
        )));
    }
    Ok(bytes.to_vec())
}
