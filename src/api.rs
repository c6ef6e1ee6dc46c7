//! Backend REST contracts. `AuthBackend` is the seam the session core talks
//! through; `ApiClient` is the reqwest implementation against the real
//! backend, and also carries the thin typed wrappers for the CRUD and tools
//! surfaces (each a single request with no client-side state machine).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::identity::Identity;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUrlResponse {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostBody {
    pub title: String,
    pub content: String,
}

/// Contract of the auth-relevant backend endpoints. The session core and the
/// callback handler are generic over this so tests can substitute a scripted
/// backend without any network.
pub trait AuthBackend {
    /// `GET /api/public/config`: unauthenticated bootstrap data.
    fn config(&self) -> impl std::future::Future<Output = Result<AppConfig, ApiError>>;

    /// `GET /api/auth/discord/login`: mints a fresh provider redirect URL.
    fn login_url(&self) -> impl std::future::Future<Output = Result<String, ApiError>>;

    /// `GET /api/auth/discord/callback?code=&state=`: single-use code
    /// exchange returning an access credential.
    fn exchange_code(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, ApiError>>;

    /// `GET /api/me`: resolve a credential into an identity; 401 on an
    /// invalid or expired credential.
    fn me(&self, token: &str) -> impl std::future::Future<Output = Result<Identity, ApiError>>;
}

#[derive(Clone)]
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        // Validate early so later joins are plain string concatenation.
        reqwest::Url::parse(base).map_err(|e| ApiError::BadUrl(e.to_string()))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self { base: base.trim_end_matches('/').to_string(), client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut req = self.client.get(self.url(path));
        if let Some(tok) = token {
            req = req.bearer_auth(tok);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(tok) = token {
            req = req.bearer_auth(tok);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        // Fire-and-forget endpoints may answer with an empty body
        if text.is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&text)?)
    }

    // --- Out-of-core surfaces: one request each, results rendered as-is ---

    pub async fn ship_info(&self, name: &str, token: Option<&str>) -> Result<Value, ApiError> {
        let path = format!("/api/ships/info?name={}", urlencoding::encode(name));
        self.get_json(&path, token).await
    }

    pub async fn posts(&self, size: u32, token: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(&format!("/api/posts?size={}", size), token).await
    }

    pub async fn post(&self, id: i64, token: Option<&str>) -> Result<Post, ApiError> {
        self.get_json(&format!("/api/posts/{}", id), token).await
    }

    pub async fn create_post(&self, body: &PostBody, token: &str) -> Result<Post, ApiError> {
        let v = serde_json::to_value(body)?;
        self.send_json(reqwest::Method::POST, "/api/posts", Some(token), Some(&v)).await
    }

    pub async fn update_post(&self, id: i64, body: &PostBody, token: &str) -> Result<Post, ApiError> {
        let v = serde_json::to_value(body)?;
        self.send_json(reqwest::Method::PUT, &format!("/api/posts/{}", id), Some(token), Some(&v))
            .await
    }

    pub async fn delete_post(&self, id: i64, token: &str) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::DELETE, &format!("/api/posts/{}", id), Some(token), None)
            .await
    }

    pub async fn images(&self, size: u32, token: Option<&str>) -> Result<Value, ApiError> {
        self.get_json(&format!("/api/images?size={}", size), token).await
    }

    pub async fn delete_image(&self, id: i64, token: &str) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::DELETE, &format!("/api/images/{}", id), Some(token), None)
            .await
    }

    /// Commodity price summaries (member tool); request shaping only, the
    /// computation lives entirely in the backend.
    pub async fn commodities(&self, query: Option<&str>, token: &str) -> Result<Value, ApiError> {
        let path = match query {
            Some(q) if !q.is_empty() => {
                format!("/api/tools/commodities?q={}", urlencoding::encode(q))
            }
            _ => "/api/tools/commodities".to_string(),
        };
        self.get_json(&path, Some(token)).await
    }

    /// Earnings route computation (member tool), backend-delegated.
    pub async fn routes(&self, payload: &Value, token: &str) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::POST, "/api/tools/routes", Some(token), Some(payload))
            .await
    }

    pub async fn compare(&self, a: &str, b: &str, token: &str) -> Result<Value, ApiError> {
        let body = serde_json::json!({ "a": a, "b": b });
        self.send_json(reqwest::Method::POST, "/api/tools/compare", Some(token), Some(&body)).await
    }

    // --- Admin actions: fire-and-forget, gated server-side ---

    pub async fn admin_users(&self, token: &str) -> Result<Value, ApiError> {
        self.get_json("/api/admin/users", Some(token)).await
    }

    pub async fn admin_set_roles(
        &self,
        user_id: i64,
        roles: &[String],
        token: &str,
    ) -> Result<Value, ApiError> {
        let body = serde_json::json!({ "roles": roles });
        self.send_json(
            reqwest::Method::POST,
            &format!("/api/admin/users/{}/roles", user_id),
            Some(token),
            Some(&body),
        )
        .await
    }

    pub async fn admin_refresh_commodities(&self, token: &str) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::POST, "/api/admin/commodities/refresh", Some(token), None)
            .await
    }

    pub async fn admin_refresh_catalog(&self, token: &str) -> Result<Value, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/api/admin/commodities/catalog/refresh",
            Some(token),
            None,
        )
        .await
    }

    pub async fn admin_sync_ships(&self, token: &str) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::POST, "/api/ships/admin/sync", Some(token), None).await
    }
}

impl AuthBackend for ApiClient {
    async fn config(&self) -> Result<AppConfig, ApiError> {
        self.get_json("/api/public/config", None).await
    }

    async fn login_url(&self) -> Result<String, ApiError> {
        let resp: LoginUrlResponse = self.get_json("/api/auth/discord/login", None).await?;
        Ok(resp.url)
    }

    async fn exchange_code(&self, code: &str, state: Option<&str>) -> Result<String, ApiError> {
        let mut path = format!("/api/auth/discord/callback?code={}", urlencoding::encode(code));
        if let Some(s) = state {
            path.push_str(&format!("&state={}", urlencoding::encode(s)));
        }
        let resp: ExchangeResponse = self.get_json(&path, None).await?;
        Ok(resp.access_token)
    }

    async fn me(&self, token: &str) -> Result<Identity, ApiError> {
        self.get_json("/api/me", Some(token)).await
    }
}
