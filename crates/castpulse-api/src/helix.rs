//! Twitch Helix `StatusProvider` implementation over reqwest.

use async_trait::async_trait;
use serde::Deserialize;

use castpulse_core::error::{ApiError, ApiResult};
use castpulse_core::traits::StatusProvider;
use castpulse_core::types::Emote;

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Helix API client with Client-ID + Bearer authentication.
pub struct HelixClient {
    client: reqwest::Client,
    base_url: String,
}

impl HelixClient {
    pub fn new(client_id: &str, bearer_token: &str) -> ApiResult<Self> {
        Self::with_base_url(client_id, bearer_token, HELIX_BASE)
    }

    pub fn with_base_url(client_id: &str, bearer_token: &str, base_url: &str) -> ApiResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Client-ID",
            client_id
                .parse()
                .map_err(|_| ApiError::Decode("invalid client id".into()))?,
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {bearer_token}")
                .parse()
                .map_err(|_| ApiError::Decode("invalid token".into()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_transport_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connection(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Connection(e.to_string())
        }
    }

    /// Map a non-success response to the failure taxonomy.
    fn check_status(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
        match resp.status().as_u16() {
            200..=299 => Ok(resp),
            401 => Err(ApiError::Auth("invalid or expired token".into())),
            429 => Err(ApiError::RateLimit),
            code => Err(ApiError::Status(code)),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(resp)?
            .json()
            .await
            .map_err(Self::map_transport_error)
    }
}

#[derive(Debug, Deserialize)]
struct HelixPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct HelixStream {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct HelixFollow {
    #[allow(dead_code)]
    followed_at: String,
}

#[derive(Debug, Deserialize)]
struct HelixEmote {
    id: String,
    name: String,
}

#[async_trait]
impl StatusProvider for HelixClient {
    async fn resolve_user_id(&self, login: &str) -> ApiResult<Option<String>> {
        let page: HelixPage<HelixUser> = self.get_json("/users", &[("login", login)]).await?;
        Ok(page.data.into_iter().next().map(|u| u.id))
    }

    async fn fetch_live_streams(&self, user_id: &str) -> ApiResult<bool> {
        let page: HelixPage<HelixStream> =
            self.get_json("/streams", &[("user_id", user_id)]).await?;
        Ok(!page.data.is_empty())
    }

    async fn fetch_follow_edge(&self, follower_id: &str, channel_id: &str) -> ApiResult<bool> {
        let page: HelixPage<HelixFollow> = self
            .get_json(
                "/channels/followed",
                &[("user_id", follower_id), ("broadcaster_id", channel_id)],
            )
            .await?;
        Ok(!page.data.is_empty())
    }

    async fn post_follow_edge(&self, follower_id: &str, channel_id: &str) -> ApiResult<bool> {
        let resp = self
            .client
            .post(format!("{}/users/follows", self.base_url))
            .json(&serde_json::json!({
                "from_id": follower_id,
                "to_id": channel_id,
            }))
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Ok(Self::check_status(resp).is_ok())
    }

    async fn fetch_emotes(&self, user_id: &str) -> ApiResult<Vec<Emote>> {
        let page: HelixPage<HelixEmote> = self
            .get_json("/chat/emotes", &[("broadcaster_id", user_id)])
            .await?;
        Ok(page
            .data
            .into_iter()
            .map(|e| Emote {
                id: e.id,
                name: e.name,
            })
            .collect())
    }

    async fn fetch_self_user(&self) -> ApiResult<Option<String>> {
        let page: HelixPage<HelixUser> = self.get_json("/users", &[]).await?;
        Ok(page.data.into_iter().next().map(|u| u.display_name))
    }
}
