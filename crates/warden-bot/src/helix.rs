//! Twitch Helix API client backing the profile service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use warden_commands::ProfileService;
use warden_common::{Result, WardenError};
use warden_config::ApiConfig;

const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/helix";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only Helix client: user lookups, follower checks, stream state.
#[derive(Debug)]
pub struct HelixClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    bearer_token: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    data: Vec<HelixUser>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct FollowersResponse {
    total: u64,
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    data: Vec<HelixStream>,
}

#[derive(Debug, Deserialize)]
struct HelixStream {
    started_at: DateTime<Utc>,
}

impl HelixClient {
    /// Creates a client from the configured credentials.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WardenError::profile(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: api.client_id.clone(),
            bearer_token: api.bearer_token.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| WardenError::profile(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WardenError::profile_with_status(
                format!("{path} returned {status}"),
                status.as_u16(),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| WardenError::profile(format!("invalid response from {path}: {e}")))
    }
}

#[async_trait]
impl ProfileService for HelixClient {
    async fn user_exists(&self, login: &str) -> Result<bool> {
        let response: UsersResponse = self.get("/users", &[("login", login)]).await?;
        Ok(!response.data.is_empty())
    }

    async fn is_follower(&self, user_id: &str, room_id: &str) -> Result<bool> {
        let response: FollowersResponse = self
            .get(
                "/channels/followers",
                &[("broadcaster_id", room_id), ("user_id", user_id)],
            )
            .await?;
        Ok(!response.data.is_empty())
    }

    async fn follower_count(&self, room_id: &str) -> Result<u64> {
        let response: FollowersResponse = self
            .get(
                "/channels/followers",
                &[("broadcaster_id", room_id), ("first", "1")],
            )
            .await?;
        Ok(response.total)
    }

    async fn stream_started_at(&self, room_id: &str) -> Result<Option<DateTime<Utc>>> {
        let response: StreamsResponse = self.get("/streams", &[("user_id", room_id)]).await?;
        Ok(response.data.first().map(|stream| stream.started_at))
    }
}

/// Stand-in used when no API credentials are configured.
///
/// Follower checks degrade to "not a follower"; the informational
/// lookups surface an error for the command handlers to report.
#[derive(Debug, Default)]
pub struct DisabledProfile;

#[async_trait]
impl ProfileService for DisabledProfile {
    async fn user_exists(&self, _login: &str) -> Result<bool> {
        Err(WardenError::profile("profile service is not configured"))
    }

    async fn is_follower(&self, _user_id: &str, _room_id: &str) -> Result<bool> {
        Ok(false)
    }

    async fn follower_count(&self, _room_id: &str) -> Result<u64> {
        Err(WardenError::profile("profile service is not configured"))
    }

    async fn stream_started_at(&self, _room_id: &str) -> Result<Option<DateTime<Utc>>> {
        Err(WardenError::profile("profile service is not configured"))
    }
}
