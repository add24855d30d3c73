//! reqwest-backed Discord REST client.

use crate::{CreateRole, DiscordRest, DiscordResult, Message, MessagePayload, Role};
use pronouns_error::{DiscordApiError, DiscordApiErrorKind};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;

/// Discord REST API v10 base URL.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Client for the Discord REST API.
///
/// # Example
///
/// ```no_run
/// use pronouns_discord::{DiscordRest, RestClient, DISCORD_API_BASE};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RestClient::new(DISCORD_API_BASE, std::env::var("DISCORD_TOKEN")?);
/// let roles = client.guild_roles("123456789012345678").await?;
/// println!("{} roles", roles.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client authenticating with a bot token.
    #[instrument(skip(base_url, token), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, token: impl Into<String>) -> Self {
        tracing::debug!("Creating Discord REST client");
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bot {}", self.token))
    }

    async fn execute(&self, request: RequestBuilder) -> DiscordResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            DiscordApiError::new(DiscordApiErrorKind::Transport(e.to_string()))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            format!("Error fetching {}: {}", url, status)
        } else {
            format!("Error fetching {}: {} \n\n {}", url, status, body)
        };
        tracing::error!(status = status.as_u16(), "{}", message);
        Err(DiscordApiError::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> DiscordResult<T> {
        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            DiscordApiError::new(DiscordApiErrorKind::Decode(e.to_string()))
        })
    }
}

#[async_trait::async_trait]
impl DiscordRest for RestClient {
    #[instrument(skip(self))]
    async fn guild_roles(&self, guild_id: &str) -> DiscordResult<Vec<Role>> {
        let response = self
            .execute(self.request(Method::GET, &format!("/guilds/{}/roles", guild_id)))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(name = %role.name))]
    async fn create_role(&self, guild_id: &str, role: &CreateRole) -> DiscordResult<Role> {
        let response = self
            .execute(
                self.request(Method::POST, &format!("/guilds/{}/roles", guild_id))
                    .json(role),
            )
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, guild_id: &str, role_id: &str) -> DiscordResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/guilds/{}/roles/{}", guild_id, role_id),
        ))
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> DiscordResult<()> {
        self.execute(self.request(
            Method::PUT,
            &format!("/guilds/{}/members/{}/roles/{}", guild_id, user_id, role_id),
        ))
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> DiscordResult<()> {
        self.execute(self.request(
            Method::DELETE,
            &format!("/guilds/{}/members/{}/roles/{}", guild_id, user_id, role_id),
        ))
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(role_count = role_ids.len()))]
    async fn set_member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
        role_ids: &[String],
    ) -> DiscordResult<()> {
        self.execute(
            self.request(
                Method::PATCH,
                &format!("/guilds/{}/members/{}", guild_id, user_id),
            )
            .json(&json!({ "roles": role_ids })),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_nickname(&self, guild_id: &str, user_id: &str, nick: &str) -> DiscordResult<()> {
        self.execute(
            self.request(
                Method::PATCH,
                &format!("/guilds/{}/members/{}", guild_id, user_id),
            )
            .json(&json!({ "nick": nick })),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, message))]
    async fn create_message(
        &self,
        channel_id: &str,
        message: &MessagePayload,
    ) -> DiscordResult<Message> {
        let response = self
            .execute(
                self.request(Method::POST, &format!("/channels/{}/messages", channel_id))
                    .json(message),
            )
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, message))]
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()> {
        self.execute(
            self.request(
                Method::PATCH,
                &format!("/channels/{}/messages/{}", channel_id, message_id),
            )
            .json(message),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token, message))]
    async fn edit_original_response(
        &self,
        application_id: &str,
        token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()> {
        self.execute(
            self.request(
                Method::PATCH,
                &format!("/webhooks/{}/{}/messages/@original", application_id, token),
            )
            .json(message),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token, message))]
    async fn create_followup(
        &self,
        application_id: &str,
        token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()> {
        self.execute(
            self.request(
                Method::POST,
                &format!("/webhooks/{}/{}", application_id, token),
            )
            .json(message),
        )
        .await?;
        Ok(())
    }
}
