//! REST operations the bot performs against Discord.

use crate::{CreateRole, Message, MessagePayload, Role};
use pronouns_error::DiscordApiError;

/// Result type for Discord REST calls.
pub type DiscordResult<T> = Result<T, DiscordApiError>;

/// Discord REST surface used by the bot.
///
/// Every call authenticates as the bot. Failures carry the HTTP status class
/// so callers can react to deleted resources (`is_not_found`) differently
/// from missing permissions (`is_permission_denied`).
///
/// # Tracing
///
/// Implementations instrument each call with the guild/channel ids involved.
#[async_trait::async_trait]
pub trait DiscordRest: Send + Sync {
    /// `GET /guilds/{guild}/roles`
    async fn guild_roles(&self, guild_id: &str) -> DiscordResult<Vec<Role>>;

    /// `POST /guilds/{guild}/roles`
    async fn create_role(&self, guild_id: &str, role: &CreateRole) -> DiscordResult<Role>;

    /// `DELETE /guilds/{guild}/roles/{role}`
    async fn delete_role(&self, guild_id: &str, role_id: &str) -> DiscordResult<()>;

    /// `PUT /guilds/{guild}/members/{user}/roles/{role}`
    async fn add_member_role(&self, guild_id: &str, user_id: &str, role_id: &str)
    -> DiscordResult<()>;

    /// `DELETE /guilds/{guild}/members/{user}/roles/{role}`
    async fn remove_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> DiscordResult<()>;

    /// `PATCH /guilds/{guild}/members/{user}` with the full role list.
    async fn set_member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
        role_ids: &[String],
    ) -> DiscordResult<()>;

    /// `PATCH /guilds/{guild}/members/{user}` with a new nickname.
    async fn set_nickname(&self, guild_id: &str, user_id: &str, nick: &str) -> DiscordResult<()>;

    /// `POST /channels/{channel}/messages`
    async fn create_message(
        &self,
        channel_id: &str,
        message: &MessagePayload,
    ) -> DiscordResult<Message>;

    /// `PATCH /channels/{channel}/messages/{message}`
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()>;

    /// `PATCH /webhooks/{application}/{token}/messages/@original`
    async fn edit_original_response(
        &self,
        application_id: &str,
        token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()>;

    /// `POST /webhooks/{application}/{token}`
    async fn create_followup(
        &self,
        application_id: &str,
        token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()>;
}
