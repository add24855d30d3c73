//! In-memory Discord for unit testing without network access.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! pronouns_discord = { workspace = true, features = ["test-support"] }
//! ```

use crate::{CreateRole, DiscordRest, DiscordResult, Message, MessagePayload, Role};
use pronouns_error::DiscordApiError;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One recorded REST call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscordCall {
    /// Guild role listing
    GuildRoles {
        /// Guild
        guild_id: String,
    },
    /// Role creation
    CreateRole {
        /// Guild
        guild_id: String,
        /// Requested name
        name: String,
    },
    /// Role deletion
    DeleteRole {
        /// Guild
        guild_id: String,
        /// Deleted role
        role_id: String,
    },
    /// Single role grant
    AddMemberRole {
        /// Guild
        guild_id: String,
        /// Member
        user_id: String,
        /// Granted role
        role_id: String,
    },
    /// Single role removal
    RemoveMemberRole {
        /// Guild
        guild_id: String,
        /// Member
        user_id: String,
        /// Removed role
        role_id: String,
    },
    /// Full role list replacement
    SetMemberRoles {
        /// Guild
        guild_id: String,
        /// Member
        user_id: String,
        /// New role list
        role_ids: Vec<String>,
    },
    /// Nickname change
    SetNickname {
        /// Guild
        guild_id: String,
        /// Member
        user_id: String,
        /// New nickname
        nick: String,
    },
    /// New channel message
    CreateMessage {
        /// Channel
        channel_id: String,
    },
    /// Channel message edit
    EditMessage {
        /// Channel
        channel_id: String,
        /// Edited message
        message_id: String,
    },
    /// Edit of the original interaction response
    EditOriginalResponse {
        /// Payload sent
        message: MessagePayload,
    },
    /// Webhook follow-up message
    CreateFollowup {
        /// Payload sent
        message: MessagePayload,
    },
}

#[derive(Debug, Default)]
struct MockState {
    roles: HashMap<String, Vec<Role>>,
    member_roles: HashMap<(String, String), BTreeSet<String>>,
    nicknames: HashMap<(String, String), String>,
    messages: HashSet<(String, String)>,
    next_id: u64,
    calls: Vec<DiscordCall>,
    create_role_failure: Option<u16>,
    assign_failures: HashMap<String, u16>,
    removal_failures: HashMap<String, u16>,
    member_update_failure: Option<u16>,
    nickname_failure: Option<u16>,
    edit_failures: HashMap<String, u16>,
}

impl MockState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("{}", 900_000 + self.next_id)
    }

    fn member(&mut self, guild_id: &str, user_id: &str) -> &mut BTreeSet<String> {
        self.member_roles
            .entry((guild_id.to_string(), user_id.to_string()))
            .or_default()
    }
}

/// Simulated Discord backend.
///
/// Tracks guild roles, member roles, nicknames and posted messages, records
/// every call, and can be told to fail specific operations with a chosen
/// HTTP status. Editing a message it never saw answers 404, like a message
/// that was deleted by hand.
#[derive(Clone, Default)]
pub struct MockDiscord {
    state: Arc<Mutex<MockState>>,
}

impl MockDiscord {
    /// Empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing guild role.
    pub fn add_guild_role(&self, guild_id: &str, role_id: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .roles
            .entry(guild_id.to_string())
            .or_default()
            .push(Role {
                id: role_id.to_string(),
                name: name.to_string(),
                position: 0,
                managed: false,
            });
    }

    /// Delete a guild role behind the bot's back.
    pub fn remove_guild_role(&self, guild_id: &str, role_id: &str) {
        if let Some(roles) = self.state.lock().unwrap().roles.get_mut(guild_id) {
            roles.retain(|role| role.id != role_id);
        }
    }

    /// Ids of the roles that currently exist in the guild.
    pub fn guild_role_ids(&self, guild_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .roles
            .get(guild_id)
            .map(|roles| roles.iter().map(|role| role.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Register an existing channel message.
    pub fn add_message(&self, channel_id: &str, message_id: &str) {
        self.state
            .lock()
            .unwrap()
            .messages
            .insert((channel_id.to_string(), message_id.to_string()));
    }

    /// Delete a message behind the bot's back.
    pub fn remove_message(&self, channel_id: &str, message_id: &str) {
        self.state
            .lock()
            .unwrap()
            .messages
            .remove(&(channel_id.to_string(), message_id.to_string()));
    }

    /// Seed the roles a member actually holds.
    pub fn set_member_role_state<I, S>(&self, guild_id: &str, user_id: &str, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock().unwrap();
        *state.member(guild_id, user_id) = roles.into_iter().map(Into::into).collect();
    }

    /// Roles a member actually holds.
    pub fn member_roles(&self, guild_id: &str, user_id: &str) -> BTreeSet<String> {
        self.state
            .lock()
            .unwrap()
            .member_roles
            .get(&(guild_id.to_string(), user_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Last nickname set for a member.
    pub fn nickname(&self, guild_id: &str, user_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .nicknames
            .get(&(guild_id.to_string(), user_id.to_string()))
            .cloned()
    }

    /// Make every role creation fail with `status`.
    pub fn fail_role_creation(&self, status: u16) {
        self.state.lock().unwrap().create_role_failure = Some(status);
    }

    /// Make granting `role_id` fail with `status`.
    pub fn fail_role_assignment(&self, role_id: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .assign_failures
            .insert(role_id.to_string(), status);
    }

    /// Make removing `role_id` from a member fail with `status`.
    pub fn fail_role_removal(&self, role_id: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .removal_failures
            .insert(role_id.to_string(), status);
    }

    /// Make every full role list replacement fail with `status`.
    pub fn fail_member_update(&self, status: u16) {
        self.state.lock().unwrap().member_update_failure = Some(status);
    }

    /// Make every nickname change fail with `status`.
    pub fn fail_nickname(&self, status: u16) {
        self.state.lock().unwrap().nickname_failure = Some(status);
    }

    /// Make editing `message_id` fail with `status`.
    pub fn fail_message_edit(&self, message_id: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .edit_failures
            .insert(message_id.to_string(), status);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<DiscordCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Names passed to role creation, in order.
    pub fn created_role_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DiscordCall::CreateRole { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Payloads sent to the interaction webhook (edits and follow-ups).
    pub fn webhook_messages(&self) -> Vec<MessagePayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DiscordCall::EditOriginalResponse { message }
                | DiscordCall::CreateFollowup { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls, keeping the simulated state.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait::async_trait]
impl DiscordRest for MockDiscord {
    async fn guild_roles(&self, guild_id: &str) -> DiscordResult<Vec<Role>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::GuildRoles {
            guild_id: guild_id.to_string(),
        });
        Ok(state.roles.get(guild_id).cloned().unwrap_or_default())
    }

    async fn create_role(&self, guild_id: &str, role: &CreateRole) -> DiscordResult<Role> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::CreateRole {
            guild_id: guild_id.to_string(),
            name: role.name.clone(),
        });
        if let Some(status) = state.create_role_failure {
            return Err(DiscordApiError::from_status(status, "Missing Permissions"));
        }

        let created = Role {
            id: state.next_id(),
            name: role.name.clone(),
            position: 0,
            managed: false,
        };
        state
            .roles
            .entry(guild_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete_role(&self, guild_id: &str, role_id: &str) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::DeleteRole {
            guild_id: guild_id.to_string(),
            role_id: role_id.to_string(),
        });
        let roles = state.roles.entry(guild_id.to_string()).or_default();
        let before = roles.len();
        roles.retain(|role| role.id != role_id);
        if roles.len() == before {
            return Err(DiscordApiError::from_status(404, "Unknown Role"));
        }
        Ok(())
    }

    async fn add_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::AddMemberRole {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        if let Some(status) = state.assign_failures.get(role_id).copied() {
            return Err(DiscordApiError::from_status(status, "Missing Permissions"));
        }
        state.member(guild_id, user_id).insert(role_id.to_string());
        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::RemoveMemberRole {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        if let Some(status) = state.removal_failures.get(role_id).copied() {
            return Err(DiscordApiError::from_status(status, "Role removal failed"));
        }
        state.member(guild_id, user_id).remove(role_id);
        Ok(())
    }

    async fn set_member_roles(
        &self,
        guild_id: &str,
        user_id: &str,
        role_ids: &[String],
    ) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::SetMemberRoles {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            role_ids: role_ids.to_vec(),
        });
        if let Some(status) = state.member_update_failure {
            return Err(DiscordApiError::from_status(status, "Missing Permissions"));
        }
        *state.member(guild_id, user_id) = role_ids.iter().cloned().collect();
        Ok(())
    }

    async fn set_nickname(&self, guild_id: &str, user_id: &str, nick: &str) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::SetNickname {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            nick: nick.to_string(),
        });
        if let Some(status) = state.nickname_failure {
            return Err(DiscordApiError::from_status(status, "Missing Permissions"));
        }
        state
            .nicknames
            .insert((guild_id.to_string(), user_id.to_string()), nick.to_string());
        Ok(())
    }

    async fn create_message(
        &self,
        channel_id: &str,
        _message: &MessagePayload,
    ) -> DiscordResult<Message> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::CreateMessage {
            channel_id: channel_id.to_string(),
        });
        let id = state.next_id();
        state
            .messages
            .insert((channel_id.to_string(), id.clone()));
        Ok(Message {
            id,
            channel_id: channel_id.to_string(),
        })
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        _message: &MessagePayload,
    ) -> DiscordResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DiscordCall::EditMessage {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
        });
        if let Some(status) = state.edit_failures.get(message_id).copied() {
            return Err(DiscordApiError::from_status(status, "Edit failed"));
        }
        if !state
            .messages
            .contains(&(channel_id.to_string(), message_id.to_string()))
        {
            return Err(DiscordApiError::from_status(404, "Unknown Message"));
        }
        Ok(())
    }

    async fn edit_original_response(
        &self,
        _application_id: &str,
        _token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(DiscordCall::EditOriginalResponse {
                message: message.clone(),
            });
        Ok(())
    }

    async fn create_followup(
        &self,
        _application_id: &str,
        _token: &str,
        message: &MessagePayload,
    ) -> DiscordResult<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(DiscordCall::CreateFollowup {
                message: message.clone(),
            });
        Ok(())
    }
}
