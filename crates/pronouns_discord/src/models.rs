//! Discord resource models.
//!
//! Only the fields the bot reads are modeled; unknown fields are ignored on
//! deserialization. Snowflakes stay strings, as Discord sends them.

use crate::Permissions;
use serde::{Deserialize, Serialize};

/// Discord user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct User {
    /// Snowflake ID
    id: String,
    /// Account username
    username: String,
    /// Display name, if set
    #[serde(default)]
    global_name: Option<String>,
}

impl User {
    /// Create a user.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            global_name: None,
        }
    }
}

/// Guild member as embedded in an interaction payload.
///
/// `roles` is the snapshot Discord took when the interaction was sent; it is
/// the fallback truth whenever no cached role set exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user account
    pub user: User,
    /// Guild nickname
    #[serde(default)]
    pub nick: Option<String>,
    /// Role ids held when the interaction was sent
    #[serde(default)]
    pub roles: Vec<String>,
    /// Computed permissions in the interaction channel
    #[serde(default)]
    pub permissions: Permissions,
}

impl Member {
    /// Create a member with no nickname, roles or permissions.
    pub fn new(user: User) -> Self {
        Self {
            user,
            nick: None,
            roles: Vec::new(),
            permissions: Permissions::empty(),
        }
    }

    /// Builder-style role assignment.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style nickname assignment.
    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    /// Builder-style permission assignment.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Snowflake of the underlying user.
    pub fn user_id(&self) -> &str {
        self.user.id()
    }

    /// Name shown in the guild: nickname, else username.
    pub fn display_name(&self) -> &str {
        match &self.nick {
            Some(nick) => nick,
            None => self.user.username(),
        }
    }
}

/// Guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Snowflake ID
    pub id: String,
    /// Role name
    pub name: String,
    /// Sort position
    #[serde(default)]
    pub position: i64,
    /// Managed by an integration
    #[serde(default)]
    pub managed: bool,
}

/// Body of a role creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRole {
    /// Role name
    pub name: String,
    /// Whether the role can be mentioned
    pub mentionable: bool,
}

impl CreateRole {
    /// Unmentionable role with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mentionable: false,
        }
    }
}

/// Posted message (only the identity fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID
    pub id: String,
    /// Channel the message lives in
    pub channel_id: String,
}

/// Emoji reference on a button.
///
/// Unicode emoji carry only `name`; custom guild emoji carry `name` and `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emoji {
    /// Unicode character(s) or custom emoji name
    pub name: String,
    /// Custom emoji snowflake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Animated custom emoji
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}

impl Emoji {
    /// Standard unicode emoji.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            animated: false,
        }
    }

    /// Custom guild emoji.
    pub fn custom(name: impl Into<String>, id: impl Into<String>, animated: bool) -> Self {
        Self {
            name: name.into(),
            id: Some(id.into()),
            animated,
        }
    }
}
