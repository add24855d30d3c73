//! Discord plumbing for the pronouns bot.
//!
//! This crate holds everything that speaks Discord's wire format:
//! - **models**: members, roles, messages, emoji
//! - **interaction**: incoming interaction payloads and option parsing
//! - **components**: outgoing responses, embeds, action rows and buttons
//! - **permissions**: the member permission bitfield
//! - **rest**: the `DiscordRest` trait the bot logic talks to
//! - **client**: the reqwest-backed `RestClient` implementation
//!
//! Non-2xx responses surface as `DiscordApiError`, classified by status so
//! callers can tell a deleted resource (404) from a permission problem.
//!
//! With the `test-support` feature, `MockDiscord` provides an in-memory
//! guild for tests.

#![warn(missing_docs)]

mod client;
mod components;
mod interaction;
#[cfg(feature = "test-support")]
mod mock;
mod models;
mod permissions;
mod rest;

pub use client::{DISCORD_API_BASE, RestClient};
pub use components::{
    ActionRow, Button, ButtonStyle, Embed, EmbedFooter, InteractionResponse,
    InteractionResponseType, MessageFlags, MessagePayload,
};
pub use interaction::{CommandOption, Interaction, InteractionData, InteractionOptions, InteractionType};
#[cfg(feature = "test-support")]
pub use mock::{DiscordCall, MockDiscord};
pub use models::{CreateRole, Emoji, Member, Message, Role, User};
pub use permissions::Permissions;
pub use rest::{DiscordRest, DiscordResult};
