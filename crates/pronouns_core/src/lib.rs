//! Pronoun picking for Discord guilds.
//!
//! Guild staff configure a set of pronouns and post prompt messages with a
//! button per pronoun. Members press buttons to pick pronouns, which the bot
//! shows either as guild roles or as a `[Pronoun]` nickname prefix.
//!
//! The crate is organised around a few collaborators wired together by
//! [`PronounServices`]:
//! - **repositories**: guild configuration and pronoun role records
//! - **cache**: short-lived copy of member roles
//! - **reconcile**: recreates pronoun roles that are missing or deleted
//! - **sync**: re-renders posted prompts after configuration changes
//! - **selection**: applies button presses
//! - **commands** and **components**: interaction handlers, routed through
//!   a [`HandlerRegistry`]

#![warn(missing_docs)]

mod cache;
mod commands;
mod components;
mod context;
mod emoji;
mod handler;
mod messages;
mod model;
mod nickname;
mod permission;
mod reconcile;
mod render;
mod repository;
mod selection;
mod services;
mod sync;

pub use cache::{MEMBER_ROLE_TTL, MemberRoleCache};
pub use commands::{
    CONFIG_PERMISSIONS, ConfigCommand, OWNER_ONLY_PERMISSIONS, PROMPT_CREATED, PromptCommand,
    PronounsCommand, ResetOption,
};
pub use components::{MultiPromptComponent, PronounsComponent};
pub use context::InteractionContext;
pub use emoji::parse_emoji;
pub use handler::{CommandHandler, ComponentHandler, HandlerRegistry};
pub use messages::{
    GENERIC_ERROR, GUILD_ONLY, NICKNAME_WARNING, RATE_LIMITED, ROLE_CREATION_WARNING, ROLE_WARNING,
    confirmation_reply, embed_reply, ephemeral_reply, guild_only_reply,
    missing_role_permissions_message, rate_limited_reply, validation_reply,
};
pub use model::{
    ANY_KEY, ASK_KEY, DEFAULT_KEYS, DEFAULT_PROMPT_MESSAGE, GuildConfig, MAX_NAME_LENGTH,
    MAX_PICKERS, MAX_PRONOUNS, MAX_SELECTABLE_PRONOUNS, PROMPT_MESSAGE_LIMIT, Picker,
    PronounEntry, PronounSet, default_config, default_pronouns, is_default_key, pronoun_key,
    role_name, validate_name,
};
pub use nickname::{MAX_NICKNAME_LENGTH, cleared_nickname, compose_nickname, strip_pronoun_prefix};
pub use permission::{missing_permissions_reply, require_permissions};
pub use reconcile::RoleReconciler;
pub use render::{
    MEMBER_PICKER_TITLE, MULTI_PROMPT_ID, PROMPT_COLOR, PROMPT_TITLE, clear_id,
    member_picker_message, multi_id, prompt_message, render_member_picker, render_prompt,
    single_id,
};
pub use repository::{GuildConfigRepository, RoleRecordRepository, StoreResult};
pub use selection::{
    CustomId, RoleOutcome, SelectionEngine, SelectionMode, SelectionTarget, selection_message,
};
pub use services::PronounServices;
pub use sync::PromptSynchronizer;
