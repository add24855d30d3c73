//! Guild interaction wrapper handed to handlers.

use pronouns_discord::{Interaction, InteractionOptions, Member};

/// An interaction known to come from a guild member.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    interaction: Interaction,
    guild_id: String,
    member: Member,
    options: InteractionOptions,
}

impl InteractionContext {
    /// Wrap an interaction; `None` outside guilds.
    pub fn from_interaction(interaction: Interaction) -> Option<Self> {
        let guild_id = interaction.guild_id.clone()?;
        let member = interaction.member.clone()?;
        let options = interaction.options();
        Some(Self {
            interaction,
            guild_id,
            member,
            options,
        })
    }

    /// Raw interaction.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Guild the interaction came from.
    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    /// Acting member.
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Acting member's user id.
    pub fn user_id(&self) -> &str {
        self.member.user_id()
    }

    /// Parsed command options.
    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Channel the interaction came from.
    pub fn channel_id(&self) -> Option<&str> {
        self.interaction.channel_id.as_deref()
    }

    /// Application the interaction targets.
    pub fn application_id(&self) -> &str {
        &self.interaction.application_id
    }

    /// Webhook continuation token.
    pub fn token(&self) -> &str {
        &self.interaction.token
    }

    /// Pressed component's custom id.
    pub fn custom_id(&self) -> Option<&str> {
        self.interaction.custom_id()
    }
}
