//! Wiring of the bot's collaborators.

use crate::commands::{ConfigCommand, PromptCommand, PronounsCommand};
use crate::components::{MultiPromptComponent, PronounsComponent};
use crate::{
    GuildConfigRepository, HandlerRegistry, MemberRoleCache, PromptSynchronizer, RoleReconciler,
    RoleRecordRepository, SelectionEngine,
};
use derive_getters::Getters;
use pronouns_discord::DiscordRest;
use pronouns_store::KeyValueStore;
use std::sync::Arc;

/// Repositories, cache and engines sharing one Discord client and store.
#[derive(Clone, Getters)]
pub struct PronounServices {
    /// Discord REST client
    discord: Arc<dyn DiscordRest>,
    /// Guild configurations
    configs: GuildConfigRepository,
    /// Pronoun role records
    roles: RoleRecordRepository,
    /// Member role cache
    cache: MemberRoleCache,
    /// Role self-healing
    reconciler: RoleReconciler,
    /// Prompt re-rendering
    prompts: PromptSynchronizer,
    /// Button press handling
    selection: SelectionEngine,
}

impl PronounServices {
    /// Wire everything over a Discord client and a store.
    pub fn new(discord: Arc<dyn DiscordRest>, store: Arc<dyn KeyValueStore>) -> Self {
        let configs = GuildConfigRepository::new(store.clone());
        let roles = RoleRecordRepository::new(store.clone());
        let cache = MemberRoleCache::new(store);
        Self {
            reconciler: RoleReconciler::new(discord.clone(), configs.clone(), roles.clone()),
            prompts: PromptSynchronizer::new(discord.clone()),
            selection: SelectionEngine::new(
                discord.clone(),
                configs.clone(),
                roles.clone(),
                cache.clone(),
            ),
            discord,
            configs,
            roles,
            cache,
        }
    }

    /// Registry with every command and component of the bot.
    pub fn registry(&self) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry
            .register_command(PronounsCommand::new(self.clone()))
            .register_command(ConfigCommand::new(self.clone()))
            .register_command(PromptCommand::new(self.clone()))
            .register_component(PronounsComponent::new(self.clone()))
            .register_component(MultiPromptComponent::new(self.clone()));
        registry
    }
}
