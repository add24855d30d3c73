//! Slash command and component handler registry.

use crate::InteractionContext;
use async_trait::async_trait;
use pronouns_discord::InteractionResponse;
use pronouns_error::PronounsResult;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler for one slash command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name as registered with Discord.
    fn name(&self) -> &'static str;

    /// Produce the interaction response.
    ///
    /// Rejected input is answered with an explanatory reply, not an error.
    /// Errors mean the command could not be carried out.
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse>;
}

/// Handler for a family of message components.
#[async_trait]
pub trait ComponentHandler: Send + Sync {
    /// Custom id prefix (the part before the first `:`).
    fn key(&self) -> &'static str;

    /// Produce the interaction response.
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse>;
}

/// Handlers resolved by command name or custom id prefix.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    commands: HashMap<&'static str, Arc<dyn CommandHandler>>,
    components: HashMap<&'static str, Arc<dyn ComponentHandler>>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command handler, replacing one with the same name.
    pub fn register_command<H: CommandHandler + 'static>(&mut self, handler: H) -> &mut Self {
        tracing::debug!(command = handler.name(), "Registering command handler");
        self.commands.insert(handler.name(), Arc::new(handler));
        self
    }

    /// Register a component handler, replacing one with the same key.
    pub fn register_component<H: ComponentHandler + 'static>(&mut self, handler: H) -> &mut Self {
        tracing::debug!(component = handler.key(), "Registering component handler");
        self.components.insert(handler.key(), Arc::new(handler));
        self
    }

    /// Handler of a command.
    pub fn command(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.get(name).cloned()
    }

    /// Handler of a component, by full custom id.
    pub fn component(&self, custom_id: &str) -> Option<Arc<dyn ComponentHandler>> {
        let key = custom_id.split(':').next().unwrap_or(custom_id);
        self.components.get(key).cloned()
    }

    /// Registered command names, sorted.
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
