//! Keeps posted prompts in line with the configuration.

use crate::{GuildConfig, Picker, prompt_message};
use pronouns_discord::DiscordRest;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Re-renders tracked prompt messages after configuration changes.
#[derive(Clone)]
pub struct PromptSynchronizer {
    discord: Arc<dyn DiscordRest>,
}

impl PromptSynchronizer {
    /// Create a synchronizer.
    pub fn new(discord: Arc<dyn DiscordRest>) -> Self {
        Self { discord }
    }

    /// Overwrite every tracked prompt with the current layout.
    ///
    /// Prompts whose message no longer exists are dropped from
    /// `config.pickers`; other failures are logged and the prompt stays
    /// tracked. The caller persists `config`. Returns the number of prompts
    /// dropped.
    #[instrument(skip(self, config), fields(pickers = config.pickers.len()))]
    pub async fn refresh_prompts(&self, config: &mut GuildConfig) -> usize {
        let message = prompt_message(config);
        let mut deleted: Vec<Picker> = Vec::new();

        for picker in &config.pickers {
            let result = self
                .discord
                .edit_message(&picker.channel_id, &picker.message_id, &message)
                .await;
            match result {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    info!(
                        channel_id = %picker.channel_id,
                        message_id = %picker.message_id,
                        "Prompt message was deleted, no longer tracking it"
                    );
                    deleted.push(picker.clone());
                }
                Err(e) => {
                    error!(
                        channel_id = %picker.channel_id,
                        message_id = %picker.message_id,
                        error = %e,
                        "Failed to update prompt message"
                    );
                }
            }
        }

        if !deleted.is_empty() {
            config.pickers.retain(|picker| !deleted.contains(picker));
        }
        deleted.len()
    }
}
