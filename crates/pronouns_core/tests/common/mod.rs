#![allow(dead_code)]

use pronouns_core::{InteractionContext, PronounServices};
use pronouns_discord::{
    CommandOption, Interaction, InteractionData, InteractionResponse, Member, MockDiscord,
    Permissions, User,
};
use pronouns_store::MemoryStore;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const GUILD: &str = "81384788765712384";
pub const USER: &str = "80351110224678912";
pub const CHANNEL: &str = "381870553235193857";
pub const APPLICATION: &str = "1046538011133095936";

pub struct Harness {
    pub discord: MockDiscord,
    pub store: Arc<MemoryStore>,
    pub services: PronounServices,
}

impl Harness {
    pub fn new() -> Self {
        let discord = MockDiscord::new();
        let store = Arc::new(MemoryStore::new());
        let services = PronounServices::new(Arc::new(discord.clone()), store.clone());
        Self {
            discord,
            store,
            services,
        }
    }

    /// Provision roles for the stored configuration and return the records.
    pub async fn provision(&self) -> BTreeMap<String, String> {
        self.services.reconciler().ensure_roles(GUILD).await.unwrap();
        self.discord.clear_calls();
        self.services.roles().get_all_keyed(GUILD).await.unwrap()
    }
}

pub fn member(roles: &[&str], permissions: Permissions) -> Member {
    Member::new(User::new(USER, "alex"))
        .with_roles(roles.iter().copied())
        .with_permissions(permissions)
}

fn interaction(kind: u8, data: InteractionData, member: Member) -> Interaction {
    Interaction {
        id: "1050000000000000001".to_string(),
        application_id: APPLICATION.to_string(),
        kind,
        token: "interaction-token".to_string(),
        guild_id: Some(GUILD.to_string()),
        channel_id: Some(CHANNEL.to_string()),
        member: Some(member),
        data: Some(data),
    }
}

pub fn button(custom_id: &str, member: Member) -> InteractionContext {
    let data = InteractionData {
        custom_id: Some(custom_id.to_string()),
        ..InteractionData::default()
    };
    InteractionContext::from_interaction(interaction(3, data, member)).unwrap()
}

pub fn command(name: &str, options: serde_json::Value, member: Member) -> InteractionContext {
    let options: Vec<CommandOption> = serde_json::from_value(options).unwrap();
    let data = InteractionData {
        name: Some(name.to_string()),
        options,
        ..InteractionData::default()
    };
    InteractionContext::from_interaction(interaction(2, data, member)).unwrap()
}

/// `/name sub` with string or boolean options.
pub fn subcommand(
    name: &str,
    sub: &str,
    options: &[(&str, serde_json::Value)],
    member: Member,
) -> InteractionContext {
    let nested: Vec<serde_json::Value> = options
        .iter()
        .map(|(option, value)| {
            let kind = if value.is_boolean() { 5 } else { 3 };
            serde_json::json!({"name": option, "type": kind, "value": value})
        })
        .collect();
    command(
        name,
        serde_json::json!([{"name": sub, "type": 1, "options": nested}]),
        member,
    )
}

pub fn title(response: &InteractionResponse) -> String {
    response
        .data
        .as_ref()
        .and_then(|data| data.embeds.as_ref())
        .and_then(|embeds| embeds.first())
        .and_then(|embed| embed.title.clone())
        .unwrap_or_default()
}

pub fn description(response: &InteractionResponse) -> String {
    response
        .data
        .as_ref()
        .and_then(|data| data.embeds.as_ref())
        .and_then(|embeds| embeds.first())
        .and_then(|embed| embed.description.clone())
        .unwrap_or_default()
}

pub fn content(response: &InteractionResponse) -> String {
    response
        .data
        .as_ref()
        .and_then(|data| data.content.clone())
        .unwrap_or_default()
}
