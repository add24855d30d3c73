mod common;

use async_trait::async_trait;
use common::{GUILD, Harness, USER, button, content, member};
use pronouns_core::{GuildConfig, NICKNAME_WARNING, ROLE_WARNING, RoleRecordRepository};
use pronouns_discord::{DiscordCall, InteractionResponseType, Permissions};
use pronouns_error::{StoreError, StoreErrorKind, ValidationErrorKind};
use pronouns_store::{KeyValueStore, PutOptions};
use std::sync::Arc;

fn nobody() -> Permissions {
    Permissions::empty()
}

async fn use_nicknames(harness: &Harness) {
    let mut config: GuildConfig = harness.services.configs().get(GUILD).await.unwrap();
    config.use_roles = false;
    harness.services.configs().save(GUILD, &config).await.unwrap();
}

#[tokio::test]
async fn test_single_select_replaces_previous_pronoun() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let selection = harness.services.selection();

    let first = selection
        .select(&button("pronouns:she_her", member(&[], nobody())), "pronouns:she_her")
        .await
        .unwrap();
    assert_eq!(content(&first), "Your preferred pronoun has been set to **She/Her**.");

    // The payload snapshot is stale; the cache knows about She/Her.
    let second = selection
        .select(&button("pronouns:he_him", member(&[], nobody())), "pronouns:he_him")
        .await
        .unwrap();
    assert_eq!(content(&second), "Your preferred pronoun has been set to **He/Him**.");

    let held = harness.discord.member_roles(GUILD, USER);
    assert_eq!(held.into_iter().collect::<Vec<_>>(), vec![records["he_him"].clone()]);
}

#[tokio::test]
async fn test_they_them_replaces_held_she_her() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let she_her = records["she_her"].as_str();
    harness.discord.set_member_role_state(GUILD, USER, [she_her]);

    let response = harness
        .services
        .selection()
        .select(
            &button("pronouns:they_them", member(&[she_her], nobody())),
            "pronouns:they_them",
        )
        .await
        .unwrap();

    assert_eq!(response.kind, InteractionResponseType::ChannelMessageWithSource);
    assert!(response.data.as_ref().unwrap().is_ephemeral());
    let held: Vec<String> = harness.discord.member_roles(GUILD, USER).into_iter().collect();
    assert_eq!(held, vec![records["they_them"].clone()]);
    let cached = harness.services.cache().get(GUILD, USER).await.unwrap().unwrap();
    assert!(cached.contains(&records["they_them"]));
    assert!(!cached.contains(she_her));
}

#[tokio::test]
async fn test_multi_select_toggles() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let selection = harness.services.selection();
    let id = "pronouns:they_them:multi";

    let on = selection.select(&button(id, member(&[], nobody())), id).await.unwrap();
    assert_eq!(on.kind, InteractionResponseType::UpdateMessage);
    assert!(harness.discord.member_roles(GUILD, USER).contains(&records["they_them"]));

    let off = selection.select(&button(id, member(&[], nobody())), id).await.unwrap();
    assert_eq!(off.kind, InteractionResponseType::UpdateMessage);
    assert!(harness.discord.member_roles(GUILD, USER).is_empty());
    assert!(
        !harness
            .services
            .cache()
            .get(GUILD, USER)
            .await
            .unwrap()
            .unwrap()
            .contains(&records["they_them"])
    );
}

#[tokio::test]
async fn test_any_and_ask_exclude_each_other() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let selection = harness.services.selection();

    let any = "pronouns:any:multi";
    let ask = "pronouns:ask:multi";
    selection.select(&button(any, member(&[], nobody())), any).await.unwrap();
    selection.select(&button(ask, member(&[], nobody())), ask).await.unwrap();

    let held = harness.discord.member_roles(GUILD, USER);
    assert!(held.contains(&records["ask"]));
    assert!(!held.contains(&records["any"]));
}

#[tokio::test]
async fn test_payload_roles_used_without_cache() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let she_her = records["she_her"].clone();
    harness
        .discord
        .set_member_role_state(GUILD, USER, [she_her.clone()]);

    let id = "pronouns:she_her:multi";
    harness
        .services
        .selection()
        .select(&button(id, member(&[she_her.as_str()], nobody())), id)
        .await
        .unwrap();

    assert!(harness.discord.calls().contains(&DiscordCall::RemoveMemberRole {
        guild_id: GUILD.to_string(),
        user_id: USER.to_string(),
        role_id: she_her.clone(),
    }));
    assert!(harness.discord.member_roles(GUILD, USER).is_empty());
}

#[tokio::test]
async fn test_clear_keeps_unrelated_roles() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let held = [records["she_her"].as_str(), records["he_him"].as_str(), "555"];
    harness.discord.set_member_role_state(GUILD, USER, held);

    let id = "pronouns:$clear:multi";
    let response = harness
        .services
        .selection()
        .select(&button(id, member(&held, nobody())), id)
        .await
        .unwrap();

    assert_eq!(response.kind, InteractionResponseType::UpdateMessage);
    assert!(harness.discord.calls().contains(&DiscordCall::SetMemberRoles {
        guild_id: GUILD.to_string(),
        user_id: USER.to_string(),
        role_ids: vec!["555".to_string()],
    }));
}

#[tokio::test]
async fn test_nickname_mode_prefixes_nickname() {
    let harness = Harness::new();
    use_nicknames(&harness).await;

    let alex = member(&[], nobody()).with_nick("[She/Her] Alex");
    let response = harness
        .services
        .selection()
        .select(&button("pronouns:they_them", alex), "pronouns:they_them")
        .await
        .unwrap();

    assert_eq!(content(&response), "Your preferred pronoun has been set to **They/Them**.");
    assert_eq!(
        harness.discord.nickname(GUILD, USER).as_deref(),
        Some("[They/Them] Alex")
    );
    assert!(harness.discord.created_role_names().is_empty());
}

#[tokio::test]
async fn test_multi_select_needs_role_mode() {
    let harness = Harness::new();
    use_nicknames(&harness).await;

    let id = "pronouns:he_him:multi";
    let err = harness
        .services
        .selection()
        .select(&button(id, member(&[], nobody())), id)
        .await
        .unwrap_err();

    assert_eq!(
        err.as_validation().map(|e| e.kind().clone()),
        Some(ValidationErrorKind::MultiSelectRequiresRoles)
    );
    assert!(harness.discord.calls().is_empty());
}

#[tokio::test]
async fn test_role_mode_drops_leftover_nickname_prefix() {
    let harness = Harness::new();
    harness.provision().await;

    let alex = member(&[], nobody()).with_nick("[He/Him] Alex");
    harness
        .services
        .selection()
        .select(&button("pronouns:she_her", alex), "pronouns:she_her")
        .await
        .unwrap();

    assert_eq!(harness.discord.nickname(GUILD, USER).as_deref(), Some("Alex"));
}

#[tokio::test]
async fn test_refused_role_grant_warns_member() {
    let harness = Harness::new();
    let records = harness.provision().await;
    harness.discord.fail_role_assignment(&records["he_him"], 403);

    let response = harness
        .services
        .selection()
        .select(&button("pronouns:he_him", member(&[], nobody())), "pronouns:he_him")
        .await
        .unwrap();

    assert_eq!(
        content(&response),
        format!("Your preferred pronoun has been set to **He/Him**.\n\n{}", ROLE_WARNING)
    );
    assert!(response.data.as_ref().unwrap().is_ephemeral());
    assert!(harness.discord.webhook_messages().is_empty());
    // The cache keeps the optimistic state.
    let cached = harness.services.cache().get(GUILD, USER).await.unwrap().unwrap();
    assert!(cached.contains(&records["he_him"]));
}

#[tokio::test]
async fn test_clear_keeps_roles_granted_elsewhere() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let he_him = records["he_him"].as_str();
    harness.discord.set_member_role_state(GUILD, USER, ["vip"]);

    let selection = harness.services.selection();
    selection
        .select(&button("pronouns:he_him", member(&["vip"], nobody())), "pronouns:he_him")
        .await
        .unwrap();

    // A moderator hands out a role after the cache was written.
    let live = ["vip", he_him, "moderator"];
    harness.discord.set_member_role_state(GUILD, USER, live);
    let id = "pronouns:$clear:multi";
    selection.select(&button(id, member(&live, nobody())), id).await.unwrap();

    let held: Vec<String> = harness.discord.member_roles(GUILD, USER).into_iter().collect();
    assert_eq!(held, vec!["moderator".to_string(), "vip".to_string()]);
}

#[tokio::test]
async fn test_clear_with_nothing_held_calls_nobody() {
    let harness = Harness::new();
    harness.provision().await;

    let id = "pronouns:$clear:multi";
    let response = harness
        .services
        .selection()
        .select(&button(id, member(&["555"], nobody())), id)
        .await
        .unwrap();

    assert_eq!(response.kind, InteractionResponseType::UpdateMessage);
    assert_eq!(content(&response), "");
    assert!(harness.discord.calls().is_empty());
}

#[tokio::test]
async fn test_refused_clear_warns_member() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let she_her = records["she_her"].as_str();
    harness.discord.set_member_role_state(GUILD, USER, [she_her]);
    harness.discord.fail_member_update(403);
    let selection = harness.services.selection();

    let id = "pronouns:$clear:multi";
    let cleared = selection
        .select(&button(id, member(&[she_her], nobody())), id)
        .await
        .unwrap();
    assert_eq!(cleared.kind, InteractionResponseType::UpdateMessage);
    assert_eq!(content(&cleared), ROLE_WARNING);
    assert!(harness.discord.member_roles(GUILD, USER).contains(she_her));

    // Single select clears first; the refusal is reported, the grant still happens.
    let single = selection
        .select(&button("pronouns:he_him", member(&[she_her], nobody())), "pronouns:he_him")
        .await
        .unwrap();
    assert_eq!(
        content(&single),
        format!("Your preferred pronoun has been set to **He/Him**.\n\n{}", ROLE_WARNING)
    );
    assert!(harness.discord.member_roles(GUILD, USER).contains(&records["he_him"]));
}

#[tokio::test]
async fn test_toggle_off_of_vanished_role_succeeds() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let selection = harness.services.selection();
    let id = "pronouns:they_them:multi";

    selection.select(&button(id, member(&[], nobody())), id).await.unwrap();
    harness.discord.fail_role_removal(&records["they_them"], 404);

    let off = selection.select(&button(id, member(&[], nobody())), id).await.unwrap();

    assert_eq!(off.kind, InteractionResponseType::UpdateMessage);
    assert_eq!(content(&off), "");
    let cached = harness.services.cache().get(GUILD, USER).await.unwrap().unwrap();
    assert!(!cached.contains(&records["they_them"]));
}

#[tokio::test]
async fn test_meta_answers_coexist_with_pronouns() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let selection = harness.services.selection();

    for id in ["pronouns:she_her:multi", "pronouns:any:multi"] {
        selection.select(&button(id, member(&[], nobody())), id).await.unwrap();
    }
    let held = harness.discord.member_roles(GUILD, USER);
    assert!(held.contains(&records["she_her"]));
    assert!(held.contains(&records["any"]));

    let ask = "pronouns:ask:multi";
    selection.select(&button(ask, member(&[], nobody())), ask).await.unwrap();
    let held = harness.discord.member_roles(GUILD, USER);
    assert!(held.contains(&records["she_her"]));
    assert!(held.contains(&records["ask"]));
    assert!(!held.contains(&records["any"]));
}

#[tokio::test]
async fn test_refused_nickname_warns_member() {
    let harness = Harness::new();
    use_nicknames(&harness).await;
    harness.discord.fail_nickname(403);

    let response = harness
        .services
        .selection()
        .select(&button("pronouns:they_them", member(&[], nobody())), "pronouns:they_them")
        .await
        .unwrap();

    assert_eq!(
        content(&response),
        format!(
            "Your preferred pronoun has been set to **They/Them**.\n\n{}",
            NICKNAME_WARNING
        )
    );
    assert_eq!(harness.discord.nickname(GUILD, USER), None);
}

#[tokio::test]
async fn test_unknown_pronoun_is_rejected() {
    let harness = Harness::new();
    harness.provision().await;

    let err = harness
        .services
        .selection()
        .select(&button("pronouns:xe_xem", member(&[], nobody())), "pronouns:xe_xem")
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_validation().map(|e| e.kind()),
        Some(ValidationErrorKind::UnknownPronoun(_))
    ));
}

/// Lists one role record whose value has gone missing.
struct TornStore;

#[async_trait]
impl KeyValueStore for TornStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: String, _options: PutOptions) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(vec![format!("{}they_them", prefix)])
    }
}

#[tokio::test]
async fn test_listed_record_without_value_fails() {
    let roles = RoleRecordRepository::new(Arc::new(TornStore));

    let err = roles.get_all_keyed(GUILD).await.unwrap_err();

    assert_eq!(
        err.kind,
        StoreErrorKind::MissingValue(format!("roles:{}:they_them", GUILD))
    );
    assert!(roles.get_all(GUILD).await.is_err());
}
