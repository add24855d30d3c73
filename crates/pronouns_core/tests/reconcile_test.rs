mod common;

use common::{CHANNEL, GUILD, Harness};
use pronouns_core::{Picker, default_config};
use pronouns_discord::DiscordCall;

#[tokio::test]
async fn test_ensure_roles_creates_each_role_once() {
    let harness = Harness::new();
    let reconciler = harness.services.reconciler();

    reconciler.ensure_roles(GUILD).await.unwrap();
    let names = harness.discord.created_role_names();
    assert_eq!(
        names,
        vec!["Any Pronouns", "Pronouns: Ask Me", "They/Them", "She/Her", "He/Him"]
    );

    reconciler.ensure_roles(GUILD).await.unwrap();
    assert_eq!(harness.discord.created_role_names().len(), 5);

    let records = harness.services.roles().get_all_keyed(GUILD).await.unwrap();
    assert_eq!(records.len(), 5);
    let live = harness.discord.guild_role_ids(GUILD);
    assert!(records.values().all(|role_id| live.contains(role_id)));
}

#[tokio::test]
async fn test_deleted_role_is_recreated() {
    let harness = Harness::new();
    let records = harness.provision().await;
    let stale = records["she_her"].clone();
    harness.discord.remove_guild_role(GUILD, &stale);

    harness.services.reconciler().ensure_roles(GUILD).await.unwrap();

    assert_eq!(harness.discord.created_role_names(), vec!["She/Her"]);
    let fresh = harness
        .services
        .roles()
        .get(GUILD, "she_her")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(fresh, stale);
    assert!(harness.discord.guild_role_ids(GUILD).contains(&fresh));
}

#[tokio::test]
async fn test_failures_are_collected_after_full_pass() {
    let harness = Harness::new();
    let records = harness.provision().await;
    harness.discord.remove_guild_role(GUILD, &records["any"]);
    harness.discord.remove_guild_role(GUILD, &records["he_him"]);
    harness.discord.fail_role_creation(403);

    let err = harness
        .services
        .reconciler()
        .ensure_roles(GUILD)
        .await
        .unwrap_err();

    let reconcile = err.as_reconcile().expect("reconcile error");
    assert_eq!(reconcile.failed_keys, vec!["any", "he_him"]);
    assert!(reconcile.permission_denied);
    // Both keys were attempted even though the first failed.
    assert_eq!(harness.discord.created_role_names().len(), 2);
}

#[tokio::test]
async fn test_unsaved_config_is_reconciled() {
    let harness = Harness::new();
    let mut config = default_config();
    config.add_pronoun("Xe/Xem", None).unwrap();

    harness
        .services
        .reconciler()
        .ensure_roles_for(GUILD, &config)
        .await
        .unwrap();

    assert!(harness.discord.created_role_names().contains(&"Xe/Xem".to_string()));
    assert!(
        harness
            .services
            .roles()
            .get(GUILD, "xe_xem")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_refresh_prunes_only_deleted_prompts() {
    let harness = Harness::new();
    harness.discord.add_message(CHANNEL, "1");
    harness.discord.add_message(CHANNEL, "3");
    harness.discord.fail_message_edit("3", 500);

    let mut config = default_config();
    for id in ["1", "2", "3"] {
        config.track_picker(Picker::new(CHANNEL, id));
    }

    let dropped = harness.services.prompts().refresh_prompts(&mut config).await;

    assert_eq!(dropped, 1);
    let kept: Vec<&str> = config.pickers.iter().map(|p| p.message_id.as_str()).collect();
    assert_eq!(kept, vec!["1", "3"]);
    let edits = harness
        .discord
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DiscordCall::EditMessage { .. }))
        .count();
    assert_eq!(edits, 3);
}
