use pronouns_discord::{
    ActionRow, Button, ButtonStyle, Emoji, Interaction, InteractionResponse, InteractionType,
    MessagePayload, Permissions,
};
use serde_json::json;

fn command_payload() -> serde_json::Value {
    json!({
        "id": "1100",
        "application_id": "42",
        "type": 2,
        "token": "tok",
        "guild_id": "7",
        "channel_id": "8",
        "member": {
            "user": {"id": "55", "username": "robin", "global_name": null},
            "nick": "[They/Them] Robin",
            "roles": ["r1", "r2"],
            "permissions": "268435488",
            "joined_at": "2021-01-01T00:00:00Z"
        },
        "data": {
            "id": "999",
            "name": "pronouns",
            "options": [
                {"name": "add", "type": 1, "options": [
                    {"name": "pronoun", "type": 3, "value": "Xe/Xem"},
                    {"name": "hidden", "type": 5, "value": true}
                ]}
            ]
        }
    })
}

#[test]
fn test_command_interaction_deserializes() {
    let interaction: Interaction = serde_json::from_value(command_payload()).unwrap();

    assert_eq!(interaction.interaction_type(), InteractionType::ApplicationCommand);
    assert_eq!(interaction.command_name(), Some("pronouns"));
    assert_eq!(interaction.custom_id(), None);

    let member = interaction.member.as_ref().unwrap();
    assert_eq!(member.user_id(), "55");
    assert_eq!(member.display_name(), "[They/Them] Robin");
    assert_eq!(member.roles, vec!["r1".to_string(), "r2".to_string()]);
    assert!(member.permissions.contains(Permissions::MANAGE_ROLES));
    assert!(member.permissions.contains(Permissions::MANAGE_GUILD));
    assert!(!member.permissions.contains(Permissions::MANAGE_MESSAGES));
}

#[test]
fn test_subcommand_options() {
    let interaction: Interaction = serde_json::from_value(command_payload()).unwrap();
    let options = interaction.options();

    let (name, add) = options.subcommand().unwrap();
    assert_eq!(name, "add");
    assert_eq!(add.get_str("pronoun"), Some("Xe/Xem"));
    assert_eq!(add.get_bool("hidden"), Some(true));
    assert!(!add.has("emoji"));
    assert!(add.subcommand().is_none());
}

#[test]
fn test_component_and_ping_interactions() {
    let press: Interaction = serde_json::from_value(json!({
        "id": "1",
        "application_id": "42",
        "type": 3,
        "token": "tok",
        "guild_id": "7",
        "member": {"user": {"id": "55", "username": "robin"}, "roles": []},
        "data": {"custom_id": "pronouns:she_her:multi", "component_type": 2}
    }))
    .unwrap();
    assert_eq!(press.interaction_type(), InteractionType::MessageComponent);
    assert_eq!(press.custom_id(), Some("pronouns:she_her:multi"));
    assert_eq!(press.member.unwrap().display_name(), "robin");

    let ping: Interaction = serde_json::from_value(json!({
        "id": "2", "application_id": "42", "type": 1, "token": "tok"
    }))
    .unwrap();
    assert_eq!(ping.interaction_type(), InteractionType::Ping);
    assert!(ping.member.is_none());
    assert!(ping.options().subcommand().is_none());
}

#[test]
fn test_numeric_permissions_accepted() {
    let perms: Permissions = serde_json::from_value(json!(8)).unwrap();
    assert!(perms.allows(Permissions::MANAGE_ROLES));
    assert_eq!(serde_json::to_value(perms).unwrap(), json!("8"));
}

#[test]
fn test_response_serialization() {
    assert_eq!(
        serde_json::to_value(InteractionResponse::pong()).unwrap(),
        json!({"type": 1})
    );

    let reply = InteractionResponse::message(MessagePayload::ephemeral_text("hi"));
    assert_eq!(
        serde_json::to_value(reply).unwrap(),
        json!({"type": 4, "data": {"content": "hi", "flags": 64}})
    );

    let deferred = InteractionResponse::deferred(true);
    assert_eq!(
        serde_json::to_value(deferred).unwrap(),
        json!({"type": 5, "data": {"flags": 64}})
    );
}

#[test]
fn test_button_row_serialization() {
    let row = ActionRow::new(vec![
        Button::new("pronouns:he_him", "He/Him", ButtonStyle::Secondary),
        Button::new("pronouns:xe_xem", "Xe/Xem", ButtonStyle::Secondary)
            .with_emoji(Some(Emoji::custom("xe", "123", true))),
    ]);
    let update = InteractionResponse::update(MessagePayload::components(vec![row]));

    assert_eq!(
        serde_json::to_value(update).unwrap(),
        json!({
            "type": 7,
            "data": {"components": [{"type": 1, "components": [
                {"type": 2, "style": 2, "label": "He/Him", "custom_id": "pronouns:he_him"},
                {"type": 2, "style": 2, "label": "Xe/Xem", "custom_id": "pronouns:xe_xem",
                 "emoji": {"name": "xe", "id": "123", "animated": true}}
            ]}]}
        })
    );
}
