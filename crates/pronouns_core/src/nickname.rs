//! Nickname prefixes for guilds that display pronouns without roles.

use crate::GuildConfig;

/// Discord's nickname length limit.
pub const MAX_NICKNAME_LENGTH: usize = 32;

fn truncate(name: &str) -> String {
    name.chars().take(MAX_NICKNAME_LENGTH).collect()
}

/// Remainder of `name` after a leading `[Pronoun]` prefix of any configured
/// pronoun, or `None` when there is no such prefix.
///
/// One space after the closing bracket is dropped along with the prefix.
pub fn strip_pronoun_prefix<'a>(name: &'a str, config: &GuildConfig) -> Option<&'a str> {
    let prefixed = config
        .pronouns
        .iter()
        .any(|(_, entry)| name.starts_with(&format!("[{}]", entry.name)));
    if !prefixed {
        return None;
    }

    let close = name.find(']')?;
    let rest = &name[close + 1..];
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Nickname showing `pronoun` in front of the member's name.
///
/// An existing pronoun prefix is replaced, not stacked. The whole result is
/// cut to the nickname limit.
///
/// ```
/// use pronouns_core::{compose_nickname, default_config};
///
/// let config = default_config();
/// assert_eq!(compose_nickname("[They/Them] Alex", &config, "She/Her"), "[She/Her] Alex");
/// assert_eq!(compose_nickname("Alex", &config, "He/Him"), "[He/Him] Alex");
/// ```
pub fn compose_nickname(current: &str, config: &GuildConfig, pronoun: &str) -> String {
    let base = strip_pronoun_prefix(current, config).unwrap_or(current);
    truncate(&format!("[{}] {}", pronoun, base))
}

/// Nickname with any pronoun prefix removed, `None` when nothing changes.
pub fn cleared_nickname(current: &str, config: &GuildConfig) -> Option<String> {
    strip_pronoun_prefix(current, config).map(truncate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_config;

    #[test]
    fn test_replaces_existing_prefix() {
        let config = default_config();
        assert_eq!(
            compose_nickname("[They/Them] Alex", &config, "She/Her"),
            "[She/Her] Alex"
        );
        assert_eq!(compose_nickname("[Any]Alex", &config, "Ask Me"), "[Ask Me] Alex");
    }

    #[test]
    fn test_adds_prefix_to_plain_name() {
        let config = default_config();
        assert_eq!(compose_nickname("Alex", &config, "He/Him"), "[He/Him] Alex");
        assert_eq!(
            compose_nickname("[Team Red] Alex", &config, "He/Him"),
            "[He/Him] [Team Red] Alex"
        );
    }

    #[test]
    fn test_result_never_exceeds_limit() {
        let config = default_config();
        let long = "Bartholomew Maximilian Fitzgerald";
        let nick = compose_nickname(long, &config, "They/Them");
        assert_eq!(nick.chars().count(), MAX_NICKNAME_LENGTH);
        assert!(nick.starts_with("[They/Them] Bartholomew"));

        let emoji_name = "🌈".repeat(40);
        assert!(compose_nickname(&emoji_name, &config, "She/Her").chars().count() <= 32);
    }

    #[test]
    fn test_clearing() {
        let config = default_config();
        assert_eq!(
            cleared_nickname("[She/Her] Alex", &config).as_deref(),
            Some("Alex")
        );
        assert_eq!(cleared_nickname("Alex", &config), None);
        assert_eq!(cleared_nickname("[Unknown] Alex", &config), None);
    }

    #[test]
    fn test_only_the_space_after_the_prefix_is_dropped() {
        let config = default_config();
        assert_eq!(strip_pronoun_prefix("[Any]Bob] Jr", &config), Some("Bob] Jr"));
        assert_eq!(strip_pronoun_prefix("[Any]  Bob", &config), Some(" Bob"));
        assert_eq!(compose_nickname("[Any]Bob] Jr", &config, "He/Him"), "[He/Him] Bob] Jr");
    }
}
