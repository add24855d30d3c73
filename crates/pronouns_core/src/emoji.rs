//! Emoji arguments of the `/pronouns` command.

use pronouns_discord::Emoji;
use regex::Regex;
use std::sync::LazyLock;

static CUSTOM_EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?P<animated>a?):(?P<name>[A-Za-z0-9_~]+):(?P<id>\d+)>")
        .expect("Valid custom emoji regex")
});

/// Parse an emoji argument.
///
/// Accepts a custom guild emoji (`<:name:id>` or `<a:name:id>`) anywhere in
/// the input, else the first whitespace-separated token when it contains no
/// ASCII letters, digits or markup.
///
/// ```
/// use pronouns_core::parse_emoji;
///
/// assert_eq!(parse_emoji("<:pride:1234>").unwrap().id.as_deref(), Some("1234"));
/// assert_eq!(parse_emoji("🌈").unwrap().name, "🌈");
/// assert!(parse_emoji("rainbow").is_none());
/// ```
pub fn parse_emoji(input: &str) -> Option<Emoji> {
    if let Some(captures) = CUSTOM_EMOJI.captures(input) {
        return Some(Emoji::custom(
            &captures["name"],
            &captures["id"],
            !captures["animated"].is_empty(),
        ));
    }

    let token = input.split_whitespace().next()?;
    let plain = token
        .chars()
        .all(|c| !c.is_ascii_alphanumeric() && !matches!(c, '<' | '>' | ':' | '@' | '#'));
    plain.then(|| Emoji::unicode(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_emoji() {
        let emoji = parse_emoji("look <a:spin:987654321> here").unwrap();
        assert_eq!(emoji, Emoji::custom("spin", "987654321", true));

        let still = parse_emoji("<:flag:42>").unwrap();
        assert!(!still.animated);
    }

    #[test]
    fn test_unicode_emoji() {
        assert_eq!(parse_emoji("  ✨ sparkle"), Some(Emoji::unicode("✨")));
        assert_eq!(parse_emoji("🏳️‍⚧️"), Some(Emoji::unicode("🏳️‍⚧️")));
    }

    #[test]
    fn test_rejects_text() {
        assert!(parse_emoji("").is_none());
        assert!(parse_emoji("none").is_none());
        assert!(parse_emoji(":smile:").is_none());
        assert!(parse_emoji("<@1234>").is_none());
    }
}
