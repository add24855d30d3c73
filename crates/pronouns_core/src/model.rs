//! Per-guild pronoun configuration.
//!
//! The configuration is persisted as JSON under `guild-config:{guild}`. The
//! pronoun map keeps insertion order so buttons render in the order the
//! pronouns were added.

use pronouns_discord::Emoji;
use pronouns_error::{ValidationError, ValidationErrorKind};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of the "any pronouns" meta entry.
pub const ANY_KEY: &str = "any";
/// Key of the "ask me" meta entry.
pub const ASK_KEY: &str = "ask";
/// Keys present in every fresh configuration; these can never be removed.
pub const DEFAULT_KEYS: [&str; 5] = [ANY_KEY, ASK_KEY, "they_them", "she_her", "he_him"];

/// Maximum pronoun entries per guild (selectable plus `any` and `ask`).
pub const MAX_PRONOUNS: usize = 17;
/// Maximum selectable pronouns shown to admins in the capacity message.
pub const MAX_SELECTABLE_PRONOUNS: usize = MAX_PRONOUNS - 2;
/// Maximum display name length.
pub const MAX_NAME_LENGTH: usize = 16;
/// Maximum prompt message length, ellipsis included.
pub const PROMPT_MESSAGE_LIMIT: usize = 500;
/// Number of posted prompts kept in sync.
pub const MAX_PICKERS: usize = 5;

/// Prompt text of a fresh configuration.
pub const DEFAULT_PROMPT_MESSAGE: &str =
    "Use the buttons below to select what pronouns you'd like us to display for you.";

/// Derive the stable key of a pronoun display name.
///
/// Lowercases the name and replaces every character outside `a-z` with `_`.
///
/// ```
/// use pronouns_core::pronoun_key;
///
/// assert_eq!(pronoun_key("They/Them"), "they_them");
/// assert_eq!(pronoun_key("Xe / Xem"), "xe___xem");
/// ```
pub fn pronoun_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { '_' })
        .collect()
}

/// True for the keys every guild starts with.
pub fn is_default_key(key: &str) -> bool {
    DEFAULT_KEYS.contains(&key)
}

/// One selectable pronoun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronounEntry {
    /// Display name, at most 16 characters
    pub name: String,
    /// Emoji shown on the button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
    /// Left out of the main button grid (`any` and `ask`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide_button: bool,
}

impl PronounEntry {
    /// Visible entry without emoji.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: None,
            hide_button: false,
        }
    }

    /// Entry left out of the main button grid.
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            hide_button: true,
            ..Self::new(name)
        }
    }

    /// Builder-style emoji assignment.
    pub fn with_emoji(mut self, emoji: Option<Emoji>) -> Self {
        self.emoji = emoji;
        self
    }
}

/// Ordered pronoun map keyed by [`pronoun_key`].
///
/// Serializes as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronounSet {
    entries: Vec<(String, PronounEntry)>,
}

impl PronounSet {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by key.
    pub fn get(&self, key: &str) -> Option<&PronounEntry> {
        self.entries
            .iter()
            .find_map(|(k, entry)| (k == key).then_some(entry))
    }

    /// Mutable entry by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut PronounEntry> {
        self.entries
            .iter_mut()
            .find_map(|(k, entry)| (k == key).then_some(entry))
    }

    /// True when the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace an entry; a replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, entry: PronounEntry) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(existing) => *existing = entry,
            None => self.entries.push((key, entry)),
        }
    }

    /// Remove an entry by key.
    pub fn remove(&mut self, key: &str) -> Option<PronounEntry> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PronounEntry)> {
        self.entries.iter().map(|(k, entry)| (k.as_str(), entry))
    }

    /// Entries shown in the main button grid.
    pub fn visible(&self) -> impl Iterator<Item = (&str, &PronounEntry)> {
        self.iter().filter(|(_, entry)| !entry.hide_button)
    }

    /// Entry whose display name matches, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<(&str, &PronounEntry)> {
        let wanted = name.to_lowercase();
        self.iter()
            .find(|(_, entry)| entry.name.to_lowercase() == wanted)
    }
}

impl FromIterator<(String, PronounEntry)> for PronounSet {
    fn from_iter<I: IntoIterator<Item = (String, PronounEntry)>>(iter: I) -> Self {
        let mut set = Self::default();
        for (key, entry) in iter {
            set.insert(key, entry);
        }
        set
    }
}

impl Serialize for PronounSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PronounSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PronounSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of pronoun keys to entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PronounSet, A::Error> {
                let mut set = PronounSet::default();
                while let Some((key, entry)) = access.next_entry::<String, PronounEntry>()? {
                    set.insert(key, entry);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// A posted prompt message kept in sync with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Picker {
    /// Channel of the prompt message
    #[serde(rename = "c")]
    pub channel_id: String,
    /// Prompt message id
    #[serde(rename = "m")]
    pub message_id: String,
}

impl Picker {
    /// Picker for a posted message.
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// Configuration of one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    /// Assign roles (true) or prefix nicknames (false)
    pub use_roles: bool,
    /// Only the owner may change the configuration
    pub only_owner_can_config: bool,
    /// Text shown in prompt messages
    pub prompt_message: String,
    /// Selectable pronouns
    pub pronouns: PronounSet,
    /// Posted prompts, oldest first
    #[serde(default)]
    pub pickers: Vec<Picker>,
}

/// Fresh default configuration.
///
/// Every call builds a new value, so callers may mutate the result freely.
pub fn default_config() -> GuildConfig {
    GuildConfig {
        use_roles: true,
        only_owner_can_config: true,
        prompt_message: DEFAULT_PROMPT_MESSAGE.to_string(),
        pronouns: default_pronouns(),
        pickers: Vec::new(),
    }
}

/// Pronouns of a fresh configuration.
pub fn default_pronouns() -> PronounSet {
    [
        (ANY_KEY, PronounEntry::hidden("Any")),
        (ASK_KEY, PronounEntry::hidden("Ask Me")),
        ("they_them", PronounEntry::new("They/Them")),
        ("she_her", PronounEntry::new("She/Her")),
        ("he_him", PronounEntry::new("He/Him")),
    ]
    .into_iter()
    .map(|(key, entry)| (key.to_string(), entry))
    .collect()
}

/// Name of the guild role backing a pronoun.
///
/// The meta entries get descriptive role names; everything else uses the
/// display name.
pub fn role_name(key: &str, entry: &PronounEntry) -> String {
    match key {
        ANY_KEY => "Any Pronouns".to_string(),
        ASK_KEY => "Pronouns: Ask Me".to_string(),
        _ => entry.name.clone(),
    }
}

impl Default for GuildConfig {
    fn default() -> Self {
        default_config()
    }
}

impl GuildConfig {
    /// Replace the prompt text, truncating with an ellipsis past the limit.
    pub fn set_prompt_message(&mut self, message: &str) {
        self.prompt_message = if message.chars().count() > PROMPT_MESSAGE_LIMIT {
            let kept: String = message.chars().take(PROMPT_MESSAGE_LIMIT - 3).collect();
            format!("{}...", kept)
        } else {
            message.to_string()
        };
    }

    /// Add a pronoun, returning its key.
    ///
    /// Rejects over-long names, a full set and names whose key is taken.
    pub fn add_pronoun(
        &mut self,
        name: &str,
        emoji: Option<Emoji>,
    ) -> Result<String, ValidationError> {
        validate_name(name)?;
        if self.pronouns.len() >= MAX_PRONOUNS {
            return Err(ValidationErrorKind::CapacityExceeded(MAX_SELECTABLE_PRONOUNS).into());
        }
        let key = pronoun_key(name);
        if self.pronouns.contains_key(&key) {
            return Err(ValidationErrorKind::DuplicatePronoun(name.to_string()).into());
        }
        self.pronouns
            .insert(key.clone(), PronounEntry::new(name).with_emoji(emoji));
        Ok(key)
    }

    /// Remove a pronoun by display name (case-insensitive).
    ///
    /// Returns the removed key and entry. Default pronouns are refused.
    pub fn remove_pronoun(&mut self, name: &str) -> Result<(String, PronounEntry), ValidationError> {
        let key = self
            .pronouns
            .find_by_name(name)
            .map(|(key, _)| key.to_string())
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::UnknownPronoun(name.to_string())))?;
        if is_default_key(&key) {
            return Err(ValidationErrorKind::DefaultPronoun.into());
        }
        let entry = self
            .pronouns
            .remove(&key)
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::UnknownPronoun(name.to_string())))?;
        Ok((key, entry))
    }

    /// Restore the default pronouns, returning the keys that were dropped.
    pub fn reset_pronouns(&mut self) -> Vec<String> {
        let removed = self
            .pronouns
            .keys()
            .filter(|key| !is_default_key(key))
            .map(str::to_string)
            .collect();
        self.pronouns = default_pronouns();
        removed
    }

    /// Track a newly posted prompt, keeping only the most recent ones.
    pub fn track_picker(&mut self, picker: Picker) {
        self.pickers.push(picker);
        if self.pickers.len() > MAX_PICKERS {
            let excess = self.pickers.len() - MAX_PICKERS;
            self.pickers.drain(..excess);
        }
    }
}

/// Check a pronoun display name against the length cap.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationErrorKind::NameTooLong(MAX_NAME_LENGTH).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_pure_function_of_name() {
        assert_eq!(pronoun_key("She/Her"), "she_her");
        assert_eq!(pronoun_key("SHE/HER"), "she_her");
        assert_eq!(pronoun_key("she her"), "she_her");
        assert_eq!(pronoun_key("Fae/Faer!"), "fae_faer_");
    }

    #[test]
    fn test_default_config_is_independent() {
        let mut first = default_config();
        first.pronouns.remove("he_him");
        first.use_roles = false;

        let second = default_config();
        assert!(second.pronouns.contains_key("he_him"));
        assert!(second.use_roles);
        assert_eq!(second.pronouns.len(), 5);
    }

    #[test]
    fn test_add_rejects_duplicate_keys() {
        let mut config = default_config();
        let err = config.add_pronoun("she her", None).unwrap_err();
        assert_eq!(
            err.kind(),
            &ValidationErrorKind::DuplicatePronoun("she her".to_string())
        );
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_add_rejects_at_capacity() {
        let mut config = default_config();
        for name in [
            "Aa", "Bb", "Cc", "Dd", "Ee", "Ff", "Gg", "Hh", "Ii", "Jj", "Kk", "Ll",
        ] {
            config.add_pronoun(name, None).unwrap();
        }
        assert_eq!(config.pronouns.len(), MAX_PRONOUNS);

        let err = config.add_pronoun("Mm", None).unwrap_err();
        assert_eq!(err.kind(), &ValidationErrorKind::CapacityExceeded(15));
        assert_eq!(config.pronouns.len(), MAX_PRONOUNS);
    }

    #[test]
    fn test_add_rejects_long_names() {
        let mut config = default_config();
        let err = config.add_pronoun("Seventeen/Letters", None).unwrap_err();
        assert_eq!(err.kind(), &ValidationErrorKind::NameTooLong(16));
    }

    #[test]
    fn test_defaults_cannot_be_removed() {
        let mut config = default_config();
        for name in ["Any", "ask me", "They/Them", "she/her", "He/Him"] {
            let err = config.remove_pronoun(name).unwrap_err();
            assert_eq!(err.kind(), &ValidationErrorKind::DefaultPronoun);
        }
        assert_eq!(config.pronouns.len(), 5);

        config.add_pronoun("Xe/Xem", None).unwrap();
        let (key, entry) = config.remove_pronoun("XE/XEM").unwrap();
        assert_eq!(key, "xe_xem");
        assert_eq!(entry.name, "Xe/Xem");

        let err = config.remove_pronoun("Xe/Xem").unwrap_err();
        assert_eq!(
            err.kind(),
            &ValidationErrorKind::UnknownPronoun("Xe/Xem".to_string())
        );
    }

    #[test]
    fn test_reset_reports_dropped_keys() {
        let mut config = default_config();
        config.add_pronoun("Xe/Xem", None).unwrap();
        config.add_pronoun("It/Its", None).unwrap();

        assert_eq!(config.reset_pronouns(), vec!["xe_xem", "it_its"]);
        assert_eq!(config.pronouns, default_pronouns());
    }

    #[test]
    fn test_prompt_message_truncated() {
        let mut config = default_config();
        config.set_prompt_message(&"a".repeat(600));
        assert_eq!(config.prompt_message.chars().count(), PROMPT_MESSAGE_LIMIT);
        assert!(config.prompt_message.ends_with("..."));

        config.set_prompt_message("short");
        assert_eq!(config.prompt_message, "short");
    }

    #[test]
    fn test_only_recent_pickers_tracked() {
        let mut config = default_config();
        for i in 0..7 {
            config.track_picker(Picker::new("c", i.to_string()));
        }
        let ids: Vec<_> = config.pickers.iter().map(|p| p.message_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_stored_layout_round_trips_in_order() {
        let raw = r#"{"useRoles":false,"onlyOwnerCanConfig":true,"promptMessage":"hi",
            "pronouns":{"any":{"name":"Any","hideButton":true},"zz":{"name":"Zz"},"aa":{"name":"Aa","emoji":{"name":"✨"}}},
            "pickers":[{"c":"1","m":"2"}]}"#;
        let config: GuildConfig = serde_json::from_str(raw).unwrap();
        assert!(!config.use_roles);
        assert_eq!(config.pronouns.keys().collect::<Vec<_>>(), vec!["any", "zz", "aa"]);
        assert!(config.pronouns.get("any").unwrap().hide_button);
        assert_eq!(config.pickers, vec![Picker::new("1", "2")]);

        let encoded = serde_json::to_string(&config).unwrap();
        assert!(encoded.find("\"zz\"").unwrap() < encoded.find("\"aa\"").unwrap());
        let decoded: GuildConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_meta_roles_have_descriptive_names() {
        let config = default_config();
        let any = config.pronouns.get(ANY_KEY).unwrap();
        assert_eq!(role_name(ANY_KEY, any), "Any Pronouns");
        let ask = config.pronouns.get(ASK_KEY).unwrap();
        assert_eq!(role_name(ASK_KEY, ask), "Pronouns: Ask Me");
        let she = config.pronouns.get("she_her").unwrap();
        assert_eq!(role_name("she_her", she), "She/Her");
    }
}
