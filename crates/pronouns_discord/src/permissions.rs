//! Member permission bitfield.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discord permission bitfield.
///
/// Discord transmits permissions as a decimal string; both string and integer
/// forms are accepted when decoding.
///
/// # Example
///
/// ```
/// use pronouns_discord::Permissions;
///
/// let granted = Permissions::MANAGE_ROLES | Permissions::MANAGE_GUILD;
/// assert!(granted.contains(Permissions::MANAGE_ROLES));
/// assert_eq!(
///     granted.missing(Permissions::MANAGE_ROLES | Permissions::MANAGE_MESSAGES),
///     Permissions::MANAGE_MESSAGES
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(u64);

impl Permissions {
    /// Administrator, implies every other permission.
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    /// Manage guild settings.
    pub const MANAGE_GUILD: Self = Self(1 << 5);
    /// Manage (delete, pin) messages.
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);
    /// Change other members' nicknames.
    pub const MANAGE_NICKNAMES: Self = Self(1 << 27);
    /// Create, edit and assign roles.
    pub const MANAGE_ROLES: Self = Self(1 << 28);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::ADMINISTRATOR, "ADMINISTRATOR"),
        (Self::MANAGE_GUILD, "MANAGE_GUILD"),
        (Self::MANAGE_MESSAGES, "MANAGE_MESSAGES"),
        (Self::MANAGE_NICKNAMES, "MANAGE_NICKNAMES"),
        (Self::MANAGE_ROLES, "MANAGE_ROLES"),
    ];

    /// No permissions.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// True when every bit in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when `required` is granted, directly or through administrator.
    pub const fn allows(self, required: Self) -> bool {
        self.contains(Self::ADMINISTRATOR) || self.contains(required)
    }

    /// Bits of `required` that are not granted.
    pub const fn missing(self, required: Self) -> Self {
        Self(required.0 & !self.0)
    }

    /// True when no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the known permissions set in this bitfield.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl std::ops::BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text
                .parse::<u64>()
                .map(Self)
                .map_err(<D::Error as serde::de::Error>::custom),
            Raw::Number(bits) => Ok(Self(bits)),
        }
    }
}
