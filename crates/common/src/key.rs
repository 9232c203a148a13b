use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable, name-independent identity of a world instance.
///
/// Keys are namespaced (`namespace:path`), lowercase, and never change for the
/// lifetime of a world. Display names live elsewhere and may collide; keys
/// may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorldKey(String);

/// Errors from parsing a world key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("world key is empty")]
    Empty,
    #[error("world key {0:?} must have the form namespace:path")]
    MissingNamespace(String),
    #[error("world key {key:?} contains invalid character {ch:?}")]
    InvalidChar { key: String, ch: char },
}

impl WorldKey {
    /// Parse a key. A bare path (`mining`) is placed in the `minecraft`
    /// namespace, matching how hosts resolve unqualified world keys.
    pub fn new(raw: impl Into<String>) -> Result<Self, KeyError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }
        let full = if raw.contains(':') {
            raw
        } else {
            format!("minecraft:{raw}")
        };
        let well_formed = full.split_once(':').is_some_and(|(namespace, path)| {
            !namespace.is_empty() && !path.is_empty() && !path.contains(':')
        });
        if !well_formed {
            return Err(KeyError::MissingNamespace(full));
        }
        if let Some(ch) = full
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/' | ':'))
        {
            return Err(KeyError::InvalidChar { key: full, ch });
        }
        Ok(Self(full))
    }

    /// Wrap a compile-time key that is known to be well formed.
    pub fn from_static(key: &'static str) -> Self {
        debug_assert!(Self::new(key).is_ok(), "malformed static key {key:?}");
        Self(key.to_owned())
    }

    /// The full `namespace:path` form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the colon, e.g. `minecraft`.
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or_default()
    }

    /// Part after the colon, e.g. `the_nether`.
    pub fn path(&self) -> &str {
        self.0.split_once(':').map(|(_, p)| p).unwrap_or_default()
    }

    /// Same namespace, different path. Used for naming-convention lookups.
    pub fn with_path(&self, path: &str) -> Result<Self, KeyError> {
        Self::new(format!("{}:{path}", self.namespace()))
    }
}

impl TryFrom<String> for WorldKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorldKey> for String {
    fn from(key: WorldKey) -> Self {
        key.0
    }
}

impl FromStr for WorldKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for WorldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
