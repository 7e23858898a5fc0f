use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Identifier of a persisted task (the document key assigned by the store).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TaskId(String);

/// Error returned when a string cannot be used as a [`TaskId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Blank identifiers mean "not yet persisted" and are never valid keys.
    #[error("task id must not be empty")]
    Empty,
}

impl TaskId {
    /// Wrap a store-assigned document key.
    ///
    /// # Errors
    /// Returns [`IdError::Empty`] when the key is blank.
    pub fn from_key(key: impl Into<String>) -> Result<Self, IdError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(key))
    }

    /// Borrow the raw document key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim())
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!("".parse::<TaskId>(), Err(IdError::Empty));
        assert_eq!("   ".parse::<TaskId>(), Err(IdError::Empty));
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let id: TaskId = " abc123 ".parse().unwrap_or_else(|err| panic!("parse id: {err}"));
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn serde_uses_plain_string() {
        let id = TaskId::from_key("k1").unwrap_or_else(|err| panic!("id: {err}"));
        let json = serde_json::to_string(&id).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json, "\"k1\"");
        assert!(serde_json::from_str::<TaskId>("\"\"").is_err());
    }
}
