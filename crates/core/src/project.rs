//! Project identifiers
//!
//! A project partitions every record. The identifier is checked once at each
//! engine entry point, before any store is touched.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the primary store key for a project's log
pub const STREAM_KEY_PREFIX: &str = "project:";

/// A validated project identifier: non-empty, letters and digits only
///
/// Letters and digits of any script count: `café` and `東京1` are valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate and wrap a raw identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProject`] if `raw` is empty or contains
    /// anything but letters and digits.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || !raw.chars().all(char::is_alphanumeric) {
            return Err(Error::InvalidProject(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The identifier as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of this project's log in the primary store
    pub fn stream_key(&self) -> String {
        format!("{}{}", STREAM_KEY_PREFIX, self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
