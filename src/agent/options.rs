//! Agent identity parsed from a free-text `key=value` options string.
//!
//! Options are whitespace-separated tokens. A token is split at its first `=`;
//! a token without `=` is a boolean flag. Later tokens override earlier ones,
//! which is how agent types layer their defaults under user options.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Value stored for an option key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionValue {
    Text(String),
    /// Bare token with no `=`; always true.
    Flag,
}

impl OptionValue {
    /// Text value, or `None` for a flag.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            OptionValue::Flag => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Flag => f.write_str("true"),
        }
    }
}

/// Identity and configuration of one agent.
///
/// `name`, `role` and `seed` are the keys the agents themselves interpret;
/// every other key is kept as-is for collaborators to read via [`AgentInfo::property`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentInfo {
    entries: BTreeMap<String, OptionValue>,
}

impl AgentInfo {
    pub const DEFAULTS: &'static str = "name=unknown role=unknown";

    /// Parse `options` on top of `name=unknown role=unknown`. Never fails.
    pub fn parse(options: &str) -> Self {
        let mut info = AgentInfo::default();
        for token in Self::DEFAULTS.split_whitespace().chain(options.split_whitespace()) {
            info.upsert(token);
        }
        info
    }

    /// Merge a single `key=value` (or bare flag) token.
    pub fn upsert(&mut self, token: &str) {
        let (key, value) = match token.split_once('=') {
            Some((k, v)) => (k, OptionValue::Text(v.to_string())),
            None => (token, OptionValue::Flag),
        };
        self.entries.insert(key.to_string(), value);
    }

    pub fn property(&self, key: &str) -> Option<&OptionValue> { self.entries.get(key) }

    pub fn name(&self) -> Option<&OptionValue> { self.property("name") }

    pub fn role(&self) -> Option<&OptionValue> { self.property("role") }

    /// The `seed` option as a 64-bit seed.
    ///
    /// Negative integers are accepted and reinterpreted bit-for-bit. A flag or
    /// non-integer text is an error rather than a silent fallback to entropy.
    pub fn seed(&self) -> Result<Option<u64>, AgentError> {
        let raw = match self.property("seed") {
            None => return Ok(None),
            Some(OptionValue::Flag) => return Err(AgentError::InvalidSeed("true".to_string())),
            Some(OptionValue::Text(s)) => s.trim(),
        };
        raw.parse::<u64>()
            .or_else(|_| raw.parse::<i64>().map(|v| v as u64))
            .map(Some)
            .map_err(|_| AgentError::InvalidSeed(raw.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for AgentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.entries {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match value {
                OptionValue::Text(s) => write!(f, "{}={}", key, s)?,
                OptionValue::Flag => f.write_str(key)?,
            }
        }
        Ok(())
    }
}
