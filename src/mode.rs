use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Autocomplete verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompletionMode {
    /// No suggestions at all.
    #[default]
    None,
    /// Registers, instructions, aliases and pseudo-ops.
    Basic,
    /// Everything in `Basic` plus labels inferred from the document.
    Full,
}

impl CompletionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionMode::None => "none",
            CompletionMode::Basic => "basic",
            CompletionMode::Full => "full",
        }
    }

    /// Parse a setting value. Anything unrecognized turns completion off.
    pub fn parse_lenient(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("basic") {
            CompletionMode::Basic
        } else if value.eq_ignore_ascii_case("full") {
            CompletionMode::Full
        } else {
            CompletionMode::None
        }
    }
}

impl FromStr for CompletionMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl From<String> for CompletionMode {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<CompletionMode> for String {
    fn from(mode: CompletionMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        assert_eq!(CompletionMode::parse_lenient("none"), CompletionMode::None);
        assert_eq!(CompletionMode::parse_lenient("basic"), CompletionMode::Basic);
        assert_eq!(CompletionMode::parse_lenient("full"), CompletionMode::Full);
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(CompletionMode::parse_lenient(" FULL "), CompletionMode::Full);
        assert_eq!(CompletionMode::parse_lenient("Basic"), CompletionMode::Basic);
    }

    #[test]
    fn unknown_mode_is_none() {
        assert_eq!(CompletionMode::parse_lenient("verbose"), CompletionMode::None);
        assert_eq!(CompletionMode::parse_lenient(""), CompletionMode::None);
        assert_eq!("???".parse::<CompletionMode>(), Ok(CompletionMode::None));
    }

    #[test]
    fn deserializes_from_json_string() {
        let mode: CompletionMode = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(mode, CompletionMode::Full);
        let mode: CompletionMode = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(mode, CompletionMode::None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CompletionMode::Basic).unwrap(), "\"basic\"");
        assert_eq!(CompletionMode::Full.to_string(), "full");
    }
}
