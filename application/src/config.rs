//! Exchange execution parameters.

use serde::{Deserialize, Serialize};

/// Default maximum number of tool round trips per exchange.
pub const DEFAULT_MAX_TOOL_TURNS: usize = 8;

/// Parameters governing one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Maximum number of (tool request -> dispatch -> result) round trips
    /// before the exchange is terminated with a synthetic failure answer.
    pub max_tool_turns: usize,
    /// Voice used by speech synthesis when the model does not pick one.
    pub voice_name: String,
    /// Language code used by speech synthesis when the model does not pick one.
    pub language_code: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_tool_turns: DEFAULT_MAX_TOOL_TURNS,
            voice_name: "en-US-Wavenet-D".to_string(),
            language_code: "en-US".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert_eq!(config.max_tool_turns, 8);
        assert_eq!(config.language_code, "en-US");
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: ExchangeConfig = serde_json::from_str(r#"{"max_tool_turns": 3}"#).unwrap();
        assert_eq!(config.max_tool_turns, 3);
        assert_eq!(config.voice_name, "en-US-Wavenet-D");
    }
}
