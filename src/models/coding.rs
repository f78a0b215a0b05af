use serde::{Deserialize, Serialize};

/// Outcome of asking the LLM whether a chunk discusses a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeCode {
    Yes,
    No,
    /// The reply did not start with YES or NO; holds the upper-cased first token
    Unclear(String),
}

impl ThemeCode {
    /// Read the first whitespace-separated token of a reply
    pub fn from_reply(reply: &str) -> Self {
        let token = reply
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_uppercase();
        match token.as_str() {
            "YES" => Self::Yes,
            "NO" => Self::No,
            _ => Self::Unclear(token),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Unclear(token) => token,
        }
    }
}

/// Which parsing strategy produced a cue result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueSource {
    /// Parsed from the model's JSON reply
    Json,
    /// Keyword scan of the chunk text after the reply failed to parse
    KeywordFallback,
}

/// Non-verbal cue annotation for a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonverbalCues {
    pub any_cues: bool,
    /// Short label such as "Laughter"; empty when there are no cues
    pub cue_type: String,
    pub source: CueSource,
}

impl NonverbalCues {
    pub fn yes_no(&self) -> &'static str {
        if self.any_cues { "YES" } else { "NO" }
    }
}

/// LLM coding results for one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct CodedChunk {
    pub chunk_id: usize,
    pub text: String,
    pub theme_code: Option<ThemeCode>,
    pub cues: Option<NonverbalCues>,
}
