use serde_json::Value;
use tracing::warn;

use crate::models::{CueSource, NonverbalCues};

/// Words in a chunk that count as a laughter cue
pub const LAUGHTER_KEYWORDS: &[&str] = &["laughter", "laugh", "(laughter)", "risas", "(risas)"];

/// One way of turning a cue-coding reply into a result
pub trait CueParser {
    /// Returns `None` when this strategy cannot interpret the reply
    fn parse(&self, response: &str, chunk_text: &str) -> Option<NonverbalCues>;
}

/// Reads the JSON object the model was asked to return
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCueParser;

impl CueParser for JsonCueParser {
    fn parse(&self, response: &str, _chunk_text: &str) -> Option<NonverbalCues> {
        let value: Value = serde_json::from_str(response.trim()).ok()?;
        let object = value.as_object()?;

        let any_cues = object
            .get("any_cues")
            .map(value_to_string)
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("YES"));
        let cue_type = object
            .get("cue_type")
            .map(value_to_string)
            .unwrap_or_default()
            .trim()
            .to_string();

        Some(NonverbalCues {
            any_cues,
            cue_type,
            source: CueSource::Json,
        })
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Scans the chunk itself for laughter keywords; always produces an answer
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordCueParser;

impl CueParser for KeywordCueParser {
    fn parse(&self, _response: &str, chunk_text: &str) -> Option<NonverbalCues> {
        let lowered = chunk_text.to_lowercase();
        let any_cues = LAUGHTER_KEYWORDS.iter().any(|k| lowered.contains(k));

        Some(NonverbalCues {
            any_cues,
            cue_type: if any_cues { "Laughter".to_string() } else { String::new() },
            source: CueSource::KeywordFallback,
        })
    }
}

/// Parse a cue reply as JSON, falling back to the keyword scan
pub fn parse_cue_response(response: &str, chunk_text: &str) -> NonverbalCues {
    if let Some(cues) = JsonCueParser.parse(response, chunk_text) {
        return cues;
    }

    warn!("Cue reply was not a JSON object, using keyword fallback");
    KeywordCueParser
        .parse(response, chunk_text)
        .unwrap_or(NonverbalCues {
            any_cues: false,
            cue_type: String::new(),
            source: CueSource::KeywordFallback,
        })
}
