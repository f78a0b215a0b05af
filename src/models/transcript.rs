use serde::{Deserialize, Serialize};

/// One speaker-labelled utterance from a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    /// Speaker label as written, e.g. "MODERADOR" or "FACILITADOR 1"
    pub speaker: String,
    /// Utterance text, continuation lines joined with spaces
    pub text: String,
}

impl SpeakerTurn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Whether this turn belongs to the moderator
    pub fn is_moderator(&self) -> bool {
        let label = self.speaker.to_uppercase();
        label.contains("MODERADOR") || label == "MODERATOR"
    }
}

/// A moderator question with every response given before the next question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorGroup {
    pub question: String,
    pub responses: Vec<SpeakerTurn>,
    /// Question, blank line, then one `speaker: text` line per response
    pub joint_text: String,
}

impl ModeratorGroup {
    pub fn new(question: String, responses: Vec<SpeakerTurn>) -> Self {
        let rendered = responses
            .iter()
            .map(|r| format!("{}: {}", r.speaker, r.text))
            .collect::<Vec<_>>()
            .join("\n");
        let joint_text = format!("{}\n\n{}", question, rendered);

        Self {
            question,
            responses,
            joint_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_moderator() {
        assert!(SpeakerTurn::new("MODERADOR", "q").is_moderator());
        assert!(SpeakerTurn::new("Moderadora", "q").is_moderator());
        assert!(SpeakerTurn::new("moderator", "q").is_moderator());
        assert!(!SpeakerTurn::new("MODERATOR 2", "q").is_moderator());
        assert!(!SpeakerTurn::new("FACILITADOR 1", "a").is_moderator());
    }

    #[test]
    fn test_joint_text() {
        let group = ModeratorGroup::new(
            "What helped?".to_string(),
            vec![
                SpeakerTurn::new("P1", "Time."),
                SpeakerTurn::new("P2", "Support."),
            ],
        );
        assert_eq!(group.joint_text, "What helped?\n\nP1: Time.\nP2: Support.");
    }
}
