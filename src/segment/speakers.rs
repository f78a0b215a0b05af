use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ModeratorGroup, SpeakerTurn};

/// Separator placed between moderator groups in the regrouped transcript
pub const GROUP_SEPARATOR: &str = "\n\n---\n\n";

/// Upper-case label (Spanish accents allowed), optional number, then a colon
static SPEAKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-ZÁÉÍÓÚÑ\s]+\d*):\s*(.*)$").expect("valid speaker regex"));

/// Turn being accumulated while scanning lines
struct OpenTurn {
    speaker: String,
    parts: Vec<String>,
}

impl OpenTurn {
    fn finish(self) -> Option<SpeakerTurn> {
        if self.speaker.is_empty() || self.parts.is_empty() {
            return None;
        }
        let text = self.parts.join(" ").trim().to_string();
        Some(SpeakerTurn::new(self.speaker, text))
    }
}

/// Parse speaker-labelled lines into turns
///
/// Lines that are not speaker lines continue the current turn. Text before
/// the first speaker line has no owner and is ignored.
pub fn parse_speakers(text: &str) -> Vec<SpeakerTurn> {
    let normalized = text.replace("\r\n", "\n");
    let mut turns = Vec::new();
    let mut current: Option<OpenTurn> = None;

    for line in normalized.split('\n') {
        if let Some(caps) = SPEAKER_LINE.captures(line) {
            if let Some(turn) = current.take().and_then(OpenTurn::finish) {
                turns.push(turn);
            }

            let remainder = caps.get(2).map_or("", |m| m.as_str());
            let parts = if remainder.trim().is_empty() {
                Vec::new()
            } else {
                vec![remainder.to_string()]
            };
            current = Some(OpenTurn {
                speaker: caps[1].trim().to_string(),
                parts,
            });
        } else if !line.trim().is_empty() {
            if let Some(turn) = current.as_mut() {
                turn.parts.push(line.trim().to_string());
            }
        }
    }

    if let Some(turn) = current.and_then(OpenTurn::finish) {
        turns.push(turn);
    }

    turns
}

/// Group participant turns under the moderator question that precedes them
///
/// Moderator turns with no responses (including a trailing one) produce no
/// group. Turns before the first moderator question are discarded.
pub fn group_by_moderator(turns: &[SpeakerTurn]) -> Vec<ModeratorGroup> {
    let mut groups = Vec::new();
    let mut question: Option<&str> = None;
    let mut responses: Vec<SpeakerTurn> = Vec::new();

    for turn in turns {
        if turn.is_moderator() {
            if let Some(q) = question {
                if !responses.is_empty() {
                    groups.push(ModeratorGroup::new(q.to_string(), std::mem::take(&mut responses)));
                }
            }
            question = Some(turn.text.as_str());
            responses.clear();
        } else if question.is_some() {
            responses.push(turn.clone());
        }
    }

    if let Some(q) = question {
        if !responses.is_empty() {
            groups.push(ModeratorGroup::new(q.to_string(), responses));
        }
    }

    groups
}

/// Rewrite a transcript as moderator groups separated by `---` lines
pub fn chunk_by_moderator_question(text: &str) -> String {
    let turns = parse_speakers(text);
    group_by_moderator(&turns)
        .into_iter()
        .map(|g| g.joint_text)
        .filter(|joint| !joint.trim().is_empty())
        .collect::<Vec<_>>()
        .join(GROUP_SEPARATOR)
}
