/// System prompt for the connection check
pub const CHECK_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const CHECK_USER_PROMPT: &str = "Say hello in one short sentence.";

pub const TRANSLATE_SYSTEM_PROMPT: &str =
    "You are a translator specializing in Spanish-to-English transcripts.";

pub const CODEBOOK_SYSTEM_PROMPT: &str = "You are a PhD-level qualitative researcher. Your job is to propose a codebook (themes) from focus group transcripts. Use rigorous, research-appropriate language.";

pub const YES_NO_SYSTEM_PROMPT: &str =
    "You are a PhD qualitative researcher coding transcript chunks.";

pub const CUES_SYSTEM_PROMPT: &str =
    "You are a qualitative researcher extracting non-verbal cues from transcript notes.";

pub fn build_translate_prompt(spanish_text: &str) -> String {
    format!(
        "Translate the Spanish transcript below into English. Keep formatting as close as possible.\n\nTRANSCRIPT:\n{}",
        spanish_text
    )
}

/// Deductive codebook: themes that answer one research question
pub fn build_candidate_themes_prompt(transcript: &str, research_question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("I will give you an English focus group transcript.\n");
    prompt.push_str(
        "Please extract candidate themes specifically relevant to the research question below.\n",
    );
    prompt.push_str("Return two sections: 'Helps integration' and 'Hinders integration'.\n\n");
    prompt.push_str(&format!("RESEARCH QUESTION:\n{}\n\n", research_question));
    prompt.push_str(&format!("TRANSCRIPT:\n{}", transcript));
    prompt
}

/// Inductive codebook: whatever themes the transcript itself suggests
pub fn build_general_themes_prompt(transcript: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("I will give you a focus group transcript.\n");
    prompt.push_str(
        "Read it inductively and propose the main themes that emerge from the participants' own words.\n",
    );
    prompt.push_str(
        "For each theme, write one line in the form 'Short name: definition', followed by one brief supporting quote.\n\n",
    );
    prompt.push_str(&format!("TRANSCRIPT:\n{}", transcript));
    prompt
}

pub fn build_yes_no_prompt(chunk_text: &str, theme_definition: &str) -> String {
    format!(
        "Decide whether the CHUNK below substantively discusses the THEME. Only output one token: YES or NO.\n\nTHEME:\n{}\n\nCHUNK:\n{}",
        theme_definition, chunk_text
    )
}

pub fn build_cues_prompt(chunk_text: &str) -> String {
    format!(
        "From the CHUNK below, detect whether there is any explicit non-verbal cue info (e.g., laughter, pauses, confusion). Return ONLY valid JSON with exactly these keys: {{\"any_cues\": \"YES\"|\"NO\", \"cue_type\": <short string or empty>}}.\n\nCHUNK:\n{}",
        chunk_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_themes_prompt() {
        let prompt = build_candidate_themes_prompt("MODERATOR: hi", "What helped?");
        assert!(prompt.contains("RESEARCH QUESTION:\nWhat helped?"));
        assert!(prompt.ends_with("TRANSCRIPT:\nMODERATOR: hi"));
        assert!(prompt.contains("'Helps integration'"));
    }

    #[test]
    fn test_yes_no_prompt_orders_theme_before_chunk() {
        let prompt = build_yes_no_prompt("chunk body", "Trust: definition");
        let theme_pos = prompt.find("THEME:\nTrust: definition").unwrap();
        let chunk_pos = prompt.find("CHUNK:\nchunk body").unwrap();
        assert!(theme_pos < chunk_pos);
    }

    #[test]
    fn test_cues_prompt_contains_schema() {
        let prompt = build_cues_prompt("(risas)");
        assert!(prompt.contains(r#"{"any_cues": "YES"|"NO""#));
        assert!(prompt.ends_with("CHUNK:\n(risas)"));
    }
}
