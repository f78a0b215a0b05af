use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{NonverbalCues, ThemeCode};

use super::client::{GenerateOptions, Generator};
use super::cue_parser::parse_cue_response;
use super::prompts::*;

/// Send a trivial prompt to confirm credentials and model access
pub async fn check_connection<G>(generator: &G, config: &PipelineConfig) -> Result<String>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.llm_model);
    generator
        .generate(CHECK_SYSTEM_PROMPT, CHECK_USER_PROMPT, &options)
        .await
}

pub async fn translate_to_english<G>(
    generator: &G,
    config: &PipelineConfig,
    spanish_text: &str,
) -> Result<String>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.llm_model);
    generator
        .generate(
            TRANSLATE_SYSTEM_PROMPT,
            &build_translate_prompt(spanish_text),
            &options,
        )
        .await
}

/// Propose themes that bear on a research question
pub async fn extract_candidate_themes<G>(
    generator: &G,
    config: &PipelineConfig,
    transcript: &str,
    research_question: &str,
) -> Result<String>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.theme_extraction_model)
        .with_reasoning_effort(&config.theme_extraction_reasoning_effort);
    generator
        .generate(
            CODEBOOK_SYSTEM_PROMPT,
            &build_candidate_themes_prompt(transcript, research_question),
            &options,
        )
        .await
}

/// Propose themes without a guiding question
pub async fn extract_general_themes<G>(
    generator: &G,
    config: &PipelineConfig,
    transcript: &str,
) -> Result<String>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.theme_extraction_model)
        .with_reasoning_effort(&config.theme_extraction_reasoning_effort);
    generator
        .generate(
            CODEBOOK_SYSTEM_PROMPT,
            &build_general_themes_prompt(transcript),
            &options,
        )
        .await
}

/// Ask whether a chunk substantively discusses a theme
pub async fn code_yes_no_for_theme<G>(
    generator: &G,
    config: &PipelineConfig,
    chunk_text: &str,
    theme_definition: &str,
) -> Result<ThemeCode>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.llm_model).with_reasoning_effort("low");
    let reply = generator
        .generate(
            YES_NO_SYSTEM_PROMPT,
            &build_yes_no_prompt(chunk_text, theme_definition),
            &options,
        )
        .await?;
    debug!("Yes/no reply: {:?}", reply);
    Ok(ThemeCode::from_reply(&reply))
}

/// Detect non-verbal cues (laughter, pauses, confusion) in a chunk
pub async fn code_nonverbal_cues<G>(
    generator: &G,
    config: &PipelineConfig,
    chunk_text: &str,
) -> Result<NonverbalCues>
where
    G: Generator + ?Sized,
{
    let options = GenerateOptions::new(&config.llm_model).with_reasoning_effort("low");
    let reply = generator
        .generate(CUES_SYSTEM_PROMPT, &build_cues_prompt(chunk_text), &options)
        .await?;
    Ok(parse_cue_response(&reply, chunk_text))
}
