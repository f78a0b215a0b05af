use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CodingError, Result};
use crate::llm::Embedder;

/// Characters kept for a short name when the definition has no colon
pub const SHORT_NAME_CHARS: usize = 40;

/// A named coding category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Derived label, unique within a run
    pub short_name: String,
    /// Full definition text, as written in the codebook
    pub full_definition: String,
    /// Embedding of the full definition
    pub embedding: Option<Vec<f32>>,
}

impl Theme {
    /// Create a theme from its definition, deriving the short name
    pub fn from_definition(definition: impl Into<String>) -> Self {
        let full_definition = definition.into();
        Self {
            short_name: derive_short_name(&full_definition),
            full_definition,
            embedding: None,
        }
    }

    pub fn require_embedding(&self) -> Result<&[f32]> {
        self.embedding
            .as_deref()
            .ok_or_else(|| CodingError::MissingEmbedding(format!("theme '{}'", self.short_name)))
    }
}

/// Text before the first colon, or the first 40 characters when there is none
pub fn derive_short_name(definition: &str) -> String {
    match definition.split_once(':') {
        Some((head, _)) => head.trim().to_string(),
        None => definition
            .chars()
            .take(SHORT_NAME_CHARS)
            .collect::<String>()
            .trim()
            .to_string(),
    }
}

/// Parse a JSON array of theme definitions
pub fn load_themes(source: &str) -> Result<Vec<Theme>> {
    let definitions: Vec<String> = serde_json::from_str(source).map_err(|e| {
        CodingError::MalformedSource(format!("theme list is not a JSON array of strings: {}", e))
    })?;

    if definitions.is_empty() {
        return Err(CodingError::MalformedSource("theme list is empty".to_string()));
    }

    let themes: Vec<Theme> = definitions.into_iter().map(Theme::from_definition).collect();

    let mut seen = HashSet::new();
    for theme in &themes {
        if !seen.insert(theme.short_name.as_str()) {
            return Err(CodingError::MalformedSource(format!(
                "duplicate theme short name '{}'",
                theme.short_name
            )));
        }
    }

    Ok(themes)
}

/// Read and parse a theme file
pub fn load_themes_file(path: &Path) -> Result<Vec<Theme>> {
    let content = std::fs::read_to_string(path)?;
    let themes = load_themes(&content)?;
    info!("Loaded {} themes from {:?}", themes.len(), path);
    Ok(themes)
}

/// Embed every theme definition, in order
///
/// Any single failure fails the whole batch: classification needs every theme.
pub async fn attach_embeddings<E>(themes: Vec<Theme>, embedder: &E) -> Result<Vec<Theme>>
where
    E: Embedder + ?Sized,
{
    let total = themes.len();
    let mut embedded = Vec::with_capacity(total);

    for (i, mut theme) in themes.into_iter().enumerate() {
        debug!("Embedding theme {}/{}: {}", i + 1, total, theme.short_name);
        theme.embedding = Some(embedder.embed(&theme.full_definition).await?);
        embedded.push(theme);
    }

    Ok(embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::FakeEmbedder;

    #[test]
    fn test_short_name_before_colon() {
        assert_eq!(
            derive_short_name("  Shared goals : partners agreed on outcomes"),
            "Shared goals"
        );
        assert_eq!(derive_short_name("A: b: c"), "A");
    }

    #[test]
    fn test_short_name_without_colon_truncates() {
        let definition = "Facilitators_adapted_sessions_to_family_schedules";
        let short = derive_short_name(definition);
        assert_eq!(short, "Facilitators_adapted_sessions_to_family_");

        let spaced = derive_short_name("Facilitators adapted sessions to family schedules");
        assert_eq!(spaced, "Facilitators adapted sessions to family");
    }

    #[test]
    fn test_short_name_counts_characters_not_bytes() {
        let definition = "ñ".repeat(50);
        assert_eq!(derive_short_name(&definition), "ñ".repeat(40));
    }

    #[test]
    fn test_load_themes() {
        let json = r#"["Trust: families trusted staff", "Logistics: time and space", "No colon here"]"#;
        let themes = load_themes(json).unwrap();

        assert_eq!(themes.len(), 3);
        assert_eq!(themes[0].short_name, "Trust");
        assert_eq!(themes[0].full_definition, "Trust: families trusted staff");
        assert_eq!(themes[2].short_name, "No colon here");
        assert!(themes.iter().all(|t| t.embedding.is_none()));
    }

    #[tokio::test]
    async fn test_short_names_stable_after_embedding_and_reload() {
        let json = r#"["Trust: a", "Logistics: b", "Buy-in: c"]"#;
        let embedder = FakeEmbedder::new()
            .with("Trust: a", vec![1.0, 0.0])
            .with("Logistics: b", vec![0.0, 1.0])
            .with("Buy-in: c", vec![0.5, 0.5]);

        let embedded = attach_embeddings(load_themes(json).unwrap(), &embedder)
            .await
            .unwrap();
        let reloaded = load_themes(json).unwrap();

        let embedded_names: Vec<&str> = embedded.iter().map(|t| t.short_name.as_str()).collect();
        let reloaded_names: Vec<&str> = reloaded.iter().map(|t| t.short_name.as_str()).collect();
        assert_eq!(embedded_names, reloaded_names);
        assert_eq!(embedded_names, vec!["Trust", "Logistics", "Buy-in"]);
        assert!(embedded.iter().all(|t| t.embedding.is_some()));
    }

    #[test]
    fn test_load_themes_malformed() {
        assert!(matches!(
            load_themes(r#"{"themes": []}"#),
            Err(CodingError::MalformedSource(_))
        ));
        assert!(matches!(
            load_themes(r#"["ok", 3]"#),
            Err(CodingError::MalformedSource(_))
        ));
        assert!(matches!(load_themes("not json"), Err(CodingError::MalformedSource(_))));
        assert!(matches!(load_themes("[]"), Err(CodingError::MalformedSource(ref s)) if s == "theme list is empty"));
    }

    #[test]
    fn test_load_themes_rejects_duplicate_short_names() {
        let json = r#"["Trust: one reading", "Trust: another reading"]"#;
        let err = load_themes(json).unwrap_err();
        assert!(err.to_string().contains("duplicate theme short name 'Trust'"));
    }

    #[tokio::test]
    async fn test_attach_embeddings_preserves_order() {
        let embedder = FakeEmbedder::new()
            .with("Trust: a", vec![1.0, 0.0])
            .with("Logistics: b", vec![0.0, 1.0]);
        let themes = load_themes(r#"["Trust: a", "Logistics: b"]"#).unwrap();

        let themes = attach_embeddings(themes, &embedder).await.unwrap();

        assert_eq!(themes[0].embedding, Some(vec![1.0, 0.0]));
        assert_eq!(themes[1].embedding, Some(vec![0.0, 1.0]));
        assert_eq!(embedder.calls(), vec!["Trust: a", "Logistics: b"]);
    }

    #[tokio::test]
    async fn test_attach_embeddings_fails_whole_batch() {
        let embedder = FakeEmbedder::new().with("Trust: a", vec![1.0, 0.0]);
        let themes = load_themes(r#"["Trust: a", "Logistics: b"]"#).unwrap();

        let result = attach_embeddings(themes, &embedder).await;

        assert!(matches!(result, Err(CodingError::EmbeddingProvider(_))));
    }
}
