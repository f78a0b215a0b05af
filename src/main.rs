use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use focuscode::config::load_dotenv;
use focuscode::llm::{
    check_connection, extract_candidate_themes, extract_general_themes, translate_to_english,
};
use focuscode::models::{attach_embeddings, load_themes_file};
use focuscode::stages::top_examples;
use focuscode::{
    execute_coding, execute_stage0, execute_stage1, execute_stage2, execute_stage3,
    rank_by_similarity, read_chunk_table, read_text_file, write_chunks, write_coded_chunks,
    write_scored_chunks, write_text_file, Chunk, CodingConfig, Embedder, OpenAiClient,
    OpenAiConfig, PipelineConfig, Stage0Config, Stage2Config,
};

#[derive(Parser)]
#[command(name = "focuscode")]
#[command(author, version, about = "Focus-group transcript chunking, embedding and theme coding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a short prompt to confirm the API key and model work
    Check,

    /// Translate a Spanish transcript into English
    Translate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a transcript into numbered chunks (no embeddings)
    Chunk {
        /// Transcript file (markdown or plain text)
        #[arg(short, long)]
        input: PathBuf,
        /// Chunk table (CSV)
        #[arg(short, long)]
        output: PathBuf,
        /// Minimum characters per chunk
        #[arg(long)]
        min_chars: Option<usize>,
        /// Group speaker turns under each moderator question first
        #[arg(long)]
        by_moderator: bool,
    },

    /// Split a transcript into chunks and embed each one
    Embed {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        min_chars: Option<usize>,
        #[arg(long)]
        by_moderator: bool,
    },

    /// Score embedded chunks against a research question and keep the relevant ones
    Relevance {
        /// Chunk table with embeddings
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Research question
        #[arg(short, long)]
        question: String,
        /// Minimum similarity to keep a chunk
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Label each embedded chunk with its most similar theme
    Classify {
        #[arg(short, long)]
        input: PathBuf,
        /// JSON array of theme definitions
        #[arg(short, long)]
        themes: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Ask the LLM to propose a codebook from a transcript
    ExtractThemes {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Focus the codebook on this research question
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Ask the LLM whether each chunk discusses a theme (YES/NO)
    Code {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Full theme definition
        #[arg(short, long)]
        theme: String,
        /// Number of chunks to code
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Ask the LLM to detect non-verbal cues in each chunk
    Cues {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the chunks most similar to a query
    Rank {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv_path = load_dotenv();
    setup_logging(cli.verbose);
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {:?}", path);
    }

    let config = PipelineConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Check => run_check(&config).await,
        Commands::Translate { input, output } => run_translate(&config, input, output).await,
        Commands::Chunk {
            input,
            output,
            min_chars,
            by_moderator,
        } => run_chunk(&config, input, output, min_chars, by_moderator),
        Commands::Embed {
            input,
            output,
            min_chars,
            by_moderator,
        } => run_embed(&config, input, output, min_chars, by_moderator).await,
        Commands::Relevance {
            input,
            output,
            question,
            threshold,
        } => run_relevance(&config, input, output, &question, threshold).await,
        Commands::Classify {
            input,
            themes,
            output,
        } => run_classify(&config, input, themes, output).await,
        Commands::ExtractThemes {
            input,
            output,
            question,
        } => run_extract_themes(&config, input, output, question.as_deref()).await,
        Commands::Code {
            input,
            output,
            theme,
            limit,
        } => {
            let coding = CodingConfig {
                theme_definition: Some(theme),
                nonverbal_cues: false,
                limit: limit.unwrap_or(config.coding_limit),
            };
            run_coding(&config, input, output, &coding).await
        }
        Commands::Cues {
            input,
            output,
            limit,
        } => {
            let coding = CodingConfig {
                theme_definition: None,
                nonverbal_cues: true,
                limit: limit.unwrap_or(config.coding_limit),
            };
            run_coding(&config, input, output, &coding).await
        }
        Commands::Rank { input, query, k } => {
            run_rank(&config, input, &query, k.unwrap_or(config.top_k)).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_client(config: &PipelineConfig) -> Result<OpenAiClient> {
    let api_config = OpenAiConfig::from_env()?;
    Ok(OpenAiClient::new(api_config, &config.embedding_model)?)
}

fn load_chunks(input: &Path) -> Result<Vec<Chunk>> {
    let records = read_chunk_table(input)
        .with_context(|| format!("Failed to read chunk table {:?}", input))?;
    Ok(records.into_iter().map(|r| r.chunk).collect())
}

async fn run_check(config: &PipelineConfig) -> Result<()> {
    let client = build_client(config)?;
    let reply = check_connection(&client, config)
        .await
        .context("Connection check failed")?;

    println!("Connection OK");
    println!("Model: {}", config.llm_model);
    println!("Response: {}", reply);
    Ok(())
}

async fn run_translate(config: &PipelineConfig, input: PathBuf, output: PathBuf) -> Result<()> {
    let client = build_client(config)?;
    let spanish = read_text_file(&input).with_context(|| format!("Failed to read {:?}", input))?;

    info!("Translating {} chars", spanish.len());
    let english = translate_to_english(&client, config, &spanish).await?;
    write_text_file(&output, &english)?;

    info!("Wrote translation to {:?}", output);
    Ok(())
}

fn segment(
    config: &PipelineConfig,
    input: &Path,
    min_chars: Option<usize>,
    by_moderator: bool,
) -> Result<Vec<Chunk>> {
    let text = read_text_file(input).with_context(|| format!("Failed to read {:?}", input))?;
    let stage0 = Stage0Config {
        min_chars: min_chars.unwrap_or(config.min_chunk_chars),
        by_moderator,
    };
    Ok(execute_stage0(&text, &stage0).chunks)
}

fn run_chunk(
    config: &PipelineConfig,
    input: PathBuf,
    output: PathBuf,
    min_chars: Option<usize>,
    by_moderator: bool,
) -> Result<()> {
    let chunks = segment(config, &input, min_chars, by_moderator)?;
    write_chunks(&output, &chunks)?;

    info!("Wrote {} chunks to {:?}", chunks.len(), output);
    Ok(())
}

async fn run_embed(
    config: &PipelineConfig,
    input: PathBuf,
    output: PathBuf,
    min_chars: Option<usize>,
    by_moderator: bool,
) -> Result<()> {
    let client = build_client(config)?;
    let chunks = segment(config, &input, min_chars, by_moderator)?;

    let chunks = execute_stage1(&client, chunks)
        .await
        .context("Failed to embed chunks")?;
    write_chunks(&output, &chunks)?;

    info!("Wrote {} embedded chunks to {:?}", chunks.len(), output);
    Ok(())
}

async fn run_relevance(
    config: &PipelineConfig,
    input: PathBuf,
    output: PathBuf,
    question: &str,
    threshold: Option<f32>,
) -> Result<()> {
    let client = build_client(config)?;
    let chunks = load_chunks(&input)?;

    let question_embedding = client
        .embed(question)
        .await
        .context("Failed to embed research question")?;

    let stage2 = Stage2Config {
        threshold: threshold.unwrap_or(config.relevance_threshold),
    };
    let result = execute_stage2(&chunks, &question_embedding, &stage2)?;

    println!("Question:");
    println!("{}", question);
    println!();
    println!("--- Bottom (least relevant) ---");
    for row in result.dropped.iter().take(5) {
        println!(
            "score={:.3} | chunk_id={}",
            row.question_similarity.unwrap_or_default(),
            row.chunk_id()
        );
        println!("{}", row.chunk.text);
        println!();
    }

    write_scored_chunks(&output, &result.kept)?;

    println!(
        "Kept {}/{} chunks with score >= {}.",
        result.kept.len(),
        chunks.len(),
        stage2.threshold
    );
    info!("Wrote {:?}", output);
    Ok(())
}

async fn run_classify(
    config: &PipelineConfig,
    input: PathBuf,
    themes_path: PathBuf,
    output: PathBuf,
) -> Result<()> {
    let client = build_client(config)?;
    let records = read_chunk_table(&input)
        .with_context(|| format!("Failed to read chunk table {:?}", input))?;

    let themes = load_themes_file(&themes_path)
        .with_context(|| format!("Failed to load themes from {:?}", themes_path))?;
    let themes = attach_embeddings(themes, &client)
        .await
        .context("Failed to embed themes")?;

    let scored = records.iter().map(|r| r.scored()).collect();
    let result = execute_stage3(scored, &themes)?;

    write_scored_chunks(&output, &result.classified)?;
    info!("Wrote {:?}", output);

    println!("Theme counts:");
    for (theme, count) in &result.counts {
        println!("  {}: {}", theme, count);
    }

    println!();
    println!("Top examples per theme (top 2):");
    for theme in &themes {
        let top = top_examples(&result.classified, &theme.short_name, 2);
        if top.is_empty() {
            continue;
        }
        println!();
        println!("== {} ==", theme.short_name);
        for row in top {
            println!(
                "score={:.3} | chunk_id={}",
                row.theme_score(&theme.short_name).unwrap_or_default(),
                row.chunk_id()
            );
            println!("{}", row.chunk.text);
        }
    }

    Ok(())
}

async fn run_extract_themes(
    config: &PipelineConfig,
    input: PathBuf,
    output: PathBuf,
    question: Option<&str>,
) -> Result<()> {
    let client = build_client(config)?;
    let transcript =
        read_text_file(&input).with_context(|| format!("Failed to read {:?}", input))?;

    info!("Extracting themes from {:?}", input);
    let themes = match question {
        Some(q) => extract_candidate_themes(&client, config, &transcript, q).await?,
        None => extract_general_themes(&client, config, &transcript).await?,
    };
    write_text_file(&output, &themes)?;

    info!("Wrote {:?}", output);
    println!("{}", themes);
    Ok(())
}

async fn run_coding(
    config: &PipelineConfig,
    input: PathBuf,
    output: PathBuf,
    coding: &CodingConfig,
) -> Result<()> {
    let client = build_client(config)?;
    let chunks = load_chunks(&input)?;

    let coded = execute_coding(&client, config, &chunks, coding).await?;
    write_coded_chunks(&output, &coded)?;

    for row in &coded {
        let code = row.theme_code.as_ref().map(|c| c.as_str()).unwrap_or("-");
        let cues = row
            .cues
            .as_ref()
            .map(|c| format!("{} {}", c.yes_no(), c.cue_type))
            .unwrap_or_else(|| "-".to_string());
        println!("chunk_id={} | code={} | cues={}", row.chunk_id, code, cues.trim_end());
    }
    info!("Wrote {:?}", output);
    Ok(())
}

async fn run_rank(config: &PipelineConfig, input: PathBuf, query: &str, k: usize) -> Result<()> {
    let client = build_client(config)?;
    let chunks = load_chunks(&input)?;

    let query_embedding = client
        .embed(query)
        .await
        .context("Failed to embed query")?;

    let items = chunks
        .iter()
        .map(|c| c.require_embedding().map(|v| (c, v)))
        .collect::<focuscode::Result<Vec<_>>>()?;
    let ranked = rank_by_similarity(&query_embedding, items, k)?;

    for (chunk, score) in ranked {
        println!("score={:.3} | chunk_id={}", score, chunk.chunk_id);
        println!("{}", chunk.text);
        println!();
    }
    Ok(())
}
