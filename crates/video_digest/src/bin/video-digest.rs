use std::{io::Read, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use video_digest::{
    normalize,
    ollama::OllamaClient,
    openai::OpenAIClient,
    tracing::init_tracing_subscriber,
    yt::watch_page::WatchPageClient,
    Generator, InvocationMode, VideoAnalyzerBuilder,
};

#[derive(Parser)]
#[command(
    name = "video-digest",
    about = "Summarize YouTube videos with a local or hosted LLM"
)]
struct Cli {
    /// Generation backend
    #[arg(long, env = "LLM_PROVIDER", value_enum, default_value_t = Provider::Ollama, global = true)]
    provider: Provider,

    /// Ollama server URL
    #[arg(long, env = "OLLAMA_API_URL", default_value = OllamaClient::DEFAULT_BASE_URL, global = true)]
    ollama_url: String,

    /// Ollama model name
    #[arg(long, env = "OLLAMA_MODEL", default_value = OllamaClient::DEFAULT_MODEL, global = true)]
    ollama_model: String,

    /// OpenAI API key, required when the provider is `openai`
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_key: Option<String>,

    /// OpenAI model name
    #[arg(long, env = "OPENAI_MODEL", default_value = OpenAIClient::DEFAULT_MODEL, global = true)]
    openai_model: String,

    /// Timeout for a single generation call, in seconds
    #[arg(long, default_value = "120", global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Ollama,
    Openai,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a video's transcript and generate its analysis
    Analyze {
        /// YouTube URL or bare video id
        url: String,

        /// Override the provider's default invocation mode
        #[arg(long, value_enum)]
        mode: Option<InvocationMode>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Normalize a raw model response read from FILE or stdin
    Normalize {
        file: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

async fn analyze<G: Generator>(
    generator: G,
    url: &str,
    mode: Option<InvocationMode>,
    call_timeout: Duration,
    pretty: bool,
) -> anyhow::Result<()> {
    let youtube = WatchPageClient::default();

    let mut builder = VideoAnalyzerBuilder::new()
        .generator(generator)
        .transcript_source(youtube.clone())
        .metadata_source(youtube)
        .call_timeout(call_timeout);
    if let Some(mode) = mode {
        builder = builder.mode(mode);
    }
    let analyzer = builder.build();

    tracing::info!(backend = G::BACKEND, mode = ?analyzer.mode(), %url, "Analyzing video...");
    let analysis = analyzer.analyze(url).await?;

    print_json(&analysis, pretty)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Analyze { url, mode, pretty } => {
            let call_timeout = Duration::from_secs(cli.timeout_secs);
            match cli.provider {
                Provider::Ollama => {
                    let ollama = OllamaClient::new(cli.ollama_model).with_base_url(cli.ollama_url);
                    analyze(ollama, &url, mode, call_timeout, pretty).await?;
                }
                Provider::Openai => {
                    let api_key = cli
                        .openai_key
                        .context("OPENAI_API_KEY must be set to use the openai provider")?;
                    let openai = OpenAIClient::new(api_key).with_model(cli.openai_model);
                    analyze(openai, &url, mode, call_timeout, pretty).await?;
                }
            }
        }
        Command::Normalize { file, pretty } => {
            let response = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };

            print_json(&normalize(&response), pretty)?;
        }
    }

    Ok(())
}
