use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use curriculum_rag::{
    BatchOptions, RagieConfig, curriculum_rag_with_options, format, logging, ragie::DEFAULT_TOP_K,
};

#[derive(Parser)]
#[command(
    name = "curriculum-rag",
    about = "Retrieve curriculum passages from Ragie.ai for one or more queries"
)]
struct Cli {
    /// Queries to run, in order.
    #[arg(required = true)]
    queries: Vec<String>,
    /// Chunks requested per query.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: u32,
    /// Queries allowed in flight; overrides RAGIE_MAX_CONCURRENCY.
    #[arg(long)]
    concurrency: Option<usize>,
    /// Cap on chunks returned from any single document.
    #[arg(long)]
    max_chunks_per_document: Option<u32>,
    /// Output shape written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Context,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = RagieConfig::from_env().context("failed to load Ragie configuration")?;
    tracing::debug!(config = ?config, "Loaded configuration");

    let mut options = BatchOptions::from_config(&config, cli.top_k);
    if let Some(limit) = cli.concurrency {
        options = options.with_max_concurrency(limit);
    }
    if let Some(limit) = cli.max_chunks_per_document {
        options = options.with_max_chunks_per_document(limit);
    }

    let result = curriculum_rag_with_options(cli.queries, &config, &options)
        .await
        .context("curriculum retrieval failed")?;

    match cli.format {
        OutputFormat::Json => println!("{}", format::to_pretty_json(&result)),
        OutputFormat::Context => {
            println!("{}", format::render_context(&result));
            let sources = format::unique_sources(&result);
            if !sources.is_empty() {
                println!("\nSources:");
                for source in sources {
                    println!("- {source}");
                }
            }
        }
    }
    Ok(())
}
