//! Ragline CLI entrypoint.

use std::path::PathBuf;

use mimalloc::MiMalloc;

use ragline::config::Config;
use ragline::embedding::HttpEmbedder;
use ragline::hashing::content_prefix;
use ragline::ingest::{Ingestor, load_documents};
use ragline::llm::GenaiChatModel;
use ragline::pipeline::RagOrchestrator;
use ragline::rerank::Reranker;
use ragline::scoring::CrossEncoderClient;
use ragline::vectordb::QdrantStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage:
  ragline ask <question>
  ragline ingest <documents.json>
  ragline health";

enum Command {
    Ask(String),
    Ingest(PathBuf),
    Health,
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        match args {
            [cmd, question @ ..] if cmd == "ask" && !question.is_empty() => {
                Some(Command::Ask(question.join(" ")))
            }
            [cmd, path] if cmd == "ingest" => Some(Command::Ingest(PathBuf::from(path))),
            [cmd] if cmd == "health" || cmd == "--health-check" => Some(Command::Health),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        anyhow::bail!(USAGE);
    };

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection_name,
        reranking = config.reranking_enabled,
        "Ragline starting"
    );

    let embedder = HttpEmbedder::from_config(&config)?;
    let store = QdrantStore::from_config(&config, embedder)?;

    match command {
        Command::Ask(question) => ask(config, store, &question).await,
        Command::Ingest(path) => ingest(store, path).await,
        Command::Health => {
            store.health_check().await?;
            println!("ok");
            Ok(())
        }
    }
}

async fn ask(
    config: Config,
    store: QdrantStore<HttpEmbedder>,
    question: &str,
) -> anyhow::Result<()> {
    let reranker = if config.reranking_enabled {
        Reranker::new(CrossEncoderClient::new(&config.reranker_endpoint)?)
    } else {
        Reranker::without_scorer()
    };
    let query_model = GenaiChatModel::new(config.query_model.as_str());
    let response_model = GenaiChatModel::new(config.response_model.as_str());

    let orchestrator = RagOrchestrator::new(config, query_model, response_model, store, reranker);
    let output = orchestrator.run(question, &[]).await?;

    if output.retrieval_failed {
        tracing::warn!("Vector search failed; answer was generated without documents");
    }

    println!("{}", output.answer());

    if !output.documents.is_empty() {
        println!("\nSources:");
        for (i, doc) in output.documents.iter().enumerate() {
            let score = doc
                .score()
                .map(|s| format!(" ({s:.3})"))
                .unwrap_or_default();
            println!("  [{}]{score} {}", i + 1, content_prefix(&doc.content));
        }
    }

    Ok(())
}

async fn ingest(store: QdrantStore<HttpEmbedder>, path: PathBuf) -> anyhow::Result<()> {
    let documents = load_documents(&path)?;
    tracing::info!(path = %path.display(), documents = documents.len(), "Loaded documents");

    let report = Ingestor::new(store).ingest(documents).await?;
    println!(
        "Indexed {} documents ({} blank skipped)",
        report.indexed, report.skipped_blank
    );
    Ok(())
}
