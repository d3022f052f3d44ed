mod cli;
mod console;

use anyhow::{Context, Result};
use blogflow::cancellation::CancellationToken;
use blogflow::events::LoggingEventSink;
use blogflow::finalize::Finalizer;
use blogflow::llm::OpenAiCompletionClient;
use blogflow::pipeline::BlogPipeline;
use blogflow::presentation::export_document;
use clap::Parser;
use cli::{Cli, LogFormat};
use console::ConsoleAdapter;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Pretty => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let settings = cli.settings()?;
    let request = cli.request();
    let config = settings.model_config(cli.credential());

    let client = OpenAiCompletionClient::from_settings(&settings.client)
        .context("building the completion client")?;
    let mut pipeline = BlogPipeline::new(Arc::new(client))
        .with_event_sink(Arc::new(LoggingEventSink::debug()))
        .with_finalizer(Finalizer::new(settings.finalize));
    if let Some(limit) = cli.call_timeout() {
        pipeline = pipeline.with_call_timeout(limit);
    }

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling run");
                token.cancel("interrupted");
            }
        });
    }

    info!(model = %settings.model, topic = %request.topic, "Generating blog post");
    let adapter = ConsoleAdapter::stdio(settings.show_intermediate);
    let outcome = pipeline
        .run_with_cancellation(&request, &config, &adapter, &token)
        .await;

    let Some(document) = outcome.document() else {
        return Ok(ExitCode::FAILURE);
    };

    if let Some(dir) = &cli.output_dir {
        let path = export_document(dir, &request.topic, document)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        info!(path = %path.display(), "Saved blog post");
    }
    Ok(ExitCode::SUCCESS)
}
