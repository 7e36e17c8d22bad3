use anyhow::Context;
use clap::Parser;
use reportrun_cli::Cli;
use reportrun_client::{JobRunner, RunnerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the artifact URL.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reportrun=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = RunnerConfig::from_env();
    let runner = JobRunner::new(config).context("failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling job");
            on_signal.cancel();
        }
    });

    let request = cli.into_request();
    let item_id = request.item_id.clone();
    let url = runner
        .run(request, &cancel)
        .await
        .with_context(|| format!("job for item {item_id} did not complete"))?;

    println!("{url}");
    Ok(())
}
