use lyceum_press::application::{
    dto::{PublicationSetDto, RunReportDto},
    pipeline::PublishingService,
    ports::{content::ContentSource, time::Clock, util::SlugGenerator},
};
use lyceum_press::config::AppConfig;
use lyceum_press::infrastructure::{
    content::FilesystemContentSource, time::SystemClock, util::DefaultSlugGenerator,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let source: Arc<dyn ContentSource> = Arc::new(FilesystemContentSource::new(
        config.content_dir(),
        config.content_extensions(),
    ));
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let service = PublishingService::new(
        Arc::clone(&source),
        Arc::clone(&slugger),
        Arc::clone(&clock),
        config.pipeline_options(),
    );

    tracing::info!(content_dir = %config.content_dir().display(), "starting publication run");
    let outcome = service.run().await?;

    let publication = PublicationSetDto::from(&outcome.publication);
    let json = serde_json::to_string_pretty(&publication)?;
    let output = config.output_path();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(output, json)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    let report = RunReportDto::from(&outcome.report);
    for reference in &report.broken {
        tracing::warn!(from = %reference.from_slug, target = %reference.raw, "broken reference");
    }
    tracing::info!(
        output = %output.display(),
        report = %serde_json::to_string(&report)?,
        "publication written"
    );

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}
