//! Asset-generation pipeline worker binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sforge_gen::{GenConfig, HttpGenerationBackend};
use sforge_models::ProjectId;
use sforge_pipeline::{CancelToken, Pipeline, PipelineConfig};
use sforge_store::{RedisScriptStore, SnapshotChannel, SnapshotSink, StateStore};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("sforge=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting sforge-pipeline");

    let project_id = match std::env::var("SFORGE_PROJECT_ID") {
        Ok(id) => ProjectId::from(id),
        Err(_) => {
            error!("SFORGE_PROJECT_ID not set");
            std::process::exit(1);
        }
    };

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let backend = match GenConfig::from_env().and_then(HttpGenerationBackend::new) {
        Ok(b) => Arc::new(b),
        Err(e) => {
            error!("Failed to create generation backend: {}", e);
            std::process::exit(1);
        }
    };

    let store = match RedisScriptStore::from_env(&project_id) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create script store: {}", e);
            std::process::exit(1);
        }
    };

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let sink: Arc<dyn SnapshotSink> =
        match SnapshotChannel::new(&redis_url, project_id.clone()) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                error!("Failed to create snapshot channel: {}", e);
                std::process::exit(1);
            }
        };

    let mut document = match store.load().await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            error!(project_id = %project_id, "No script document found for project");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to load script document: {}", e);
            std::process::exit(1);
        }
    };

    // Ctrl-C requests a cooperative stop: the in-flight step finishes and
    // is checkpointed, then the loop exits.
    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal, stopping after the in-flight step");
        signal_token.cancel();
    });

    let pipeline = Pipeline::new(
        backend,
        Arc::clone(&store) as Arc<dyn StateStore>,
        sink,
        config,
    );

    match pipeline.run(&mut document, &cancel).await {
        Ok(summary) => {
            info!(
                scenes_visited = summary.scenes_visited,
                steps_completed = summary.steps_completed,
                fallbacks_applied = summary.fallbacks_applied,
                cancelled = summary.cancelled,
                "Pipeline run finished"
            );
            if summary.cancelled || !document.is_complete() {
                info!("Some assets are still pending; run again to resume");
            }
        }
        Err(e) if e.is_quota_exceeded() => {
            error!(
                "Provider quota exhausted; completed work is checkpointed, try again once the quota resets: {}",
                e
            );
            std::process::exit(2);
        }
        Err(e) => {
            error!("Pipeline error: {}", e);
            std::process::exit(1);
        }
    }

    info!("Worker shutdown complete");
}
