use inference::{Classifier, ClassifierConfig};
use preprocess::{CpuPreProcessor, DEFAULT_INPUT_SIZE};
use records::ScanRecordStore;
use server::{
    AppState, PredictionPipeline, ServerConfig, StaticCredentials, UploadStore,
    logging::setup_logging, router, session::cookie_key,
};
use std::sync::Arc;

#[cfg(feature = "ort-backend")]
use inference::backend::ort::OrtBackend as Backend;

#[cfg(not(feature = "ort-backend"))]
compile_error!("The 'ort-backend' feature must be enabled to build the server binary");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    let _telemetry = setup_logging(&config)?;

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    let classifier = Classifier::load::<Backend>(
        &config.model_path,
        ClassifierConfig {
            threshold: config.prediction_threshold,
            ..ClassifierConfig::default()
        },
    );

    let pipeline = PredictionPipeline::new(
        Arc::new(CpuPreProcessor::new(DEFAULT_INPUT_SIZE, config.channel_order)),
        Arc::new(classifier),
        Arc::new(ScanRecordStore::new()),
        UploadStore::new(&config.uploads_dir),
    );

    let state = AppState::new(
        Arc::new(pipeline),
        Arc::new(StaticCredentials::new(
            config.admin_username.clone(),
            config.admin_password.clone(),
        )),
        cookie_key(config.session_secret.as_deref())?,
    );

    let app = router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
