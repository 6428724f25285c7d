use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use transcript_relay::application::ports::{ExportStore, StagingStore, TranscriptionEngine};
use transcript_relay::application::services::{TextExportService, TranscriptionService};
use transcript_relay::infrastructure::audio::{MockTranscriptionEngine, TranscriptionEngineFactory};
use transcript_relay::infrastructure::export::LocalExportStore;
use transcript_relay::infrastructure::observability::{TracingConfig, init_tracing};
use transcript_relay::infrastructure::storage::LocalStagingStore;
use transcript_relay::presentation::{
    ApiKey, AppState, Environment, ScaffoldConfig, Settings, create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;
    settings.validate()?;

    let json_logs = settings.logging.enable_json || TracingConfig::default().json_format;
    init_tracing(
        TracingConfig::new(environment.as_str(), json_logs, settings.logging.level.clone()),
        settings.server.port,
    );

    let shutdown = CancellationToken::new();
    let scaffold = ScaffoldConfig::from_env();

    let engine: Arc<dyn TranscriptionEngine> = if scaffold.enabled {
        tracing::warn!("Scaffold mode enabled, using mock transcription engine");
        Arc::new(MockTranscriptionEngine::default().with_delay(scaffold.mock_response_delay()))
    } else {
        TranscriptionEngineFactory::create(
            settings.transcription.provider.into(),
            &settings.transcription.model,
            settings.transcription.api_key.clone(),
            Some(settings.transcription.base_url.clone()),
        )?
    };

    let uploads_path = settings.uploads_path()?;
    let staging_store: Arc<dyn StagingStore> = Arc::new(LocalStagingStore::new(uploads_path.clone())?);
    let transcription_service = Arc::new(TranscriptionService::new(
        engine,
        staging_store,
        settings.transcription_timeout(),
        shutdown.clone(),
    ));

    if let Err(e) = transcription_service
        .sweep_stale_uploads(settings.stale_upload_age())
        .await
    {
        tracing::warn!(error = %e, "Stale upload sweep failed");
    }

    let output_path = settings.output_path()?;
    let export_store: Arc<dyn ExportStore> = Arc::new(LocalExportStore::new(output_path.clone())?);
    let text_export_service = Arc::new(TextExportService::new(export_store));

    if let Some(days) = settings.export.retention_days {
        if let Err(e) = text_export_service
            .apply_retention(days, Local::now().date_naive())
            .await
        {
            tracing::warn!(error = %e, "Export retention sweep failed");
        }
    }

    tracing::info!(
        uploads = %uploads_path.display(),
        output = %output_path.display(),
        model = %settings.transcription.model,
        response_format = ?settings.transcription.response_format,
        auth_enabled = settings.inbound_api_key().is_some(),
        "Storage ready"
    );

    let state = AppState {
        transcription_service,
        text_export_service,
        response_format: settings.transcription.response_format,
        api_key: settings.inbound_api_key().map(ApiKey::new),
        max_upload_bytes: settings.max_upload_bytes(),
    };

    let router = create_router(state);

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling in-flight transcriptions");
    shutdown.cancel();
}
