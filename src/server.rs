//! HTTP server initialization and runtime setup.
//!
//! Selects the duplicate store and notifier from configuration, builds the
//! shared state, and runs the Axum server until a shutdown signal arrives.

use crate::api::middleware::rate_limit::RateLimit;
use crate::application::services::SignupService;
use crate::config::{Config, SheetsConfig, StoreBackend};
use crate::domain::repositories::SignupRepository;
use crate::infrastructure::google::{SHEETS_SCOPE, ServiceAccountAuth, ServiceAccountKey};
use crate::infrastructure::mail::{DisabledNotifier, Notifier, SmtpNotifier};
use crate::infrastructure::persistence::{
    FileSignupRepository, SheetLocation, SheetsSignupRepository, UnavailableSignupRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::web::session::SessionSigner;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Selects the duplicate store backend.
///
/// A misconfigured spreadsheet backend does not abort startup: it degrades to
/// [`UnavailableSignupRepository`], and every submission reports a store error.
pub fn build_repository(config: &Config) -> Arc<dyn SignupRepository> {
    match config.store_backend {
        StoreBackend::File => {
            tracing::info!("Store: file {}", config.email_file.display());
            Arc::new(FileSignupRepository::new(config.email_file.clone()))
        }
        StoreBackend::Sheets => match build_sheets_repository(&config.sheets) {
            Ok(repository) => {
                tracing::info!("Store: Google Sheets");
                Arc::new(repository)
            }
            Err(reason) => {
                tracing::error!("Spreadsheet store unavailable: {}", reason);
                Arc::new(UnavailableSignupRepository::new(reason))
            }
        },
    }
}

fn build_sheets_repository(sheets: &SheetsConfig) -> Result<SheetsSignupRepository, String> {
    let spreadsheet_id = sheets
        .sheet_id
        .clone()
        .ok_or_else(|| "SHEET_ID is not set".to_string())?;
    let encoded = sheets
        .credentials_b64
        .as_deref()
        .ok_or_else(|| "GOOGLE_CREDENTIALS_B64 is not set".to_string())?;

    let key = ServiceAccountKey::from_base64(encoded).map_err(|e| e.to_string())?;
    let api_base = url::Url::parse(&sheets.api_base).map_err(|e| e.to_string())?;

    let http = reqwest::Client::new();
    let auth = Arc::new(ServiceAccountAuth::new(key, SHEETS_SCOPE, http.clone()));
    tracing::info!("Sheets service account: {}", auth.client_email());

    let location = SheetLocation {
        api_base,
        spreadsheet_id,
        sheet_name: sheets.sheet_name.clone(),
    };

    Ok(SheetsSignupRepository::new(location, auth, http))
}

/// Selects the notifier.
///
/// Without relay credentials, or with an unusable sender address, confirmations
/// are disabled rather than aborting startup.
pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    let Some(settings) = config.smtp_settings() else {
        tracing::warn!("SMTP credentials not set; confirmation emails are disabled");
        return Arc::new(DisabledNotifier::new());
    };

    match SmtpNotifier::new(&settings) {
        Ok(notifier) => {
            tracing::info!("Notifier: SMTP {}:{}", settings.host, settings.port);
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!("Failed to configure SMTP notifier: {}", e);
            Arc::new(DisabledNotifier::new())
        }
    }
}

/// Builds the shared application state from configuration.
pub fn build_state(config: &Config) -> AppState {
    let signup_service = Arc::new(SignupService::new(
        build_repository(config),
        build_notifier(config),
    ));
    let session = Arc::new(SessionSigner::new(&config.secret_key));

    AppState::new(signup_service, session, config.site_name.as_str())
}

/// Runs the HTTP server with the given configuration.
///
/// Returns once a shutdown signal (Ctrl+C or SIGTERM) has been received and
/// in-flight requests have completed.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config);

    let app = app_router(
        state,
        RateLimit::for_deployment(config.behind_proxy),
        &config.static_dir,
    );

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
