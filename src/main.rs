use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use hugs::config::AppConfig;
use hugs::db;
use hugs::services::flows;
use hugs::services::messaging::log_only::LogMessagingProvider;
use hugs::services::messaging::twilio::TwilioSmsProvider;
use hugs::services::messaging::MessagingProvider;
use hugs::services::payment::SimulatedProcessor;
use hugs::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.admin_password_hash.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH not set, admin login is disabled");
    }

    let messaging: Box<dyn MessagingProvider> = if config.twilio_configured() {
        tracing::info!("forwarding contact messages by SMS");
        Box::new(TwilioSmsProvider::new(
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        ))
    } else {
        tracing::info!("Twilio not configured, contact messages will only be logged");
        Box::new(LogMessagingProvider)
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        payments: Box::new(SimulatedProcessor::new(Duration::from_millis(
            config.payment_delay_ms,
        ))),
        messaging,
    });

    let pruner = Arc::clone(&state);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            if let Err(e) = flows::prune_expired(&pruner) {
                tracing::error!(error = %e, "failed to prune expired flows");
            }
        }
    });

    let app = hugs::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
