use crate::cli::ServeArgs;
use crate::infra::{build_advisor, AppState};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use major_advisor::config::AppConfig;
use major_advisor::error::AppError;
use major_advisor::telemetry::{self, LogSink};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, store_dir: Option<PathBuf>) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let advisor = build_advisor(&config.storage, store_dir)?;

    let app = with_advisor_routes(advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "major advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
