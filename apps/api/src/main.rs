//! # Pilot API サーバー
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env を読み込む）
//! cargo run -p pilot-api
//!
//! # 本番環境
//! NODE_ENV=production LOG_FORMAT=json DATABASE_URL=postgres://... pilot-api
//! ```
//!
//! データベースへは遅延接続するため、データベースが停止していても起動でき、
//! `/health/ready` が 503 を返す。

use std::{net::SocketAddr, sync::Arc, time::Instant};

use pilot_api::{
    app::{AppDeps, build_app},
    config::Settings,
};
use pilot_domain::clock::SystemClock;
use pilot_infra::{PostgresReadinessProbe, StubItemRepository, db};
use pilot_shared::observability::{LogFormat, TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started_at = Instant::now();

    // .env ファイルを読み込む（存在しなくてもエラーにしない）
    dotenvy::dotenv().ok();

    let settings = Arc::new(Settings::from_env()?);

    init_tracing(&TracingConfig::new(
        "pilot-api",
        LogFormat::from_env(),
        settings.log_level.filter_directive(),
    ));

    let pool = db::create_pool(&settings.database_url)?;

    let deps = AppDeps {
        item_repository: Arc::new(StubItemRepository::new(Arc::new(SystemClock))),
        readiness_probe: Arc::new(PostgresReadinessProbe::new(pool.clone())),
        started_at,
    };
    let app = build_app(settings.clone(), deps);

    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        environment = %settings.environment,
        "API サーバーを起動しました"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("API サーバーを停止しました");

    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラを登録できませんでした");
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
                tracing::error!(error = %e, "SIGTERM ハンドラを登録できませんでした");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
