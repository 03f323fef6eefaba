//! # Observability 基盤
//!
//! トレーシング初期化、ログ出力形式の設定、Request ID 生成を提供する。
//!
//! - 出力形式は環境変数 `LOG_FORMAT`（`json` / `pretty`）で切り替える
//! - ログレベルは `RUST_LOG` が優先、未設定なら呼び出し側が渡すデフォルトを使う
//! - `tracing-error` の `ErrorLayer` を登録し、エラー生成時に `SpanTrace` を捕捉できるようにする

/// Request ID を運ぶ HTTP ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する（この時点ではまだ subscriber が無いため）。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（起動ログに出力）
    pub service_name:      String,
    /// ログ出力形式
    pub log_format:        LogFormat,
    /// `RUST_LOG` 未設定時の EnvFilter ディレクティブ（例: `"info,pilot=info"`）
    pub default_directive: String,
}

impl TracingConfig {
    pub fn new(
        service_name: impl Into<String>,
        log_format: LogFormat,
        default_directive: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_directive: default_directive.into(),
        }
    }
}

/// トレーシングを初期化する
///
/// JSON モードでは `timestamp`, `level`, `target`, `message` がトップレベルに出力され、
/// 現在のスパン（リクエストスパン）のフィールドも含まれる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_directive.as_str().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info!(service = %config.service_name, "トレーシングを初期化しました");
}

/// UUID v7 の Request ID を生成する
///
/// タイムスタンプを含むため、ログ上で生成順に並ぶ。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// リクエストスパンを作成する（`TraceLayer::make_span_with` 用）
///
/// `SetRequestIdLayer` が付与した Request ID をスパンに含める。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
