//! # Widgets Service サーバー
//!
//! ウィジェットの CRUD API を提供する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WIDGET_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WIDGET_PORT` | No | ポート番号（デフォルト: `8888`） |
//! | `DATABASE_URL` | No | SQLite ストア（デフォルト: `sqlite://widget.db`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p widgets-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tokio::net::TcpListener;
use widgets_domain::clock::SystemClock;
use widgets_infra::{
    db::{self, WidgetStore},
    repository::SqliteWidgetRepository,
};
use widgets_service::{
    app_builder::build_app,
    config::WidgetConfig,
    handler::WidgetState,
    usecase::WidgetUseCaseImpl,
};
use widgets_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("widgets-service");
    init_tracing(&tracing_config);
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    let config = WidgetConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Widgets Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // ストアを準備（テーブルがなければ作成）
    let store = WidgetStore::new(&config.database_url)?;
    db::run_migrations(&store).await?;
    tracing::info!(database_url = %config.database_url, "ストアを準備しました");

    // 依存コンポーネントを初期化
    let repository = Arc::new(SqliteWidgetRepository::new(store));
    let usecase = WidgetUseCaseImpl::new(repository, Arc::new(SystemClock));
    let app = build_app(Arc::new(WidgetState { usecase }));

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Widgets Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
