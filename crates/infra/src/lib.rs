//! # Widgets インフラ層
//!
//! SQLite ファイルストアとの接続とウィジェットの永続化を担当する。
//!
//! ## 責務
//!
//! - **ストアアクセス**: リクエストごとに接続を開き、コミットして閉じるスコープ管理
//! - **マイグレーション**: 起動時の `widgets` テーブル作成
//! - **リポジトリ実装**: ウィジェットの CRUD（1 操作 = 1 SQL 文）
//!
//! ## モジュール構成
//!
//! - [`db`] - ストアセッションとマイグレーション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use widgets_infra::{db::{self, WidgetStore}, repository::SqliteWidgetRepository};
//!
//! async fn setup() -> Result<(), widgets_infra::InfraError> {
//!     let store = WidgetStore::new("sqlite://widget.db")?;
//!     db::run_migrations(&store).await?;
//!     let repository = SqliteWidgetRepository::new(store);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
