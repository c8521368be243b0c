//! # リポジトリ実装
//!
//! - **1 メソッド = 1 SQL 文 = 1 セッション**: 各メソッドは [`WidgetStore`](crate::db::WidgetStore)
//!   から新しいセッションを開き、実行後に閉じる
//! - **テスタビリティ**: トレイト経由でスタブに差し替え可能

pub mod widget_repository;

pub use widget_repository::{SqliteWidgetRepository, WidgetRepository};
