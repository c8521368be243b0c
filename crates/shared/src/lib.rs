//! # Widgets 共有ユーティリティ
//!
//! ワークスペース内の各クレートから使われる、ビジネスロジックを含まない
//! 共通型とトレーシング初期化を提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / service のいずれからも依存できる
//! - axum などの Web フレームワークには依存しない
//! - OpenAPI スキーマは `openapi` feature、ログ初期化は `observability` feature で有効化

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
