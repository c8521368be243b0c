//! # Widgets Service ライブラリ
//!
//! ハンドラ・ユースケース・ルーター構築を公開する。
//! バイナリ（`main.rs`, `generate-openapi`）と統合テストから利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod openapi;
pub mod usecase;
