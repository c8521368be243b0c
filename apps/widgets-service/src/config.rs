//! # Widgets Service 設定
//!
//! 環境変数からサーバーの設定を読み込む。

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8888;
const DEFAULT_DATABASE_URL: &str = "sqlite://widget.db";

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WIDGET_PORT は有効なポート番号である必要があります: {0:?}")]
    InvalidPort(String),
}

/// Widgets Service の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// SQLite ストアの接続 URL
    pub database_url: String,
}

impl WidgetConfig {
    /// 環境変数から設定を読み込む
    ///
    /// | 変数名 | デフォルト |
    /// |--------|-----------|
    /// | `WIDGET_HOST` | `0.0.0.0` |
    /// | `WIDGET_PORT` | `8888` |
    /// | `DATABASE_URL` | `sqlite://widget.db` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("WIDGET_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: lookup("WIDGET_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        })
    }
}
