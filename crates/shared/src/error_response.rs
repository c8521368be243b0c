//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! バリデーション以外の失敗（ストア障害など）を返すときのレスポンス構造体。
//!
//! バリデーション失敗は `{ "success": false, "errors": {...} }` 形式で返すため
//! この型は使わない。axum の `IntoResponse` 変換はサービス側の責務とする。

use serde::Serialize;

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://widgets.example.com/errors";

/// エラーレスポンス（RFC 9457 Problem Details）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"internal-error"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
        }
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値。ストアのエラー内容はログにのみ出力する。
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            500,
            "内部エラーが発生しました",
        )
    }
}
