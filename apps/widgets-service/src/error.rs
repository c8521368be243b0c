//! # Widgets Service エラー定義
//!
//! サービスで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | ボディ |
//! |--------|-----------|--------|
//! | `Validation` | 400 | `{"success": false, "errors": {...}}` |
//! | `Database` | 500 | RFC 9457 Problem Details |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use widgets_domain::widget::ValidationErrors;
use widgets_infra::InfraError;
use widgets_shared::ErrorResponse;

/// バリデーション失敗レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// 常に `false`
    pub success: bool,
    /// フィールド名 → 違反メッセージ一覧
    #[schema(value_type = std::collections::HashMap<String, Vec<String>>)]
    pub errors:  ValidationErrors,
}

/// Widgets Service で発生するエラー
#[derive(Debug, Error)]
pub enum WidgetServiceError {
    /// リクエストボディの検証失敗
    #[error("バリデーションエラー: {0:?}")]
    Validation(ValidationErrors),

    /// ストアの障害
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl IntoResponse for WidgetServiceError {
    fn into_response(self) -> Response {
        match self {
            WidgetServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    success: false,
                    errors,
                }),
            )
                .into_response(),
            WidgetServiceError::Database(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal_error()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validationは400とフィールドエラーを返す() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Missing data for required field.");

        let response = WidgetServiceError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "success": false,
                "errors": {"name": ["Missing data for required field."]}
            })
        );
    }

    #[tokio::test]
    async fn test_databaseは500と固定のproblem_detailsを返す() {
        let error = WidgetServiceError::from(InfraError::from(sqlx::Error::PoolClosed));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["detail"], "内部エラーが発生しました");
    }
}
