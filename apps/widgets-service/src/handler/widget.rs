//! # ウィジェット API ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /widget/` - ウィジェット作成
//! - `GET /widget/` - 全ウィジェット一覧
//! - `PUT /widget/` - 同名ウィジェットの部品数を更新
//! - `DELETE /widget/` - 名前と部品数が一致するウィジェットを削除
//! - `GET /widget/{name}` - 名前が一致するウィジェット一覧
//! - `DELETE /widget/{name}` - 名前が一致するウィジェットをすべて削除
//!
//! ボディを持つ操作は JSON を自前でデコードし、検証に失敗したら
//! ストアには一切触れずに 400 を返す。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use widgets_domain::widget::{
    ValidationErrors,
    Widget,
    WidgetInput,
    WidgetRecord,
    format_timestamp,
};
use widgets_shared::ErrorResponse;

use crate::{
    error::{ValidationErrorResponse, WidgetServiceError},
    usecase::WidgetUseCaseImpl,
};

/// ウィジェット API の共有状態
pub struct WidgetState {
    pub usecase: WidgetUseCaseImpl,
}

// --- リクエスト型 ---

/// ウィジェット入力
///
/// ドキュメント用。実際のデコードは [`WidgetInput::parse`] で行う。
#[derive(Debug, ToSchema)]
pub struct WidgetRequest {
    /// 1〜64 文字
    pub name:            String,
    pub number_of_parts: i64,
}

// --- レスポンス型 ---

/// ウィジェットデータ
///
/// タイムスタンプは RFC 3339 文字列、未設定は空文字列。
#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetData {
    pub name:            String,
    pub number_of_parts: i64,
    pub date_created:    String,
    pub date_updated:    String,
}

impl From<&Widget> for WidgetData {
    fn from(widget: &Widget) -> Self {
        Self {
            name:            widget.name().to_string(),
            number_of_parts: widget.number_of_parts(),
            date_created:    format_timestamp(widget.date_created()),
            date_updated:    format_timestamp(widget.date_updated()),
        }
    }
}

/// 一覧の 1 行: `[name, number_of_parts, date_created, date_updated]`
///
/// タイムスタンプはストアに保存された文字列をそのまま返す。
#[derive(Debug, Serialize)]
pub struct WidgetRowData(pub String, pub i64, pub String, pub String);

impl From<WidgetRecord> for WidgetRowData {
    fn from(record: WidgetRecord) -> Self {
        Self(
            record.name,
            record.number_of_parts,
            record.date_created,
            record.date_updated,
        )
    }
}

/// 作成レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateWidgetResponse {
    pub success: bool,
    #[serde(rename = "Widget")]
    pub widget:  WidgetData,
}

/// 更新レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateWidgetResponse {
    pub success: bool,
    #[serde(rename = "Widget_Updated")]
    pub widget:  WidgetData,
}

/// 一覧レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetListResponse {
    /// 各行は `[name, number_of_parts, date_created, date_updated]`
    #[schema(value_type = Vec<Vec<Value>>)]
    pub widgets: Vec<WidgetRowData>,
}

impl From<Vec<WidgetRecord>> for WidgetListResponse {
    fn from(records: Vec<WidgetRecord>) -> Self {
        Self {
            widgets: records.into_iter().map(WidgetRowData::from).collect(),
        }
    }
}

/// 削除レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteWidgetResponse {
    pub widget_deleted: String,
}

/// リクエストボディを JSON としてデコードし、検証する
///
/// JSON として読めないボディは `_schema` の違反として扱う。
fn decode_input(body: &Bytes) -> Result<WidgetInput, WidgetServiceError> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| WidgetServiceError::Validation(ValidationErrors::invalid_input()))?;
    WidgetInput::parse(&payload).map_err(WidgetServiceError::Validation)
}

// --- ハンドラ ---

/// POST /widget/
#[utoipa::path(
   post,
   path = "/widget/",
   tag = "widgets",
   request_body = WidgetRequest,
   responses(
      (status = 201, description = "作成したウィジェット", body = CreateWidgetResponse),
      (status = 400, description = "バリデーションエラー", body = ValidationErrorResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn create_widget(
    State(state): State<Arc<WidgetState>>,
    body: Bytes,
) -> Result<Response, WidgetServiceError> {
    let input = decode_input(&body)?;
    let widget = state.usecase.create_widget(input).await?;

    let response = CreateWidgetResponse {
        success: true,
        widget:  WidgetData::from(&widget),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// GET /widget/
#[utoipa::path(
   get,
   path = "/widget/",
   tag = "widgets",
   responses(
      (status = 200, description = "全ウィジェット", body = WidgetListResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_widgets(
    State(state): State<Arc<WidgetState>>,
) -> Result<Response, WidgetServiceError> {
    let records = state.usecase.list_widgets().await?;

    Ok((StatusCode::OK, Json(WidgetListResponse::from(records))).into_response())
}

/// PUT /widget/
///
/// 該当する名前がなくても 201 で入力をそのまま返す（新規作成はしない）。
#[utoipa::path(
   put,
   path = "/widget/",
   tag = "widgets",
   request_body = WidgetRequest,
   responses(
      (status = 201, description = "更新後のウィジェット", body = UpdateWidgetResponse),
      (status = 400, description = "バリデーションエラー", body = ValidationErrorResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn update_widget(
    State(state): State<Arc<WidgetState>>,
    body: Bytes,
) -> Result<Response, WidgetServiceError> {
    let input = decode_input(&body)?;
    let widget = state.usecase.update_widget(input).await?;

    let response = UpdateWidgetResponse {
        success: true,
        widget:  WidgetData::from(&widget),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// DELETE /widget/
#[utoipa::path(
   delete,
   path = "/widget/",
   tag = "widgets",
   request_body = WidgetRequest,
   responses(
      (status = 200, description = "削除した組", body = DeleteWidgetResponse),
      (status = 400, description = "バリデーションエラー", body = ValidationErrorResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_widget(
    State(state): State<Arc<WidgetState>>,
    body: Bytes,
) -> Result<Response, WidgetServiceError> {
    let input = decode_input(&body)?;
    state.usecase.delete_widget(&input).await?;

    let response = DeleteWidgetResponse {
        widget_deleted: format!(
            "name-{}, number_of_parts-{}",
            input.name, input.number_of_parts
        ),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// GET /widget/{name}
#[utoipa::path(
   get,
   path = "/widget/{name}",
   tag = "widgets",
   params(("name" = String, Path, description = "ウィジェット名")),
   responses(
      (status = 200, description = "名前が一致するウィジェット（該当なしは空）", body = WidgetListResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%name))]
pub async fn get_widgets_by_name(
    State(state): State<Arc<WidgetState>>,
    Path(name): Path<String>,
) -> Result<Response, WidgetServiceError> {
    let records = state.usecase.find_widgets_by_name(&name).await?;

    Ok((StatusCode::OK, Json(WidgetListResponse::from(records))).into_response())
}

/// DELETE /widget/{name}
#[utoipa::path(
   delete,
   path = "/widget/{name}",
   tag = "widgets",
   params(("name" = String, Path, description = "ウィジェット名")),
   responses(
      (status = 200, description = "削除した名前", body = DeleteWidgetResponse),
      (status = 500, description = "内部エラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%name))]
pub async fn delete_widgets_by_name(
    State(state): State<Arc<WidgetState>>,
    Path(name): Path<String>,
) -> Result<Response, WidgetServiceError> {
    state.usecase.delete_widgets_by_name(&name).await?;

    Ok((StatusCode::OK, Json(DeleteWidgetResponse { widget_deleted: name })).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{Router, body::Body};
    use chrono::{DateTime, Utc};
    use http::{Method, Request};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use widgets_domain::clock::FixedClock;
    use widgets_infra::{InfraError, repository::WidgetRepository};

    use super::*;
    use crate::app_builder::build_app;

    // --- スタブ ---

    /// メモリ上の Vec に保存するリポジトリ
    #[derive(Default)]
    struct InMemoryWidgetRepository {
        rows: Mutex<Vec<WidgetRecord>>,
    }

    #[async_trait]
    impl WidgetRepository for InMemoryWidgetRepository {
        async fn insert(&self, widget: &Widget) -> Result<(), InfraError> {
            self.rows.lock().unwrap().push(WidgetRecord::from(widget));
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<WidgetRecord>, InfraError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_by_name(&self, name: &str) -> Result<Vec<WidgetRecord>, InfraError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.name == name)
                .cloned()
                .collect())
        }

        async fn update_parts_by_name(&self, widget: &Widget) -> Result<u64, InfraError> {
            let mut rows = self.rows.lock().unwrap();
            let mut affected = 0;
            for row in rows.iter_mut().filter(|r| r.name == widget.name()) {
                row.number_of_parts = widget.number_of_parts();
                row.date_updated = format_timestamp(widget.date_updated());
                affected += 1;
            }
            Ok(affected)
        }

        async fn delete_by_name_and_parts(
            &self,
            name: &str,
            number_of_parts: i64,
        ) -> Result<u64, InfraError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| !(r.name == name && r.number_of_parts == number_of_parts));
            Ok((before - rows.len()) as u64)
        }

        async fn delete_by_name(&self, name: &str) -> Result<u64, InfraError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.name != name);
            Ok((before - rows.len()) as u64)
        }
    }

    /// 常に失敗するリポジトリ
    struct FailingWidgetRepository;

    fn store_down() -> InfraError {
        InfraError::from(sqlx::Error::PoolClosed)
    }

    #[async_trait]
    impl WidgetRepository for FailingWidgetRepository {
        async fn insert(&self, _widget: &Widget) -> Result<(), InfraError> {
            Err(store_down())
        }

        async fn find_all(&self) -> Result<Vec<WidgetRecord>, InfraError> {
            Err(store_down())
        }

        async fn find_by_name(&self, _name: &str) -> Result<Vec<WidgetRecord>, InfraError> {
            Err(store_down())
        }

        async fn update_parts_by_name(&self, _widget: &Widget) -> Result<u64, InfraError> {
            Err(store_down())
        }

        async fn delete_by_name_and_parts(
            &self,
            _name: &str,
            _number_of_parts: i64,
        ) -> Result<u64, InfraError> {
            Err(store_down())
        }

        async fn delete_by_name(&self, _name: &str) -> Result<u64, InfraError> {
            Err(store_down())
        }
    }

    // --- ヘルパー ---

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    const FIXED_NOW_TEXT: &str = "2023-11-14T22:13:20.000000Z";

    fn router(repository: Arc<dyn WidgetRepository>) -> Router {
        let usecase = WidgetUseCaseImpl::new(repository, Arc::new(FixedClock::new(fixed_now())));
        build_app(Arc::new(WidgetState { usecase }))
    }

    async fn send(router: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // --- テストケース ---

    #[tokio::test]
    async fn test_post_作成したウィジェットを201で返す() {
        // Given
        let repository = Arc::new(InMemoryWidgetRepository::default());
        let sut = router(repository.clone());

        // When
        let (status, body) = send(
            sut,
            Method::POST,
            "/widget/",
            r#"{"name":"Gear","number_of_parts":3}"#,
        )
        .await;

        // Then
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "success": true,
                "Widget": {
                    "name": "Gear",
                    "number_of_parts": 3,
                    "date_created": FIXED_NOW_TEXT,
                    "date_updated": ""
                }
            })
        );
        assert_eq!(repository.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_post_名前がないと400でストアに触れない() {
        let repository = Arc::new(InMemoryWidgetRepository::default());
        let sut = router(repository.clone());

        let (status, body) = send(sut, Method::POST, "/widget/", r#"{"number_of_parts":3}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(!body["errors"]["name"].as_array().unwrap().is_empty());
        assert!(repository.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_jsonでないボディは_schemaエラーになる() {
        let sut = router(Arc::new(InMemoryWidgetRepository::default()));

        let (status, body) = send(sut, Method::POST, "/widget/", "name=Gear").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["_schema"], json!(["Invalid input type."]));
    }

    #[tokio::test]
    async fn test_get_一覧は行を配列で返す() {
        let repository = Arc::new(InMemoryWidgetRepository::default());
        repository
            .rows
            .lock()
            .unwrap()
            .push(WidgetRecord::from(&Widget::created("Gear", 3, fixed_now())));
        let sut = router(repository);

        let (status, body) = send(sut, Method::GET, "/widget/", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "widgets": [["Gear", 3, FIXED_NOW_TEXT, ""]] })
        );
    }

    #[tokio::test]
    async fn test_get_by_name_保存されたタイムスタンプを解釈せずに返す() {
        let repository = Arc::new(InMemoryWidgetRepository::default());
        repository.rows.lock().unwrap().push(WidgetRecord {
            name:            "Gear".to_string(),
            number_of_parts: 3,
            date_created:    "2023-11-14 22:13:20.123456".to_string(),
            date_updated:    String::new(),
        });
        let sut = router(repository);

        let (status, body) = send(sut, Method::GET, "/widget/Gear", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "widgets": [["Gear", 3, "2023-11-14 22:13:20.123456", ""]] })
        );
    }

    #[tokio::test]
    async fn test_put_該当なしでも201で入力を返しストアは変わらない() {
        let repository = Arc::new(InMemoryWidgetRepository::default());
        let sut = router(repository.clone());

        let (status, body) = send(
            sut,
            Method::PUT,
            "/widget/",
            r#"{"name":"Sprocket","number_of_parts":9}"#,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "success": true,
                "Widget_Updated": {
                    "name": "Sprocket",
                    "number_of_parts": 9,
                    "date_created": "",
                    "date_updated": FIXED_NOW_TEXT
                }
            })
        );
        assert!(repository.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_削除した組を文字列で返す() {
        let repository = Arc::new(InMemoryWidgetRepository::default());
        repository
            .rows
            .lock()
            .unwrap()
            .push(WidgetRecord::from(&Widget::created("Gear", 3, fixed_now())));
        let sut = router(repository.clone());

        let (status, body) = send(
            sut,
            Method::DELETE,
            "/widget/",
            r#"{"name":"Gear","number_of_parts":3}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "widget_deleted": "name-Gear, number_of_parts-3" })
        );
        assert!(repository.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_name_名前を返す() {
        let sut = router(Arc::new(InMemoryWidgetRepository::default()));

        let (status, body) = send(sut, Method::DELETE, "/widget/Gear", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "widget_deleted": "Gear" }));
    }

    #[tokio::test]
    async fn test_get_by_name_該当なしは空の一覧() {
        let sut = router(Arc::new(InMemoryWidgetRepository::default()));

        let (status, body) = send(sut, Method::GET, "/widget/Nothing", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "widgets": [] }));
    }

    #[tokio::test]
    async fn test_ストア障害は500のproblem_detailsになる() {
        let sut = router(Arc::new(FailingWidgetRepository));

        let (status, body) = send(sut, Method::GET, "/widget/", "").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], json!(500));
        assert_eq!(body["title"], json!("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_検証失敗はストア障害より先に判定される() {
        let sut = router(Arc::new(FailingWidgetRepository));

        let (status, _) = send(
            sut,
            Method::PUT,
            "/widget/",
            &format!(r#"{{"name":"{}","number_of_parts":1}}"#, "x".repeat(65)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
