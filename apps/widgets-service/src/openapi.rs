//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Widgets Service の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。
//! バージョンは Cargo.toml の `version` が使われる。

use utoipa::OpenApi;
use widgets_shared::{ErrorResponse, HealthResponse};

use crate::{
    error::ValidationErrorResponse,
    handler::{health, widget},
};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Widget API",
      description = "ウィジェットを作成・参照・更新・削除する API"
   ),
   servers(
      (url = "http://localhost:8888/")
   ),
   paths(
      // health
      health::health_check,
      // widgets
      widget::create_widget,
      widget::list_widgets,
      widget::update_widget,
      widget::delete_widget,
      widget::get_widgets_by_name,
      widget::delete_widgets_by_name,
   ),
   components(schemas(
      ErrorResponse,
      HealthResponse,
      ValidationErrorResponse,
      widget::WidgetRequest,
      widget::WidgetData,
   )),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "widgets", description = "ウィジェット"),
   )
)]
pub struct ApiDoc;
