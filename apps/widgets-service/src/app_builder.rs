//! # アプリケーション構築
//!
//! ルーター構築を担当する。`main.rs` はインフラ初期化とサーバー起動に集中する。
//! 統合テストからも同じルーターを組み立てられるようにライブラリ側に置く。
//!
//! API ドキュメントは `/swagger/spec.html/` の Swagger UI と、
//! その参照先の `/api-docs/openapi.json` で配信する。

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handler::{
        WidgetState,
        create_widget,
        delete_widget,
        delete_widgets_by_name,
        get_widgets_by_name,
        health_check,
        list_widgets,
        update_widget,
    },
    openapi::ApiDoc,
};

/// ルーターを構築する
pub fn build_app(widget_state: Arc<WidgetState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/widget/",
            get(list_widgets)
                .post(create_widget)
                .put(update_widget)
                .delete(delete_widget),
        )
        .route(
            "/widget/{name}",
            get(get_widgets_by_name).delete(delete_widgets_by_name),
        )
        .with_state(widget_state)
        .merge(
            SwaggerUi::new("/swagger/spec.html").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
}
