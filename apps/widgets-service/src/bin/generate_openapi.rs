//! # OpenAPI YAML 生成ツール
//!
//! Widgets Service の Rust 型から OpenAPI 仕様を YAML 形式で標準出力に出力する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p widgets-service > openapi.yaml
//! ```

use utoipa::OpenApi;
use widgets_service::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    let yaml = ApiDoc::openapi().to_yaml()?;
    print!("{yaml}");
    Ok(())
}
