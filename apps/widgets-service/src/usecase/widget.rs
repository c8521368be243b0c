//! # ウィジェットユースケース
//!
//! 入力は検証済み（[`WidgetInput`]）であることを前提とする。
//! 各操作はリポジトリの 1 メソッド呼び出しに対応する。

use std::sync::Arc;

use widgets_domain::{
    clock::Clock,
    widget::{Widget, WidgetInput, WidgetRecord},
};
use widgets_infra::repository::WidgetRepository;

use crate::error::WidgetServiceError;

/// ウィジェットユースケースの実装
pub struct WidgetUseCaseImpl {
    repository: Arc<dyn WidgetRepository>,
    clock:      Arc<dyn Clock>,
}

impl WidgetUseCaseImpl {
    pub fn new(repository: Arc<dyn WidgetRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ウィジェットを作成する（`date_created` を打刻）
    pub async fn create_widget(&self, input: WidgetInput) -> Result<Widget, WidgetServiceError> {
        let widget = Widget::created(input.name, input.number_of_parts, self.clock.now());
        self.repository.insert(&widget).await?;

        tracing::info!(
            name = widget.name(),
            number_of_parts = widget.number_of_parts(),
            "ウィジェットを作成しました"
        );
        Ok(widget)
    }

    /// 全ウィジェットを保存された形のまま取得する
    pub async fn list_widgets(&self) -> Result<Vec<WidgetRecord>, WidgetServiceError> {
        Ok(self.repository.find_all().await?)
    }

    /// 名前が一致するウィジェットを取得する（該当なしは空）
    pub async fn find_widgets_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<WidgetRecord>, WidgetServiceError> {
        Ok(self.repository.find_by_name(name).await?)
    }

    /// 同名のウィジェットの部品数を更新する（`date_updated` を打刻）
    ///
    /// 該当行がなくても新規作成はせず、組み立てたエンティティをそのまま返す。
    pub async fn update_widget(&self, input: WidgetInput) -> Result<Widget, WidgetServiceError> {
        let widget = Widget::updated(input.name, input.number_of_parts, self.clock.now());
        let affected = self.repository.update_parts_by_name(&widget).await?;

        if affected == 0 {
            tracing::warn!(
                name = widget.name(),
                "更新対象のウィジェットが存在しないため何も変更しませんでした"
            );
        } else {
            tracing::info!(
                name = widget.name(),
                number_of_parts = widget.number_of_parts(),
                affected,
                "ウィジェットを更新しました"
            );
        }
        Ok(widget)
    }

    /// 名前と部品数が一致するウィジェットを削除する
    pub async fn delete_widget(&self, input: &WidgetInput) -> Result<u64, WidgetServiceError> {
        let affected = self
            .repository
            .delete_by_name_and_parts(&input.name, input.number_of_parts)
            .await?;

        tracing::info!(
            name = %input.name,
            number_of_parts = input.number_of_parts,
            affected,
            "ウィジェットを削除しました"
        );
        Ok(affected)
    }

    /// 名前が一致するウィジェットをすべて削除する
    pub async fn delete_widgets_by_name(&self, name: &str) -> Result<u64, WidgetServiceError> {
        let affected = self.repository.delete_by_name(name).await?;

        tracing::info!(%name, affected, "ウィジェットを名前で削除しました");
        Ok(affected)
    }
}
