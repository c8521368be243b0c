//! # WidgetRepository
//!
//! ウィジェットの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **一意制約なし**: 名前で絞り込む更新・削除は同名の全行に作用する
//! - **影響行数を返す**: 更新・削除は何行に作用したかを返し、0 行でもエラーにしない
//! - **保存値をそのまま返す**: 読み出した行のタイムスタンプは解釈せず文字列のまま返す。
//!   別ツールが書き込んだ形式（`2023-11-14 22:13:20.123456` など）の行でも一覧は壊れない
//! - **実行時クエリ**: ファイルストアはビルド時に存在しないため `query!` マクロは使わない

use async_trait::async_trait;
use widgets_domain::widget::{Widget, WidgetRecord};

use crate::{db::WidgetStore, error::InfraError};

/// ウィジェットリポジトリトレイト
#[async_trait]
pub trait WidgetRepository: Send + Sync {
    /// ウィジェットを 1 行挿入する
    async fn insert(&self, widget: &Widget) -> Result<(), InfraError>;

    /// 全ウィジェットを挿入順で取得する
    async fn find_all(&self) -> Result<Vec<WidgetRecord>, InfraError>;

    /// 名前が一致するウィジェットを挿入順で取得する
    async fn find_by_name(&self, name: &str) -> Result<Vec<WidgetRecord>, InfraError>;

    /// 名前が一致する全行の部品数と更新日時を書き換える
    ///
    /// `date_created` は変更しない。該当行がなければ何もせず 0 を返す。
    async fn update_parts_by_name(&self, widget: &Widget) -> Result<u64, InfraError>;

    /// 名前と部品数の両方が一致する行を削除する
    async fn delete_by_name_and_parts(
        &self,
        name: &str,
        number_of_parts: i64,
    ) -> Result<u64, InfraError>;

    /// 名前が一致する全行を削除する
    async fn delete_by_name(&self, name: &str) -> Result<u64, InfraError>;
}

/// `widgets` テーブルの 1 行
///
/// 他のツールが作成したテーブルではタイムスタンプが NULL のことがあり、空文字列として扱う。
#[derive(Debug, sqlx::FromRow)]
struct WidgetRow {
    name:            String,
    number_of_parts: i64,
    date_created:    Option<String>,
    date_updated:    Option<String>,
}

impl From<WidgetRow> for WidgetRecord {
    fn from(row: WidgetRow) -> Self {
        Self {
            name:            row.name,
            number_of_parts: row.number_of_parts,
            date_created:    row.date_created.unwrap_or_default(),
            date_updated:    row.date_updated.unwrap_or_default(),
        }
    }
}

fn into_records(rows: Vec<WidgetRow>) -> Vec<WidgetRecord> {
    rows.into_iter().map(WidgetRecord::from).collect()
}

/// SQLite 実装の WidgetRepository
#[derive(Debug, Clone)]
pub struct SqliteWidgetRepository {
    store: WidgetStore,
}

impl SqliteWidgetRepository {
    pub fn new(store: WidgetStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WidgetRepository for SqliteWidgetRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(name = widget.name()))]
    async fn insert(&self, widget: &Widget) -> Result<(), InfraError> {
        let record = WidgetRecord::from(widget);
        let mut session = self.store.open().await?;
        let outcome = sqlx::query(
            r#"
            INSERT INTO widgets (name, number_of_parts, date_created, date_updated)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.name)
        .bind(record.number_of_parts)
        .bind(record.date_created)
        .bind(record.date_updated)
        .execute(session.conn())
        .await;

        session.finish(outcome).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<WidgetRecord>, InfraError> {
        let mut session = self.store.open().await?;
        let outcome = sqlx::query_as::<_, WidgetRow>(
            r#"
            SELECT name, number_of_parts, date_created, date_updated
            FROM widgets
            ORDER BY rowid
            "#,
        )
        .fetch_all(session.conn())
        .await;

        Ok(into_records(session.finish(outcome).await?))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%name))]
    async fn find_by_name(&self, name: &str) -> Result<Vec<WidgetRecord>, InfraError> {
        let mut session = self.store.open().await?;
        let outcome = sqlx::query_as::<_, WidgetRow>(
            r#"
            SELECT name, number_of_parts, date_created, date_updated
            FROM widgets
            WHERE name = ?
            ORDER BY rowid
            "#,
        )
        .bind(name)
        .fetch_all(session.conn())
        .await;

        Ok(into_records(session.finish(outcome).await?))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(name = widget.name()))]
    async fn update_parts_by_name(&self, widget: &Widget) -> Result<u64, InfraError> {
        let record = WidgetRecord::from(widget);
        let mut session = self.store.open().await?;
        let outcome = sqlx::query(
            r#"
            UPDATE widgets
            SET number_of_parts = ?, date_updated = ?
            WHERE name = ?
            "#,
        )
        .bind(record.number_of_parts)
        .bind(record.date_updated)
        .bind(record.name)
        .execute(session.conn())
        .await;

        Ok(session.finish(outcome).await?.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%name, number_of_parts = number_of_parts))]
    async fn delete_by_name_and_parts(
        &self,
        name: &str,
        number_of_parts: i64,
    ) -> Result<u64, InfraError> {
        let mut session = self.store.open().await?;
        let outcome = sqlx::query("DELETE FROM widgets WHERE name = ? AND number_of_parts = ?")
            .bind(name)
            .bind(number_of_parts)
            .execute(session.conn())
            .await;

        Ok(session.finish(outcome).await?.rows_affected())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%name))]
    async fn delete_by_name(&self, name: &str) -> Result<u64, InfraError> {
        let mut session = self.store.open().await?;
        let outcome = sqlx::query("DELETE FROM widgets WHERE name = ?")
            .bind(name)
            .execute(session.conn())
            .await;

        Ok(session.finish(outcome).await?.rows_affected())
    }
}
