//! # SQLite ストアアクセス
//!
//! ファイルベースの SQLite ストアに対する接続のスコープ管理を行う。
//!
//! ## 設計方針
//!
//! - **接続プールなし**: リポジトリ呼び出しごとに接続を開き、終わったら閉じる
//! - **1 セッション = 1 トランザクション**: [`WidgetStore::open`] で `BEGIN`、
//!   [`StoreSession::close`] で `COMMIT` してから切断する
//! - **必ず閉じる**: SQL 文が失敗した場合も [`StoreSession::finish`] で閉じてからエラーを返す
//! - **リトライなし**: ストアのエラーは [`InfraError`] に包んでそのまま返す
//!
//! ロックは SQLite 自身に任せる。`close()` を呼ばずにドロップしたセッションは
//! 接続の切断とともに SQLite がロールバックする。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! let mut session = store.open().await?;
//! let outcome = sqlx::query("DELETE FROM widgets WHERE name = ?")
//!     .bind("Gear")
//!     .execute(session.conn())
//!     .await;
//! let result = session.finish(outcome).await?;
//! ```

use std::str::FromStr;

use sqlx::{
    ConnectOptions,
    Connection,
    SqliteConnection,
    sqlite::SqliteConnectOptions,
};

use crate::error::InfraError;

/// SQLite ストアの接続先
///
/// 接続設定だけを保持し、接続そのものは持たない。
#[derive(Debug, Clone)]
pub struct WidgetStore {
    options: SqliteConnectOptions,
}

impl WidgetStore {
    /// 接続 URL からストアを作成する
    ///
    /// * `database_url` - `sqlite://widget.db` 形式。ファイルがなければ作成する
    pub fn new(database_url: &str) -> Result<Self, InfraError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Ok(Self { options })
    }

    /// 接続を開いてトランザクションを開始する
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn open(&self) -> Result<StoreSession, InfraError> {
        let mut conn = self.options.connect().await?;
        sqlx::query("BEGIN").execute(&mut conn).await?;
        Ok(StoreSession { conn })
    }

    /// トランザクションなしの素の接続を開く（マイグレーション用）
    async fn connect(&self) -> Result<SqliteConnection, InfraError> {
        Ok(self.options.connect().await?)
    }
}

/// 1 リクエスト分のストアセッション
///
/// [`WidgetStore::open`] で取得し、[`close`](Self::close) または
/// [`finish`](Self::finish) で必ず解放する。
pub struct StoreSession {
    conn: SqliteConnection,
}

impl StoreSession {
    /// セッション内の接続
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// コミットして接続を閉じる
    pub async fn close(mut self) -> Result<(), InfraError> {
        sqlx::query("COMMIT").execute(&mut self.conn).await?;
        self.conn.close().await?;
        Ok(())
    }

    /// SQL 文の結果にかかわらずセッションを閉じ、結果を返す
    ///
    /// SQL 文のエラーを解放時のエラーより優先して返す。
    pub async fn finish<T>(self, outcome: Result<T, sqlx::Error>) -> Result<T, InfraError> {
        let released = self.close().await;
        let value = outcome?;
        released?;
        Ok(value)
    }
}

/// 埋め込みマイグレーションを適用する
///
/// 適用済みのものはスキップされる。起動時に一度呼ぶ。
pub async fn run_migrations(store: &WidgetStore) -> Result<(), InfraError> {
    let mut conn = store.connect().await?;
    let migrated = sqlx::migrate!("../../migrations").run(&mut conn).await;
    let closed = conn.close().await;
    migrated?;
    closed?;
    Ok(())
}
