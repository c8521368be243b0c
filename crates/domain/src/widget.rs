//! # ウィジェット
//!
//! このサービスが扱う唯一のエンティティ。
//!
//! ## タイムスタンプの規則
//!
//! 1 回の書き込みで埋まるタイムスタンプは必ず片方だけ:
//!
//! | 操作 | `date_created` | `date_updated` |
//! |------|----------------|----------------|
//! | 作成（POST） | 現在時刻 | 空 |
//! | 更新（PUT） | 空 | 現在時刻 |
//!
//! 名前は自然キーとして扱うが一意制約はなく、同名のウィジェットが共存しうる。
//!
//! ストアから読み出した行は [`WidgetRecord`] として保存時の文字列のまま扱い、
//! タイムスタンプを解釈し直さない。他のツールが書き込んだ行も同じ形で返す。
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::Utc;
//! use widgets_domain::widget::Widget;
//!
//! let widget = Widget::created("Gear", 3, Utc::now());
//! assert!(widget.date_created().is_some());
//! assert!(widget.date_updated().is_none());
//! ```

mod validator;

use chrono::{DateTime, SecondsFormat, Utc};
pub use validator::*;

/// ウィジェットエンティティ
///
/// 入力はバリデーション済みであることを前提とし、このレイヤーでは検証しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    name:            String,
    number_of_parts: i64,
    date_created:    Option<DateTime<Utc>>,
    date_updated:    Option<DateTime<Utc>>,
}

impl Widget {
    /// 書き込み操作に対応するウィジェットを作成する
    ///
    /// `is_creation` が真なら `date_created` に、偽なら `date_updated` に
    /// `now` を打刻し、もう一方は空のままにする。
    pub fn new(
        name: impl Into<String>,
        number_of_parts: i64,
        is_creation: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let (date_created, date_updated) = if is_creation {
            (Some(now), None)
        } else {
            (None, Some(now))
        };
        Self {
            name: name.into(),
            number_of_parts,
            date_created,
            date_updated,
        }
    }

    /// 作成操作用のウィジェット
    pub fn created(name: impl Into<String>, number_of_parts: i64, now: DateTime<Utc>) -> Self {
        Self::new(name, number_of_parts, true, now)
    }

    /// 更新操作用のウィジェット
    pub fn updated(name: impl Into<String>, number_of_parts: i64, now: DateTime<Utc>) -> Self {
        Self::new(name, number_of_parts, false, now)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_parts(&self) -> i64 {
        self.number_of_parts
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        self.date_created
    }

    pub fn date_updated(&self) -> Option<DateTime<Utc>> {
        self.date_updated
    }
}

/// タイムスタンプを保存・応答用の文字列に変換する
///
/// RFC 3339（UTC、マイクロ秒精度）。未設定は空文字列。
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
        .unwrap_or_default()
}

/// ストアに保存されたままのウィジェット 1 行
///
/// タイムスタンプは保存時の文字列で、RFC 3339 とは限らない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRecord {
    pub name:            String,
    pub number_of_parts: i64,
    pub date_created:    String,
    pub date_updated:    String,
}

impl From<&Widget> for WidgetRecord {
    fn from(widget: &Widget) -> Self {
        Self {
            name:            widget.name().to_string(),
            number_of_parts: widget.number_of_parts(),
            date_created:    format_timestamp(widget.date_created()),
            date_updated:    format_timestamp(widget.date_updated()),
        }
    }
}
