//! # ウィジェットペイロードのバリデーション
//!
//! デコード済み JSON をストアに渡す前に検証する。
//! フィールド制約は [`WIDGET_SCHEMA`] に宣言的に並べ、検証器はそれを順に適用する。
//!
//! 失敗は例外ではなく値で返す。複数フィールド・複数違反をまとめて報告し、
//! 成功時は空の [`ValidationErrors`] になる。
//!
//! エラーメッセージは既存クライアントとの互換のため英語で固定している。

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// オブジェクト全体に対するエラーのキー
pub const SCHEMA_ERROR_KEY: &str = "_schema";

/// 名前の最小文字数
pub const NAME_MIN_LENGTH: usize = 1;

/// 名前の最大文字数
pub const NAME_MAX_LENGTH: usize = 64;

const MSG_INVALID_INPUT: &str = "Invalid input type.";
const MSG_MISSING: &str = "Missing data for required field.";
const MSG_NULL: &str = "Field may not be null.";
const MSG_NOT_STRING: &str = "Not a valid string.";
const MSG_NOT_INTEGER: &str = "Not a valid integer.";
const MSG_NOT_DATETIME: &str = "Not a valid datetime.";
const MSG_UNKNOWN_FIELD: &str = "Unknown field.";

/// フィールドの型と値の制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 文字列。長さは Unicode スカラー値の数で数える
    Text { min: usize, max: usize },
    /// 整数。整数値の数値・小数部 0 の数値・整数を表す文字列を受け付ける
    Integer,
    /// 日時文字列（RFC 3339 または ISO 8601 のタイムゾーンなし形式）
    DateTime,
}

/// 1 フィールド分の制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name:     &'static str,
    pub required: bool,
    pub kind:     FieldKind,
}

/// ウィジェットペイロードのスキーマ
pub const WIDGET_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name:     "name",
        required: true,
        kind:     FieldKind::Text {
            min: NAME_MIN_LENGTH,
            max: NAME_MAX_LENGTH,
        },
    },
    FieldRule {
        name:     "number_of_parts",
        required: true,
        kind:     FieldKind::Integer,
    },
    FieldRule {
        name:     "date_created",
        required: false,
        kind:     FieldKind::DateTime,
    },
    FieldRule {
        name:     "date_updated",
        required: false,
        kind:     FieldKind::DateTime,
    },
];

/// フィールド名 → 違反メッセージ一覧
///
/// JSON では `{"name": ["..."], "number_of_parts": ["..."]}` の形になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// ペイロード全体に対するエラー（`_schema`）を 1 件だけ持つ結果
    pub fn invalid_input() -> Self {
        let mut errors = Self::new();
        errors.add(SCHEMA_ERROR_KEY, MSG_INVALID_INPUT);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 指定フィールドの違反メッセージ（なければ空スライス）
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// スキーマに従ってペイロードを検証する
pub fn validate(schema: &[FieldRule], payload: &JsonValue) -> ValidationErrors {
    let Some(object) = payload.as_object() else {
        return ValidationErrors::invalid_input();
    };

    let mut errors = ValidationErrors::new();

    for rule in schema {
        match object.get(rule.name) {
            None if rule.required => errors.add(rule.name, MSG_MISSING),
            None => {}
            Some(JsonValue::Null) => errors.add(rule.name, MSG_NULL),
            Some(value) => check_kind(rule, value, &mut errors),
        }
    }

    for key in object.keys() {
        if !schema.iter().any(|rule| rule.name == key) {
            errors.add(key, MSG_UNKNOWN_FIELD);
        }
    }

    errors
}

/// ウィジェットペイロードを検証する
pub fn validate_widget(payload: &JsonValue) -> ValidationErrors {
    validate(WIDGET_SCHEMA, payload)
}

fn check_kind(rule: &FieldRule, value: &JsonValue, errors: &mut ValidationErrors) {
    match rule.kind {
        FieldKind::Text { min, max } => {
            let Some(text) = value.as_str() else {
                errors.add(rule.name, MSG_NOT_STRING);
                return;
            };
            let length = text.chars().count();
            if !(min..=max).contains(&length) {
                errors.add(
                    rule.name,
                    format!("Length must be between {min} and {max}."),
                );
            }
        }
        FieldKind::Integer => {
            if coerce_integer(value).is_none() {
                errors.add(rule.name, MSG_NOT_INTEGER);
            }
        }
        FieldKind::DateTime => {
            if !value.as_str().is_some_and(is_datetime) {
                errors.add(rule.name, MSG_NOT_DATETIME);
            }
        }
    }
}

/// 整数として解釈できる JSON 値を i64 に変換する
///
/// 真偽値は受け付けない。
pub fn coerce_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                .map(|f| f as i64)
        }),
        JsonValue::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_datetime(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}

/// 検証済みのウィジェット入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInput {
    pub name:            String,
    pub number_of_parts: i64,
}

impl WidgetInput {
    /// ペイロードを検証し、型変換済みの入力を取り出す
    pub fn parse(payload: &JsonValue) -> Result<Self, ValidationErrors> {
        let errors = validate_widget(payload);
        if !errors.is_empty() {
            return Err(errors);
        }

        let name = payload.get("name").and_then(JsonValue::as_str);
        let number_of_parts = payload.get("number_of_parts").and_then(coerce_integer);
        match (name, number_of_parts) {
            (Some(name), Some(number_of_parts)) => Ok(Self {
                name: name.to_string(),
                number_of_parts,
            }),
            _ => Err(ValidationErrors::invalid_input()),
        }
    }
}
