//! # ユースケース層
//!
//! ハンドラとリポジトリの間で、エンティティの組み立てと書き込みのログ出力を担う。

pub mod widget;

pub use widget::WidgetUseCaseImpl;
