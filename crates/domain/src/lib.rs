//! # Widgets ドメイン層
//!
//! ウィジェットのエンティティ、入力ペイロードのバリデーション、
//! 時刻プロバイダを定義する。
//!
//! ## 依存関係
//!
//! ```text
//! service → infra → domain
//!     ↘       ↘
//!       shared
//! ```
//!
//! ドメイン層はインフラ層にも HTTP にも依存しない。
//!
//! ## モジュール構成
//!
//! - [`widget`] - ウィジェットエンティティとペイロードバリデータ
//! - [`clock`] - 現在時刻の抽象化

pub mod clock;
pub mod widget;
