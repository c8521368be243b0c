//! # HTTP ハンドラ
//!
//! Widgets Service の HTTP エンドポイントを提供する。

pub mod health;
pub mod widget;

pub use health::health_check;
pub use widget::{
    WidgetState,
    create_widget,
    delete_widget,
    delete_widgets_by_name,
    get_widgets_by_name,
    list_widgets,
    update_widget,
};
