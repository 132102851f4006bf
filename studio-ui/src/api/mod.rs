//! HTTP handlers for studio-ui

pub mod buildinfo;
pub mod health;
pub mod json;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use json::json_routes;
pub use ui::ui_routes;
