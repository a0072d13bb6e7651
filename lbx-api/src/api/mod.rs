//! HTTP API handlers for lbx-api

pub mod health;
pub mod hierarchy;
pub mod info;
pub mod lessons;
pub mod navigation;
pub mod search;
pub mod tags;

pub use health::health_routes;
pub use hierarchy::get_hierarchy;
pub use info::service_info;
pub use lessons::{get_lesson, list_lessons};
pub use navigation::get_navigation;
pub use search::search_lessons;
pub use tags::get_tags;
