//! # Lessonbox Client Core
//!
//! Cached, source-agnostic lesson fetching:
//! - `TimeBoxedCache`: expiring in-memory store for fetch results
//! - `ContentSource`: one contract, two backends (REST API or repository
//!   hosting API), selected once at startup from configuration
//! - `LessonClient`: the single fetch surface consulted by all UI code
//! - `Preloader`: background cache warm-up for anticipated navigation

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod preload;
pub mod request;
pub mod source;

pub use cache::{SweepHandle, TimeBoxedCache};
pub use config::{CacheConfig, ClientConfig, PreloadConfig, RepositoryConfig};
pub use orchestrator::LessonClient;
pub use preload::{PreloadHandle, Preloader};
pub use request::{FetchRequest, FetchValue};
pub use source::{select_source, BackendSource, ContentSource, RepositorySource};
