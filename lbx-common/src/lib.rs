//! # Lessonbox Common Library
//!
//! Shared code for the Lessonbox client and content API including:
//! - Domain model (lessons, hierarchy, navigation, tags)
//! - Common error types
//! - Frontmatter parsing for Markdown lesson files
//! - Catalog operations (sorting, hierarchy building, search, navigation)
//! - Configuration file helpers

pub mod catalog;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod model;

pub use error::{Error, Result};
