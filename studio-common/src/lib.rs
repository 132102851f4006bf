//! # Affiliate Studio Common Library
//!
//! Shared code for the Affiliate Studio server including:
//! - Database schema, models and queries
//! - Configuration loading and data folder resolution
//! - Caption, hashtag and slug generation

pub mod config;
pub mod db;
pub mod error;
pub mod text;
pub mod time;

pub use error::{Error, Result};
