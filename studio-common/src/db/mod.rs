//! Database models and queries

pub mod init;
pub mod models;
pub mod products;
pub mod settings;
pub mod videos;

pub use init::*;
pub use models::*;
