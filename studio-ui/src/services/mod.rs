//! Outbound work: Shopee import, image download, zip export

pub mod export;
pub mod images;
pub mod shopee;

pub use export::{build_export, ExportBundle, ExportError};
pub use images::{DownloadedImage, ImageDownloader};
pub use shopee::{ImportError, ShopeeClient, ShopeeProduct};
