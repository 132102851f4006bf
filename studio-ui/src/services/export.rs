//! Zip export of every product
//!
//! Layout of the archive:
//! ```text
//! MANIFEST.json
//! {slug}_{NNN}/caption.txt
//! {slug}_{NNN}/meta.json
//! {slug}_{NNN}/images/img_{NN}.{ext}
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;
use sqlx::SqlitePool;
use std::io::{Cursor, Write};
use studio_common::db::{products, settings};
use studio_common::text::{build_caption, safe_folder_name, GeneratedText};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::services::images::ImageDownloader;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Common(#[from] studio_common::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `meta.json` contents; field order is the file's key order
#[derive(Debug, Serialize)]
pub struct ProductMeta {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub price: String,
    pub affiliate_link: String,
    pub image_urls: Vec<String>,
    pub caption: String,
    pub hashtags: String,
    pub updated_at: String,
}

/// One `MANIFEST.json` entry
#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub folder: String,
    pub title: String,
    pub affiliate_link: String,
}

/// A file to be written into the archive
#[derive(Debug)]
pub struct ArchiveEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    fn text(path: String, text: String) -> Self {
        Self {
            path,
            bytes: text.into_bytes(),
        }
    }
}

/// Finished export ready to be sent as a download
#[derive(Debug)]
pub struct ExportBundle {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub product_count: usize,
}

/// `conteudos_{YYYY-MM-DD_HHMM}.zip`
pub fn export_file_name(now: &DateTime<Local>) -> String {
    format!("conteudos_{}.zip", studio_common::time::export_stamp(now))
}

/// `caption.txt` contents
pub fn caption_file(text: &GeneratedText) -> String {
    format!("{}\n\n{}\n", text.caption, text.hashtags)
}

/// Write entries into an in-memory, deflate-compressed zip
pub fn write_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.path.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Collect every product's files (downloading images) and zip them
pub async fn build_export(
    db: &SqlitePool,
    downloader: &ImageDownloader,
    now: DateTime<Local>,
) -> Result<ExportBundle, ExportError> {
    let settings = settings::load_settings(db).await?;
    let items = products::list_products(db, None).await?;

    let mut entries = Vec::new();
    let mut manifest = Vec::with_capacity(items.len());

    for (idx, product) in items.iter().enumerate() {
        let text = if product.is_ready() {
            GeneratedText {
                caption: product.caption.clone(),
                hashtags: product.hashtags.clone(),
            }
        } else {
            build_caption(&settings, product)
        };

        let folder = safe_folder_name(&product.title, idx + 1);
        entries.push(ArchiveEntry::text(
            format!("{}/caption.txt", folder),
            caption_file(&text),
        ));

        let image_urls = product.image_url_list();
        let meta = ProductMeta {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.clone(),
            affiliate_link: product.affiliate_link.clone(),
            image_urls: image_urls.clone(),
            caption: text.caption,
            hashtags: text.hashtags,
            updated_at: product.updated_at.to_rfc3339(),
        };
        entries.push(ArchiveEntry::text(
            format!("{}/meta.json", folder),
            serde_json::to_string_pretty(&meta)?,
        ));

        if !image_urls.is_empty() {
            let images = downloader.download_all(&image_urls).await;
            tracing::debug!(
                folder = %folder,
                requested = image_urls.len(),
                downloaded = images.len(),
                "Images collected for export"
            );
            for image in images {
                entries.push(ArchiveEntry {
                    path: format!("{}/images/{}", folder, image.file_name()),
                    bytes: image.bytes,
                });
            }
        }

        manifest.push(ManifestEntry {
            folder,
            title: product.title.clone(),
            affiliate_link: product.affiliate_link.clone(),
        });
    }

    entries.push(ArchiveEntry::text(
        "MANIFEST.json".to_string(),
        serde_json::to_string_pretty(&manifest)?,
    ));

    let bytes = write_archive(&entries)?;
    tracing::info!(
        products = items.len(),
        files = entries.len(),
        bytes = bytes.len(),
        "Export archive built"
    );

    Ok(ExportBundle {
        file_name: export_file_name(&now),
        bytes,
        product_count: items.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    #[test]
    fn test_export_file_name() {
        let now = Local.with_ymd_and_hms(2025, 1, 31, 18, 4, 0).unwrap();
        assert_eq!(export_file_name(&now), "conteudos_2025-01-31_1804.zip");
    }

    #[test]
    fn test_caption_file_layout() {
        let text = GeneratedText {
            caption: "Linha 1\nLinha 2".to_string(),
            hashtags: "#a #b".to_string(),
        };
        assert_eq!(caption_file(&text), "Linha 1\nLinha 2\n\n#a #b\n");
    }

    #[test]
    fn test_write_archive_readable() {
        let entries = vec![
            ArchiveEntry::text("a/caption.txt".to_string(), "olá ✨".to_string()),
            ArchiveEntry {
                path: "a/images/img_01.jpg".to_string(),
                bytes: vec![0xFF, 0xD8, 0xFF],
            },
        ];
        let bytes = write_archive(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut caption = String::new();
        archive
            .by_name("a/caption.txt")
            .unwrap()
            .read_to_string(&mut caption)
            .unwrap();
        assert_eq!(caption, "olá ✨");

        let image = archive.by_name("a/images/img_01.jpg").unwrap();
        assert_eq!(image.compression(), CompressionMethod::Deflated);
    }
}
