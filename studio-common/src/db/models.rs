//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caption and hashtag settings (single logical record)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub fixed_hashtags: String,
    pub max_hashtags: i64,
    pub cta: String,
    pub affiliate_disclaimer: String,
    pub language: String,
    pub default_prefix: String,
    pub default_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_hashtags: "#shopee #shopeeafiliados".to_string(),
            max_hashtags: 18,
            cta: "Confira no link 👇".to_string(),
            affiliate_disclaimer: "(Link de afiliado — posso receber comissão sem custo extra.)"
                .to_string(),
            language: "pt-br".to_string(),
            default_prefix: "Achado do dia ✨".to_string(),
            default_suffix: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub price: String,
    pub affiliate_link: String,
    /// One URL per line
    pub image_urls: String,
    pub notes: String,
    pub caption: String,
    pub hashtags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Image URLs as a list, blank lines dropped
    pub fn image_url_list(&self) -> Vec<String> {
        parse_image_urls(&self.image_urls)
    }

    /// Caption and hashtags have both been generated
    pub fn is_ready(&self) -> bool {
        !self.caption.is_empty() && !self.hashtags.is_empty()
    }
}

/// User-editable product fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProductInput {
    pub title: String,
    pub category: String,
    pub price: String,
    pub affiliate_link: String,
    pub image_urls: String,
    pub notes: String,
}

impl ProductInput {
    /// Copy with every field trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price.trim().to_string(),
            affiliate_link: self.affiliate_link.trim().to_string(),
            image_urls: self.image_urls.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

/// Shopee video whose views are counted by hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub shopee_url: String,
    pub target_views: i64,
    pub current_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn target_reached(&self) -> bool {
        self.current_views >= self.target_views
    }
}

/// Split a newline-separated URL list, trimming and dropping blank lines
pub fn parse_image_urls(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
