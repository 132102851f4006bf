//! Shopee product page importer
//!
//! Product pages embed their data as JSON in a `__NEXT_DATA__` script tag.
//! The importer pulls the first object carrying both `name` and `images`
//! out of that blob.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en;q=0.8";

static NEXT_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)__NEXT_DATA__"\s*type="application/json"\s*>(\{.*?\})</script>"#)
        .expect("valid regex")
});

/// Import errors; messages are shown to the user as-is
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("falha de rede: {0}")]
    Network(String),

    #[error("a página respondeu com status {0}")]
    Status(u16),

    #[error("Não foi possível localizar os dados do produto.")]
    DataNotFound,

    #[error("Não foi possível ler os dados do produto.")]
    DataUnreadable,

    #[error("Não foi possível encontrar imagens do produto.")]
    NoImages,

    #[error("Não foi possível identificar o título do produto.")]
    NoTitle,
}

/// Product data pulled from a Shopee page
#[derive(Debug, Clone, PartialEq)]
pub struct ShopeeProduct {
    pub title: String,
    /// Formatted price, empty when unknown
    pub price: String,
    pub image_urls: Vec<String>,
}

/// JSON truthiness: null, false, 0, "", [] and {} are all "missing"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First truthy value among `keys`
fn first_truthy<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|value| is_truthy(value))
}

/// Depth-first search for the first object containing every key
pub fn find_object_with_keys<'a>(
    value: &'a Value,
    keys: &[&str],
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => {
            if keys.iter().all(|key| map.contains_key(*key)) {
                return Some(map);
            }
            map.values().find_map(|v| find_object_with_keys(v, keys))
        }
        Value::Array(items) => items.iter().find_map(|v| find_object_with_keys(v, keys)),
        _ => None,
    }
}

/// Format a raw Shopee price as `R$ 1.234,56`.
///
/// Shopee stores prices scaled by 100000 (sometimes by 100); both scales
/// are undone. Missing, unparsable or non-positive values give `""`.
pub fn format_price(value: Option<&Value>) -> String {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(mut amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
        return String::new();
    };

    if amount >= 100_000.0 {
        amount /= 100_000.0;
    } else if amount >= 100.0 {
        amount /= 100.0;
    }

    let fixed = format!("{:.2}", amount);
    let (integer, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("R$ {},{}", grouped, decimals)
}

/// Extract title, price and image URLs from a product page's HTML
pub fn parse_product_page(html: &str, image_base: &str) -> Result<ShopeeProduct, ImportError> {
    let blob = NEXT_DATA_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .ok_or(ImportError::DataNotFound)?;

    let data: Value =
        serde_json::from_str(blob.as_str()).map_err(|_| ImportError::DataUnreadable)?;

    let item = find_object_with_keys(&data, &["name", "images"]).ok_or(ImportError::NoImages)?;

    let title = first_truthy(item, &["name", "title"])
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(ImportError::NoTitle);
    }

    let image_urls = match item.get("images") {
        Some(Value::Array(images)) => images
            .iter()
            .filter(|img| is_truthy(img))
            .map(|img| match img {
                Value::String(s) if s.starts_with("http") => s.clone(),
                Value::String(s) => format!("{}{}", image_base, s),
                other => format!("{}{}", image_base, other),
            })
            .collect(),
        _ => Vec::new(),
    };

    let price = format_price(first_truthy(
        item,
        &["price", "price_min", "price_min_before_discount"],
    ));

    Ok(ShopeeProduct {
        title,
        price,
        image_urls,
    })
}

/// Fetches and parses Shopee product pages
pub struct ShopeeClient {
    http: reqwest::Client,
    image_base: String,
}

impl ShopeeClient {
    pub fn new(http: reqwest::Client, image_base: String) -> Self {
        Self { http, image_base }
    }

    pub async fn fetch_product(&self, url: &str) -> Result<ShopeeProduct, ImportError> {
        tracing::debug!(url = %url, "Fetching Shopee product page");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(|e| ImportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ImportError::Network(e.to_string()))?;

        let product = parse_product_page(&html, &self.image_base)?;
        tracing::info!(
            url = %url,
            title = %product.title,
            images = product.image_urls.len(),
            "Imported product from Shopee"
        );
        Ok(product)
    }
}
