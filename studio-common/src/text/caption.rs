//! Caption templating

use crate::db::models::{Product, Settings};
use crate::text::hashtags::build_hashtags;
use serde::Serialize;

/// Caption text plus its hashtag line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub caption: String,
    pub hashtags: String,
}

/// Compose the post caption for a product.
///
/// Lines: `{prefix} {title}`, the price, the notes, the call to action with
/// the affiliate link, the disclaimer and the suffix. Empty lines are dropped.
pub fn build_caption(settings: &Settings, product: &Product) -> GeneratedText {
    let title = product.title.trim();
    let price = product.price.trim();
    let link = product.affiliate_link.trim();
    let prefix = settings.default_prefix.trim();
    let suffix = settings.default_suffix.trim();
    let cta = settings.cta.trim();
    let disclaimer = settings.affiliate_disclaimer.trim();

    let mut lines = vec![format!("{} {}", prefix, title).trim().to_string()];

    if !price.is_empty() {
        lines.push(format!("💰 {}", price));
    }
    if !product.notes.is_empty() {
        lines.push(product.notes.trim().to_string());
    }

    if link.is_empty() {
        lines.push(cta.to_string());
    } else {
        lines.push(format!("{} {}", cta, link).trim().to_string());
    }
    if !disclaimer.is_empty() {
        lines.push(disclaimer.to_string());
    }
    if !suffix.is_empty() {
        lines.push(suffix.to_string());
    }

    let caption = lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let max_hashtags = usize::try_from(settings.max_hashtags).unwrap_or(0);
    let hashtags = build_hashtags(
        title,
        &product.category,
        &settings.fixed_hashtags,
        max_hashtags,
    );

    GeneratedText { caption, hashtags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product() -> Product {
        Product {
            id: 1,
            title: " Vestido Midi Linho ".to_string(),
            category: "moda feminina".to_string(),
            price: "R$ 129,90".to_string(),
            affiliate_link: "https://s.shopee.com.br/abc".to_string(),
            image_urls: String::new(),
            notes: "  Tecido leve  ".to_string(),
            caption: String::new(),
            hashtags: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_caption_with_defaults() {
        let text = build_caption(&Settings::default(), &product());
        assert_eq!(
            text.caption,
            "Achado do dia ✨ Vestido Midi Linho\n\
             💰 R$ 129,90\n\
             Tecido leve\n\
             Confira no link 👇 https://s.shopee.com.br/abc\n\
             (Link de afiliado — posso receber comissão sem custo extra.)"
        );
        assert!(text.hashtags.starts_with("#shopee #shopeeafiliados #modafeminina"));
    }

    #[test]
    fn test_caption_without_link_price_or_notes() {
        let mut p = product();
        p.price = "  ".to_string();
        p.affiliate_link = String::new();
        p.notes = String::new();
        let settings = Settings {
            default_prefix: String::new(),
            affiliate_disclaimer: String::new(),
            default_suffix: "Siga para mais achados".to_string(),
            ..Default::default()
        };

        let text = build_caption(&settings, &p);
        assert_eq!(
            text.caption,
            "Vestido Midi Linho\nConfira no link 👇\nSiga para mais achados"
        );
    }

    #[test]
    fn test_blank_notes_and_cta_leave_no_empty_lines() {
        let mut p = product();
        p.notes = "   ".to_string();
        p.affiliate_link = String::new();
        let settings = Settings {
            cta: String::new(),
            ..Default::default()
        };

        let text = build_caption(&settings, &p);
        assert!(!text.caption.contains("\n\n"));
        assert_eq!(text.caption.lines().count(), 3);
    }

    #[test]
    fn test_max_hashtags_caps_output() {
        let settings = Settings {
            max_hashtags: 2,
            ..Default::default()
        };
        let text = build_caption(&settings, &product());
        assert_eq!(text.hashtags, "#shopee #shopeeafiliados");
    }
}
