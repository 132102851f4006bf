//! Heuristic hashtag engine
//!
//! Tags are assembled in a fixed order: the user's fixed tags, category
//! tags, material/item/color tags found in the title, then keyword tags
//! derived from the title itself. Duplicates keep their first position.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Maximum number of title keywords turned into tags
const MAX_KEYWORD_TAGS: usize = 12;

const STOPWORDS: &[&str] = &[
    "a", "o", "os", "as", "de", "da", "do", "das", "dos", "e", "em", "no", "na", "nos", "nas",
    "para", "por", "com", "sem", "um", "uma", "umas", "uns", "manga", "tecido", "cor",
    "tamanho", "feminino", "feminina", "masculino", "masculina", "infantil", "plus", "size",
    "moda", "look",
];

const CATEGORY_TAGS: &[(&str, &[&str])] = &[
    ("moda feminina", &["#modafeminina", "#lookdodia", "#tendencia", "#roupafeminina"]),
    ("moda evangélica", &["#modaevangelica", "#lookevangelico", "#modacrista"]),
    ("beleza", &["#beleza", "#skincare", "#maquiagem"]),
    ("casa", &["#casaedecoracao", "#organização", "#utilidades"]),
    ("eletronicos", &["#eletronicos", "#tecnologia", "#gadgets"]),
    ("fitness", &["#fitness", "#treino", "#academia"]),
    ("acessorios", &["#acessorios", "#estilo", "#detalhes"]),
];

/// Matched as plain substrings of the lowercased title
const MATERIAL_TAGS: &[(&str, &str)] = &[
    ("linho", "#linho"),
    ("algodao", "#algodao"),
    ("algodão", "#algodao"),
    ("jeans", "#jeans"),
    ("chiffon", "#chiffon"),
    ("laise", "#laise"),
    ("tricot", "#tricot"),
    ("tricô", "#tricot"),
    ("malha", "#malha"),
    ("tule", "#tule"),
    ("viscose", "#viscose"),
    ("sued", "#sued"),
    ("suede", "#suede"),
];

/// Matched as whole words
const ITEM_TAGS: &[(&str, &str)] = &[
    ("vestido", "#vestido"),
    ("saia", "#saia"),
    ("blusa", "#blusa"),
    ("camisa", "#camisa"),
    ("conjunto", "#conjunto"),
    ("calça", "#calca"),
    ("calca", "#calca"),
    ("short", "#short"),
    ("jaqueta", "#jaqueta"),
    ("casaco", "#casaco"),
    ("bolsa", "#bolsa"),
    ("sapato", "#sapato"),
    ("tenis", "#tenis"),
    ("tênis", "#tenis"),
    ("sandalia", "#sandalia"),
    ("sandália", "#sandalia"),
];

/// Matched as plain substrings
const COLOR_TAGS: &[(&str, &str)] = &[
    ("preto", "#preto"),
    ("branco", "#branco"),
    ("bege", "#bege"),
    ("nude", "#nude"),
    ("azul", "#azul"),
    ("rosa", "#rosa"),
    ("verde", "#verde"),
    ("vermelho", "#vermelho"),
    ("marrom", "#marrom"),
    ("cinza", "#cinza"),
    ("off white", "#offwhite"),
    ("offwhite", "#offwhite"),
];

static FIXED_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid regex"));

static TOKEN_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9áàâãéèêíìîóòôõúùûç\s-]").expect("valid regex")
});

static ITEM_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    ITEM_TAGS
        .iter()
        .map(|(word, tag)| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(word))).expect("valid regex");
            (re, *tag)
        })
        .collect()
});

/// Lowercased title words worth tagging: punctuation stripped, stopwords
/// and words of two characters or fewer dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = TOKEN_STRIP_RE.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word) && word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Turn a word into a `#tag`: common Portuguese accents folded, anything
/// outside `[a-z0-9]` removed. Returns `None` when nothing is left.
pub fn normalize_tag(word: &str) -> Option<String> {
    let folded: String = word
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            let c = match c {
                'ç' => 'c',
                'ã' | 'á' | 'à' | 'â' => 'a',
                'é' | 'ê' => 'e',
                'í' => 'i',
                'ó' | 'ô' | 'õ' => 'o',
                'ú' => 'u',
                other => other,
            };
            (c.is_ascii_lowercase() || c.is_ascii_digit()).then_some(c)
        })
        .collect();

    if folded.is_empty() {
        None
    } else {
        Some(format!("#{}", folded))
    }
}

fn uniq_keep_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Build the space-separated hashtag line for a product.
///
/// `max_n == 0` disables the cap.
pub fn build_hashtags(title: &str, category: &str, fixed: &str, max_n: usize) -> String {
    let mut tags: Vec<String> = FIXED_TAG_RE
        .find_iter(fixed)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let lowered_title = title.to_lowercase();

    let category = category.trim().to_lowercase();
    if let Some((_, category_tags)) = CATEGORY_TAGS.iter().find(|(name, _)| *name == category) {
        tags.extend(category_tags.iter().map(|t| t.to_lowercase()));
    }

    for (material, tag) in MATERIAL_TAGS {
        if lowered_title.contains(material) {
            tags.push(tag.to_string());
        }
    }
    for (re, tag) in ITEM_RES.iter() {
        if re.is_match(&lowered_title) {
            tags.push(tag.to_string());
        }
    }
    for (color, tag) in COLOR_TAGS {
        if lowered_title.contains(color) {
            tags.push(tag.to_string());
        }
    }

    let keywords = uniq_keep_order(tokenize(title));
    tags.extend(
        keywords
            .iter()
            .take(MAX_KEYWORD_TAGS)
            .filter_map(|word| normalize_tag(word)),
    );

    let mut tags = uniq_keep_order(
        tags.into_iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect(),
    );

    if max_n > 0 && tags.len() > max_n {
        tags.truncate(max_n);
    }

    tags.join(" ")
}
