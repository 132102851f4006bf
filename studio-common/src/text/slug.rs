//! URL/file-system safe slugs for export folder names

/// Longest slug kept in an export folder name
const MAX_SLUG_CHARS: usize = 60;

/// Fallback folder stem for titles with no usable characters
const FALLBACK_STEM: &str = "produto";

/// Combining diacritical marks; dropped so decomposed accents fold like
/// precomposed ones
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Lowercase ASCII slug: letters transliterated, apostrophes and digit
/// group commas dropped, every run of other characters collapsed into a
/// single `-`, no leading or trailing `-`.
pub fn slugify(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .filter(|&c| !is_combining_mark(c) && c != '\'')
        .collect();

    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    let mut push = |c: char, slug: &mut String| {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    };

    for (i, &c) in chars.iter().enumerate() {
        if c == ',' {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if prev_digit && next_digit {
                continue;
            }
        }

        if c.is_ascii() || !c.is_alphanumeric() {
            push(c, &mut slug);
        } else {
            match deunicode::deunicode_char(c) {
                Some(folded) => folded.chars().for_each(|f| push(f, &mut slug)),
                None => push(' ', &mut slug),
            }
        }
    }

    slug
}

/// Export folder name: `{slug (max 60 chars)}_{index:03}`
pub fn safe_folder_name(title: &str, index: usize) -> String {
    let slug: String = slugify(title).chars().take(MAX_SLUG_CHARS).collect();
    let stem = if slug.is_empty() { FALLBACK_STEM } else { slug.as_str() };
    format!("{}_{:03}", stem, index)
}
