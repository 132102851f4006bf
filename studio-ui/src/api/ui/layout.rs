//! Shared HTML layout for every page

use axum::{
    http::header,
    response::{Html, IntoResponse, Response},
};
use std::borrow::Cow;

use crate::flash::{clear_cookie, Flash, IncomingFlash};

const STYLE: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background-color: #f5f5f7;
    color: #222;
    line-height: 1.5;
}
header {
    background-color: #ee4d2d;
    color: #fff;
    padding: 12px 24px;
    display: flex;
    align-items: center;
    gap: 24px;
}
header h1 { font-size: 20px; margin: 0; }
header nav a { color: #fff; text-decoration: none; margin-right: 16px; font-weight: 600; }
main { max-width: 1100px; margin: 0 auto; padding: 24px; }
.card { background: #fff; border-radius: 8px; padding: 16px 20px; margin-bottom: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.stats { display: flex; gap: 16px; }
.stats .card { flex: 1; text-align: center; }
.stats .number { font-size: 32px; font-weight: 700; color: #ee4d2d; }
.flash { padding: 10px 16px; border-radius: 6px; margin-bottom: 16px; }
.flash-success { background: #d1fae5; color: #065f46; }
.flash-warning { background: #fef3c7; color: #92400e; }
.flash-danger { background: #fee2e2; color: #991b1b; }
.flash-info { background: #dbeafe; color: #1e40af; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #eee; vertical-align: top; }
label { display: block; font-weight: 600; margin-top: 10px; }
input[type=text], input[type=url], input[type=number], textarea {
    width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 4px; font: inherit;
}
textarea { min-height: 90px; }
.button, button {
    display: inline-block; padding: 6px 14px; border: 0; border-radius: 4px;
    background: #ee4d2d; color: #fff; text-decoration: none; font: inherit; cursor: pointer;
}
.button.secondary, button.secondary { background: #6b7280; }
.button.danger, button.danger { background: #b91c1c; }
form.inline { display: inline; }
.actions { display: flex; gap: 6px; flex-wrap: wrap; }
.badge { padding: 2px 8px; border-radius: 10px; font-size: 12px; font-weight: 600; }
.badge-ready { background: #d1fae5; color: #065f46; }
.badge-pending { background: #e5e7eb; color: #374151; }
progress { width: 160px; }
.muted { color: #6b7280; font-size: 14px; }
"#;

/// Escape text for HTML element content
pub fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape text for a double-quoted HTML attribute
pub fn attr(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            r#"<div class="flash flash-{}">{}</div>"#,
            flash.level.as_str(),
            esc(&flash.message)
        ),
        None => String::new(),
    }
}

/// Full HTML document around `body`
pub fn page(title: &str, flash: Option<&Flash>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} · Affiliate Studio</title>
    <style>{style}</style>
</head>
<body>
    <header>
        <h1>Affiliate Studio</h1>
        <nav>
            <a href="/">Início</a>
            <a href="/products">Produtos</a>
            <a href="/videos">Vídeos</a>
            <a href="/settings">Configurações</a>
        </nav>
    </header>
    <main>
        {flash}
        {body}
    </main>
</body>
</html>"#,
        title = esc(title),
        style = STYLE,
        flash = flash_banner(flash),
        body = body,
    )
}

/// Render a page, consuming the incoming flash message
pub fn render(title: &str, flash: IncomingFlash, body: &str) -> Response {
    let html = page(title, flash.0.as_ref(), body);
    let mut response = Html(html).into_response();
    if flash.0.is_some() {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, clear_cookie());
    }
    response
}

pub fn not_found_html() -> Html<String> {
    Html(page(
        "Página não encontrada",
        None,
        r#"<div class="card">
            <h2>404 · Página não encontrada</h2>
            <p>O item que você procura não existe ou foi removido.</p>
            <p><a class="button" href="/">Voltar ao início</a></p>
        </div>"#,
    ))
}

pub fn error_html(title: &str, message: &str) -> Html<String> {
    let body = format!(
        r#"<div class="card">
            <h2>{}</h2>
            <p>{}</p>
            <p><a class="button" href="/">Voltar ao início</a></p>
        </div>"#,
        esc(title),
        esc(message)
    );
    Html(page(title, None, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_flash_and_title() {
        let flash = Flash::success("<b>ok</b>");
        let html = page("A & B", Some(&flash), "<p>corpo</p>");
        assert!(html.contains("&lt;b&gt;ok&lt;/b&gt;"));
        assert!(html.contains("A &amp; B · Affiliate Studio"));
        assert!(html.contains("<p>corpo</p>"));
        assert!(html.contains("flash-success"));
    }

    #[test]
    fn test_attr_escapes_quotes() {
        assert_eq!(attr(r#"a"b"#), "a&quot;b");
    }
}
