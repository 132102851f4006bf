//! Settings page

use axum::{extract::State, response::Response, Form};
use serde::Deserialize;
use studio_common::db::{settings, Settings};

use super::layout::{attr, esc, render};
use super::parse_form_int;
use crate::flash::{Flash, IncomingFlash};
use crate::{AppState, PageResult};

/// Posted settings form; `max_hashtags` arrives as text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub fixed_hashtags: String,
    pub max_hashtags: String,
    pub cta: String,
    pub affiliate_disclaimer: String,
    pub default_prefix: String,
    pub default_suffix: String,
}

fn settings_form(s: &Settings) -> String {
    format!(
        r#"<div class="card">
            <h2>Configurações</h2>
            <form method="post" action="/settings">
                <label for="fixed_hashtags">Hashtags fixas</label>
                <input type="text" id="fixed_hashtags" name="fixed_hashtags" value="{fixed}">

                <label for="max_hashtags">Máximo de hashtags (0 = sem limite)</label>
                <input type="number" id="max_hashtags" name="max_hashtags" min="0" value="{max}">

                <label for="cta">Chamada para ação</label>
                <input type="text" id="cta" name="cta" value="{cta}">

                <label for="affiliate_disclaimer">Aviso de afiliado</label>
                <textarea id="affiliate_disclaimer" name="affiliate_disclaimer">{disclaimer}</textarea>

                <label for="default_prefix">Prefixo da legenda</label>
                <input type="text" id="default_prefix" name="default_prefix" value="{prefix}">

                <label for="default_suffix">Sufixo da legenda</label>
                <textarea id="default_suffix" name="default_suffix">{suffix}</textarea>

                <p><button type="submit">Salvar</button></p>
            </form>
        </div>"#,
        fixed = attr(&s.fixed_hashtags),
        max = s.max_hashtags,
        cta = attr(&s.cta),
        disclaimer = esc(&s.affiliate_disclaimer),
        prefix = attr(&s.default_prefix),
        suffix = esc(&s.default_suffix),
    )
}

/// GET /settings
pub async fn settings_page(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let current = settings::load_settings(&state.db).await?;
    Ok(render("Configurações", flash, &settings_form(&current)))
}

/// POST /settings
pub async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> PageResult<Response> {
    let max_hashtags = match parse_form_int(&form.max_hashtags, 18) {
        Some(n) if n >= 0 => n,
        _ => {
            return Ok(Flash::danger(
                "Máximo de hashtags deve ser um número inteiro maior ou igual a zero.",
            )
            .redirect("/settings"))
        }
    };

    let current = settings::load_settings(&state.db).await?;
    let updated = Settings {
        fixed_hashtags: form.fixed_hashtags.trim().to_string(),
        max_hashtags,
        cta: form.cta.trim().to_string(),
        affiliate_disclaimer: form.affiliate_disclaimer.trim().to_string(),
        language: current.language,
        default_prefix: form.default_prefix.trim().to_string(),
        default_suffix: form.default_suffix.trim().to_string(),
    };
    settings::save_settings(&state.db, &updated).await?;
    tracing::info!("Settings updated");

    Ok(Flash::success("Configurações salvas ✅").redirect("/settings"))
}
