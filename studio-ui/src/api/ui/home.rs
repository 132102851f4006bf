//! Home page: product counts and settings summary

use axum::{extract::State, response::Response};
use studio_common::db::{products, settings};

use super::layout::{esc, render};
use crate::flash::IncomingFlash;
use crate::{AppState, PageResult};

/// GET /
pub async fn home_page(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let settings = settings::load_settings(&state.db).await?;
    let total = products::count_products(&state.db, None).await?;
    let ready = products::count_ready(&state.db).await?;

    let body = format!(
        r#"<div class="stats">
            <div class="card"><div class="number">{total}</div>produtos cadastrados</div>
            <div class="card"><div class="number">{ready}</div>com legenda pronta</div>
            <div class="card"><div class="number">{pending}</div>pendentes</div>
        </div>
        <div class="card">
            <h2>Configuração atual</h2>
            <p><strong>Hashtags fixas:</strong> {fixed}</p>
            <p><strong>Máximo de hashtags:</strong> {max}</p>
            <p><strong>Chamada:</strong> {cta}</p>
            <p><strong>Prefixo:</strong> {prefix}</p>
            <p><a href="/settings">Editar configurações</a></p>
        </div>
        <div class="card actions">
            <a class="button" href="/products/new">Novo produto</a>
            <a class="button secondary" href="/products">Ver produtos</a>
            <form class="inline" method="post" action="/generate_all">
                <button type="submit">Gerar todas as legendas</button>
            </form>
            <form class="inline" method="post" action="/export_zip">
                <button type="submit" class="secondary">Exportar ZIP</button>
            </form>
        </div>"#,
        total = total,
        ready = ready,
        pending = total - ready,
        fixed = esc(&settings.fixed_hashtags),
        max = settings.max_hashtags,
        cta = esc(&settings.cta),
        prefix = esc(&settings.default_prefix),
    );

    Ok(render("Início", flash, &body))
}
