//! Video view tracking page

use axum::{
    extract::State,
    response::Response,
    Form,
};
use serde::Deserialize;
use studio_common::db::{videos, Video};

use super::layout::{attr, esc, render};
use super::{parse_form_int, ItemId};
use crate::flash::{Flash, IncomingFlash};
use crate::{AppState, PageResult};

/// Posted video form; `target_views` arrives as text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoForm {
    pub title: String,
    pub shopee_url: String,
    pub target_views: String,
}

fn video_row(video: &Video) -> String {
    let status = if video.target_reached() {
        r#"<span class="badge badge-ready">meta atingida</span>"#
    } else {
        ""
    };
    let title = if video.title.is_empty() {
        esc(&video.shopee_url).into_owned()
    } else {
        esc(&video.title).into_owned()
    };

    format!(
        r#"<tr>
            <td><a href="{url}" target="_blank">{title}</a></td>
            <td><progress value="{current}" max="{target}"></progress>
                {current}/{target} {status}</td>
            <td class="actions">
                <form class="inline" method="post" action="/videos/{id}/increment">
                    <button type="submit">+1</button>
                </form>
                <form class="inline" method="post" action="/videos/{id}/reset">
                    <button type="submit" class="secondary">Zerar</button>
                </form>
                <form class="inline" method="post" action="/videos/{id}/delete"
                      onsubmit="return confirm('Remover este vídeo?');">
                    <button type="submit" class="danger">Remover</button>
                </form>
            </td>
        </tr>"#,
        id = video.id,
        url = attr(&video.shopee_url),
        title = title,
        current = video.current_views,
        target = video.target_views,
        status = status,
    )
}

/// GET /videos
pub async fn videos_page(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let items = videos::list_videos(&state.db).await?;

    let rows = if items.is_empty() {
        r#"<tr><td colspan="3" class="muted">Nenhum vídeo cadastrado.</td></tr>"#.to_string()
    } else {
        items.iter().map(video_row).collect::<Vec<_>>().join("\n")
    };

    let body = format!(
        r#"<div class="card">
            <h2>Adicionar vídeo</h2>
            <form method="post" action="/videos">
                <label for="title">Título</label>
                <input type="text" id="title" name="title">

                <label for="shopee_url">Link do vídeo</label>
                <input type="url" id="shopee_url" name="shopee_url" required>

                <label for="target_views">Meta de visualizações</label>
                <input type="number" id="target_views" name="target_views" min="1" value="1">

                <p><button type="submit">Adicionar</button></p>
            </form>
        </div>
        <table>
            <thead><tr><th>Vídeo</th><th>Progresso</th><th></th></tr></thead>
            <tbody>
            {rows}
            </tbody>
        </table>"#,
        rows = rows,
    );

    Ok(render("Vídeos", flash, &body))
}

/// POST /videos
pub async fn create_video(
    State(state): State<AppState>,
    Form(form): Form<VideoForm>,
) -> PageResult<Response> {
    if form.shopee_url.trim().is_empty() {
        return Ok(Flash::warning("Informe o link do vídeo.").redirect("/videos"));
    }
    let Some(target) = parse_form_int(&form.target_views, 1) else {
        return Ok(
            Flash::danger("Meta de visualizações deve ser um número inteiro.").redirect("/videos"),
        );
    };

    let id = videos::create_video(&state.db, &form.title, &form.shopee_url, target).await?;
    tracing::info!(video_id = id, "Video added");

    Ok(Flash::success("Vídeo adicionado ✅").redirect("/videos"))
}

/// POST /videos/:id/increment
pub async fn increment_views(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> PageResult<Response> {
    let views = videos::increment_views(&state.db, id).await?;
    tracing::debug!(video_id = id, views, "Video view recorded");
    Ok(Flash::success("Visualização registrada ✅").redirect("/videos"))
}

/// POST /videos/:id/reset
pub async fn reset_views(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> PageResult<Response> {
    videos::reset_views(&state.db, id).await?;
    Ok(Flash::warning("Contador reiniciado ✅").redirect("/videos"))
}

/// POST /videos/:id/delete
pub async fn delete_video(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> PageResult<Response> {
    videos::delete_video(&state.db, id).await?;
    tracing::info!(video_id = id, "Video deleted");
    Ok(Flash::warning("Vídeo removido 🗑️").redirect("/videos"))
}
