//! Product pages: list, create/edit, caption generation, Shopee import, copy view

use axum::{
    extract::{Query, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use studio_common::db::{products, settings, Product, ProductInput};
use studio_common::text::build_caption;

use super::layout::{attr, esc, render};
use super::ItemId;
use crate::flash::{Flash, IncomingFlash};
use crate::{AppState, PageResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShopeeImportForm {
    pub shopee_url: String,
}

fn product_row(product: &Product) -> String {
    let status = if product.is_ready() {
        r#"<span class="badge badge-ready">pronto</span>"#
    } else {
        r#"<span class="badge badge-pending">pendente</span>"#
    };
    let images = product.image_url_list().len();

    format!(
        r#"<tr>
            <td>{id}</td>
            <td><strong>{title}</strong><div class="muted">{category}</div></td>
            <td>{price}</td>
            <td>{images}</td>
            <td>{status}</td>
            <td class="actions">
                <a class="button secondary" href="/products/{id}/edit">Editar</a>
                <form class="inline" method="post" action="/products/{id}/generate">
                    <button type="submit">Gerar</button>
                </form>
                <a class="button secondary" href="/copy/{id}">Copiar</a>
                <form class="inline" method="post" action="/products/{id}/delete"
                      onsubmit="return confirm('Remover este produto?');">
                    <button type="submit" class="danger">Remover</button>
                </form>
            </td>
        </tr>"#,
        id = product.id,
        title = esc(&product.title),
        category = esc(&product.category),
        price = esc(&product.price),
        images = images,
        status = status,
    )
}

/// GET /products?q=
pub async fn products_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let q = query.q.trim();
    let items = products::list_products(&state.db, Some(q)).await?;

    let rows = if items.is_empty() {
        r#"<tr><td colspan="6" class="muted">Nenhum produto encontrado.</td></tr>"#.to_string()
    } else {
        items.iter().map(product_row).collect::<Vec<_>>().join("\n")
    };

    let body = format!(
        r#"<div class="card actions">
            <form method="get" action="/products" class="inline">
                <input type="text" name="q" value="{q}" placeholder="Buscar pelo título">
            </form>
            <a class="button" href="/products/new">Novo produto</a>
            <form class="inline" method="post" action="/generate_all">
                <button type="submit">Gerar todas</button>
            </form>
            <form class="inline" method="post" action="/export_zip">
                <button type="submit" class="secondary">Exportar ZIP</button>
            </form>
        </div>
        <table>
            <thead>
                <tr><th>#</th><th>Produto</th><th>Preço</th><th>Imagens</th><th>Status</th><th></th></tr>
            </thead>
            <tbody>
            {rows}
            </tbody>
        </table>"#,
        q = attr(q),
        rows = rows,
    );

    Ok(render("Produtos", flash, &body))
}

fn product_form(action: &str, submit: &str, input: &ProductInput) -> String {
    format!(
        r#"<form method="post" action="{action}">
            <label for="title">Título</label>
            <input type="text" id="title" name="title" value="{title}">

            <label for="category">Categoria</label>
            <input type="text" id="category" name="category" value="{category}">

            <label for="price">Preço</label>
            <input type="text" id="price" name="price" value="{price}">

            <label for="affiliate_link">Link de afiliado</label>
            <input type="url" id="affiliate_link" name="affiliate_link" value="{link}">

            <label for="image_urls">URLs das imagens (uma por linha)</label>
            <textarea id="image_urls" name="image_urls">{images}</textarea>

            <label for="notes">Observações</label>
            <textarea id="notes" name="notes">{notes}</textarea>

            <p><button type="submit">{submit}</button>
               <a class="button secondary" href="/products">Cancelar</a></p>
        </form>"#,
        action = attr(action),
        title = attr(&input.title),
        category = attr(&input.category),
        price = attr(&input.price),
        link = attr(&input.affiliate_link),
        images = esc(&input.image_urls),
        notes = esc(&input.notes),
        submit = esc(submit),
    )
}

/// GET /products/new
pub async fn new_product_page(flash: IncomingFlash) -> PageResult<Response> {
    let body = format!(
        r#"<div class="card">
            <h2>Importar da Shopee</h2>
            <form method="post" action="/products/from_shopee">
                <label for="shopee_url">Link do produto na Shopee</label>
                <input type="url" id="shopee_url" name="shopee_url" placeholder="https://shopee.com.br/...">
                <p><button type="submit">Importar</button></p>
            </form>
        </div>
        <div class="card">
            <h2>Novo produto</h2>
            {form}
        </div>"#,
        form = product_form("/products/new", "Cadastrar", &ProductInput::default()),
    );

    Ok(render("Novo produto", flash, &body))
}

/// POST /products/new
pub async fn create_product(
    State(state): State<AppState>,
    Form(input): Form<ProductInput>,
) -> PageResult<Response> {
    let id = products::create_product(&state.db, &input).await?;
    tracing::info!(product_id = id, "Product created");
    Ok(Flash::success("Produto cadastrado ✅").redirect("/products"))
}

/// POST /products/from_shopee
pub async fn import_from_shopee(
    State(state): State<AppState>,
    Form(form): Form<ShopeeImportForm>,
) -> PageResult<Response> {
    let url = form.shopee_url.trim();
    if url.is_empty() {
        return Ok(Flash::warning("Informe o link do produto na Shopee.").redirect("/products/new"));
    }

    let imported = match state.shopee_client().fetch_product(url).await {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Shopee import failed");
            return Ok(
                Flash::danger(format!("Não foi possível importar o produto: {}", e))
                    .redirect("/products/new"),
            );
        }
    };

    let input = ProductInput {
        title: imported.title,
        price: imported.price,
        image_urls: imported.image_urls.join("\n"),
        ..Default::default()
    };
    let id = products::create_product(&state.db, &input).await?;
    tracing::info!(product_id = id, images = imported.image_urls.len(), "Product imported from Shopee");

    Ok(Flash::success("Produto importado da Shopee ✅").redirect(&format!("/products/{}/edit", id)))
}

/// GET /products/:id/edit
pub async fn edit_product_page(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let product = products::get_product(&state.db, id).await?;
    let input = ProductInput {
        title: product.title.clone(),
        category: product.category.clone(),
        price: product.price.clone(),
        affiliate_link: product.affiliate_link.clone(),
        image_urls: product.image_urls.clone(),
        notes: product.notes.clone(),
    };

    let body = format!(
        r#"<div class="card">
            <h2>Editar produto #{id}</h2>
            {form}
        </div>"#,
        id = product.id,
        form = product_form(&format!("/products/{}/edit", product.id), "Salvar", &input),
    );

    Ok(render("Editar produto", flash, &body))
}

/// POST /products/:id/edit
pub async fn update_product(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    Form(input): Form<ProductInput>,
) -> PageResult<Response> {
    products::update_product(&state.db, id, &input).await?;
    tracing::info!(product_id = id, "Product updated");
    Ok(Flash::success("Produto atualizado ✅").redirect("/products"))
}

/// POST /products/:id/delete
pub async fn delete_product(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> PageResult<Response> {
    products::delete_product(&state.db, id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(Flash::warning("Produto removido 🗑️").redirect("/products"))
}

/// POST /products/:id/generate
pub async fn generate_caption(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> PageResult<Response> {
    let product = products::get_product(&state.db, id).await?;
    let settings = settings::load_settings(&state.db).await?;

    let text = build_caption(&settings, &product);
    products::store_generated(&state.db, id, &text.caption, &text.hashtags).await?;

    Ok(Flash::success("Legenda e hashtags geradas ✨").redirect("/products"))
}

/// POST /generate_all
pub async fn generate_all(State(state): State<AppState>) -> PageResult<Response> {
    let settings = settings::load_settings(&state.db).await?;
    let items = products::list_products(&state.db, None).await?;

    let generated: Vec<(i64, String, String)> = items
        .iter()
        .map(|product| {
            let text = build_caption(&settings, product);
            (product.id, text.caption, text.hashtags)
        })
        .collect();
    products::store_generated_batch(&state.db, &generated).await?;
    tracing::info!(count = items.len(), "Captions generated for all products");

    Ok(Flash::success(format!("Gerado para {} produtos ✅", items.len())).redirect("/products"))
}

const COPY_SCRIPT: &str = r#"<script>
function copyField(id) {
    const field = document.getElementById(id);
    field.select();
    navigator.clipboard.writeText(field.value);
}
</script>"#;

/// GET /copy/:id
pub async fn copy_page(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    flash: IncomingFlash,
) -> PageResult<Response> {
    let product = products::get_product(&state.db, id).await?;

    let link = if product.affiliate_link.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p><strong>Link:</strong> <a href="{href}" target="_blank">{text}</a></p>"#,
            href = attr(&product.affiliate_link),
            text = esc(&product.affiliate_link),
        )
    };

    let body = format!(
        r#"<div class="card">
            <h2>{title}</h2>
            {link}
            <label for="caption">Legenda</label>
            <textarea id="caption" rows="8" readonly>{caption}</textarea>
            <p><button type="button" onclick="copyField('caption')">Copiar legenda</button></p>

            <label for="hashtags">Hashtags</label>
            <textarea id="hashtags" rows="3" readonly>{hashtags}</textarea>
            <p><button type="button" onclick="copyField('hashtags')">Copiar hashtags</button></p>

            <p><a class="button secondary" href="/products">Voltar</a></p>
        </div>
        {script}"#,
        title = esc(&product.title),
        link = link,
        caption = esc(&product.caption),
        hashtags = esc(&product.hashtags),
        script = COPY_SCRIPT,
    );

    Ok(render("Copiar legenda", flash, &body))
}
