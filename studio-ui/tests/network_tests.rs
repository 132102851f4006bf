//! Shopee import and zip export against a local stand-in server
//!
//! The stand-in serves a Shopee-like product page plus image files, so
//! both features run end to end without leaving 127.0.0.1.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::io::{Cursor, Read};
use std::net::SocketAddr;
use studio_common::config::NetworkConfig;
use studio_common::db::{init_memory_database, products, ProductInput};
use studio_ui::flash::{Flash, FlashLevel, FLASH_COOKIE};
use studio_ui::{build_router, AppState};
use tower::util::ServiceExt; // for `oneshot` method

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn product_page() -> String {
    r#"<!DOCTYPE html><html><head></head><body>
<script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"initialState":{"item":{"itemid":1,"name":"  Tênis Casual Branco ","price":5990000,"images":["abc123","", "missing"]}}}}}</script>
</body></html>"#
        .to_string()
}

/// Start the stand-in server and return its address
async fn start_fake_shopee() -> SocketAddr {
    let app = Router::new()
        .route("/produto/ok", get(|| async { Html(product_page()) }))
        .route(
            "/produto/sem-dados",
            get(|| async { Html("<html><body>nada aqui</body></html>") }),
        )
        .route(
            "/produto/erro",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/img/abc123",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES).into_response() }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn setup_app(fake: SocketAddr) -> (Router, SqlitePool) {
    let db = init_memory_database().await.expect("Should create test database");
    let network = NetworkConfig {
        timeout_secs: 5,
        image_cdn_base: format!("http://{}/img/", fake),
        ..Default::default()
    };
    let state = AppState::new(db.clone(), network).expect("Should build state");
    (build_router(state), db)
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn flash_of(response: &axum::response::Response) -> Flash {
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let value = cookie
        .strip_prefix(&format!("{}=", FLASH_COOKIE))
        .and_then(|rest| rest.split(';').next())
        .unwrap();
    Flash::decode(value).unwrap()
}

fn import_body(fake: SocketAddr, path: &str) -> String {
    format!("shopee_url=http%3A%2F%2F{}{}", fake, path.replace('/', "%2F"))
}

// =============================================================================
// Shopee import
// =============================================================================

#[tokio::test]
async fn test_import_creates_product() {
    let fake = start_fake_shopee().await;
    let (app, db) = setup_app(fake).await;

    let response = app
        .oneshot(post_form("/products/from_shopee", &import_body(fake, "/produto/ok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let items = products::list_products(&db, None).await.unwrap();
    assert_eq!(items.len(), 1);
    let product = &items[0];
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/products/{}/edit", product.id).as_str()
    );
    assert_eq!(flash_of(&response).message, "Produto importado da Shopee ✅");

    assert_eq!(product.title, "Tênis Casual Branco");
    assert_eq!(product.price, "R$ 59,90");
    assert_eq!(product.affiliate_link, "");
    assert_eq!(
        product.image_url_list(),
        vec![
            format!("http://{}/img/abc123", fake),
            format!("http://{}/img/missing", fake),
        ]
    );
}

#[tokio::test]
async fn test_import_page_without_data() {
    let fake = start_fake_shopee().await;
    let (app, db) = setup_app(fake).await;

    let response = app
        .oneshot(post_form(
            "/products/from_shopee",
            &import_body(fake, "/produto/sem-dados"),
        ))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/products/new");

    let flash = flash_of(&response);
    assert_eq!(flash.level, FlashLevel::Danger);
    assert_eq!(
        flash.message,
        "Não foi possível importar o produto: Não foi possível localizar os dados do produto."
    );
    assert_eq!(products::count_products(&db, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_import_error_status() {
    let fake = start_fake_shopee().await;
    let (app, db) = setup_app(fake).await;

    let response = app
        .oneshot(post_form("/products/from_shopee", &import_body(fake, "/produto/erro")))
        .await
        .unwrap();

    let flash = flash_of(&response);
    assert_eq!(flash.level, FlashLevel::Danger);
    assert!(flash.message.starts_with("Não foi possível importar o produto:"));
    assert!(flash.message.contains("500"));
    assert_eq!(products::count_products(&db, None).await.unwrap(), 0);
}

// =============================================================================
// Zip export
// =============================================================================

async fn export(app: Router) -> (String, Vec<u8>) {
    let response = app.oneshot(post_form("/export_zip", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");

    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (disposition, bytes.to_vec())
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("{} should be in the archive", name));
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn test_export_zip_layout() {
    let fake = start_fake_shopee().await;
    let (app, db) = setup_app(fake).await;

    let input = ProductInput {
        title: "Tênis Casual Branco".to_string(),
        price: "R$ 59,90".to_string(),
        affiliate_link: "https://s.shopee.com.br/xyz".to_string(),
        image_urls: format!("http://{0}/img/abc123\nhttp://{0}/img/missing", fake),
        ..Default::default()
    };
    let id = products::create_product(&db, &input).await.unwrap();

    let (disposition, bytes) = export(app).await;
    assert!(disposition.starts_with("attachment; filename=\"conteudos_"));
    assert!(disposition.ends_with(".zip\""));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let folder = "tenis-casual-branco_001";

    let manifest: Value = serde_json::from_slice(&read_entry(&mut archive, "MANIFEST.json")).unwrap();
    assert_eq!(manifest[0]["folder"], folder);
    assert_eq!(manifest[0]["affiliate_link"], "https://s.shopee.com.br/xyz");

    let meta: Value =
        serde_json::from_slice(&read_entry(&mut archive, &format!("{}/meta.json", folder))).unwrap();
    assert_eq!(meta["id"], id);
    assert_eq!(meta["image_urls"].as_array().unwrap().len(), 2);
    let keys: Vec<&String> = meta.as_object().unwrap().keys().collect();
    assert_eq!(keys[0], "id");
    assert_eq!(keys[keys.len() - 1], "updated_at");

    // Not generated yet, so the caption is built on the fly
    let caption =
        String::from_utf8(read_entry(&mut archive, &format!("{}/caption.txt", folder))).unwrap();
    assert!(caption.starts_with("Achado do dia ✨ Tênis Casual Branco\n💰 R$ 59,90"));
    assert!(caption.contains("#tenis"));

    // The missing image is skipped; the one that downloaded keeps its position
    let image = read_entry(&mut archive, &format!("{}/images/img_01.png", folder));
    assert_eq!(image, PNG_BYTES);
    assert!(archive
        .file_names()
        .all(|name| !name.starts_with(&format!("{}/images/img_02", folder))));

    // Export does not store generated text
    assert!(!products::get_product(&db, id).await.unwrap().is_ready());
}

#[tokio::test]
async fn test_export_prefers_stored_caption() {
    let fake = start_fake_shopee().await;
    let (app, db) = setup_app(fake).await;

    let input = ProductInput {
        title: "Bolsa".to_string(),
        ..Default::default()
    };
    let id = products::create_product(&db, &input).await.unwrap();
    products::store_generated(&db, id, "Legenda editada", "#bolsa").await.unwrap();

    let (_, bytes) = export(app).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let caption = String::from_utf8(read_entry(&mut archive, "bolsa_001/caption.txt")).unwrap();
    assert_eq!(caption, "Legenda editada\n\n#bolsa\n");
}

#[tokio::test]
async fn test_export_with_no_products() {
    let fake = start_fake_shopee().await;
    let (app, _db) = setup_app(fake).await;

    let (_, bytes) = export(app).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    let manifest: Value = serde_json::from_slice(&read_entry(&mut archive, "MANIFEST.json")).unwrap();
    assert_eq!(manifest, serde_json::json!([]));
}
