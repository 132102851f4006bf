//! Product database operations

use crate::db::models::{Product, ProductInput};
use crate::time::{now_db_timestamp, parse_db_timestamp};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const PRODUCT_COLUMNS: &str = "id, title, category, price, affiliate_link, image_urls, notes, \
     caption, hashtags, created_at, updated_at";

fn product_from_row(row: &SqliteRow) -> Result<Product> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Product {
        id: row.get("id"),
        title: row.get("title"),
        category: row.get("category"),
        price: row.get("price"),
        affiliate_link: row.get("affiliate_link"),
        image_urls: row.get("image_urls"),
        notes: row.get("notes"),
        caption: row.get("caption"),
        hashtags: row.get("hashtags"),
        created_at: parse_db_timestamp(&created_at)?,
        updated_at: parse_db_timestamp(&updated_at)?,
    })
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("product {}", id))
}

/// Insert a product; fields are trimmed first. Returns the new id.
pub async fn create_product(db: &SqlitePool, input: &ProductInput) -> Result<i64> {
    let input = input.trimmed();
    let now = now_db_timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO products (title, category, price, affiliate_link, image_urls, notes,
                              created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.category)
    .bind(&input.price)
    .bind(&input.affiliate_link)
    .bind(&input.image_urls)
    .bind(&input.notes)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, title = %input.title, "Product created");
    Ok(id)
}

/// Replace the editable fields of a product
pub async fn update_product(db: &SqlitePool, id: i64, input: &ProductInput) -> Result<()> {
    let input = input.trimmed();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET title = ?, category = ?, price = ?, affiliate_link = ?, image_urls = ?, notes = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.category)
    .bind(&input.price)
    .bind(&input.affiliate_link)
    .bind(&input.image_urls)
    .bind(&input.notes)
    .bind(now_db_timestamp())
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Store generated caption and hashtags
pub async fn store_generated(db: &SqlitePool, id: i64, caption: &str, hashtags: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE products SET caption = ?, hashtags = ?, updated_at = ? WHERE id = ?",
    )
    .bind(caption)
    .bind(hashtags)
    .bind(now_db_timestamp())
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Store generated text for many products in one transaction.
///
/// Either every row is updated or none is; an unknown id rolls back the batch.
pub async fn store_generated_batch(
    db: &SqlitePool,
    items: &[(i64, String, String)],
) -> Result<()> {
    let now = now_db_timestamp();
    let mut tx = db.begin().await?;

    for (id, caption, hashtags) in items {
        let result = sqlx::query(
            "UPDATE products SET caption = ?, hashtags = ?, updated_at = ? WHERE id = ?",
        )
        .bind(caption)
        .bind(hashtags)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(*id));
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn delete_product(db: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn get_product(db: &SqlitePool, id: i64) -> Result<Product> {
    let sql = format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| not_found(id))?;
    product_from_row(&row)
}

/// `LIKE` pattern for an optional title search; blank queries match everything
fn title_filter(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q))
}

/// All products, most recently updated first, optionally filtered by title
pub async fn list_products(db: &SqlitePool, query: Option<&str>) -> Result<Vec<Product>> {
    list_products_page(db, query, i64::MAX, 0).await
}

/// One page of [`list_products`]
pub async fn list_products_page(
    db: &SqlitePool,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>> {
    let pattern = title_filter(query);

    let mut sql = format!("SELECT {} FROM products", PRODUCT_COLUMNS);
    if pattern.is_some() {
        sql.push_str(" WHERE title LIKE ?");
    }
    sql.push_str(" ORDER BY updated_at DESC, id DESC LIMIT ? OFFSET ?");

    let mut q = sqlx::query(&sql);
    if let Some(pattern) = &pattern {
        q = q.bind(pattern);
    }
    let rows = q.bind(limit).bind(offset).fetch_all(db).await?;

    rows.iter().map(product_from_row).collect()
}

/// Number of products, optionally filtered by title
pub async fn count_products(db: &SqlitePool, query: Option<&str>) -> Result<i64> {
    let count: i64 = match title_filter(query) {
        Some(pattern) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE title LIKE ?")
                .bind(pattern)
                .fetch_one(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(db)
                .await?
        }
    };
    Ok(count)
}

/// Number of products with a generated caption
pub async fn count_ready(db: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE caption != ''")
        .fetch_one(db)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use std::time::Duration;

    fn input(title: &str) -> ProductInput {
        ProductInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_trims_fields() {
        let db = init_memory_database().await.unwrap();
        let id = create_product(
            &db,
            &ProductInput {
                title: "  Vestido Linho  ".to_string(),
                price: " R$ 89,90 ".to_string(),
                image_urls: "\nhttps://img/1.jpg\n".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let product = get_product(&db, id).await.unwrap();
        assert_eq!(product.title, "Vestido Linho");
        assert_eq!(product.price, "R$ 89,90");
        assert_eq!(product.image_urls, "https://img/1.jpg");
        assert_eq!(product.caption, "");
        assert_eq!(product.created_at, product.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let db = init_memory_database().await.unwrap();
        assert!(matches!(get_product(&db, 42).await, Err(Error::NotFound(_))));
        assert!(matches!(delete_product(&db, 42).await, Err(Error::NotFound(_))));
        assert!(matches!(
            update_product(&db, 42, &input("x")).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            store_generated(&db, 42, "c", "#h").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_orders_by_recent_update() {
        let db = init_memory_database().await.unwrap();
        let first = create_product(&db, &input("Primeiro")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = create_product(&db, &input("Segundo")).await.unwrap();

        let ids: Vec<i64> = list_products(&db, None).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second, first]);

        tokio::time::sleep(Duration::from_millis(5)).await;
        update_product(&db, first, &input("Primeiro editado")).await.unwrap();
        let ids: Vec<i64> = list_products(&db, None).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_search_and_counts() {
        let db = init_memory_database().await.unwrap();
        let a = create_product(&db, &input("Vestido Azul")).await.unwrap();
        create_product(&db, &input("Saia Jeans")).await.unwrap();
        create_product(&db, &input("vestido rosa")).await.unwrap();

        let found = list_products(&db, Some(" vestido ")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(count_products(&db, Some("vestido")).await.unwrap(), 2);
        assert_eq!(count_products(&db, Some("   ")).await.unwrap(), 3);

        assert_eq!(count_ready(&db).await.unwrap(), 0);
        store_generated(&db, a, "Legenda", "#tag").await.unwrap();
        assert_eq!(count_ready(&db).await.unwrap(), 1);
        assert!(get_product(&db, a).await.unwrap().is_ready());
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let db = init_memory_database().await.unwrap();
        for i in 0..5 {
            create_product(&db, &input(&format!("Item {}", i))).await.unwrap();
        }
        let page = list_products_page(&db, None, 2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = init_memory_database().await.unwrap();
        let id = create_product(&db, &input("Bolsa")).await.unwrap();
        delete_product(&db, id).await.unwrap();
        assert_eq!(count_products(&db, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_store_is_all_or_nothing() {
        let db = init_memory_database().await.unwrap();
        let a = create_product(&db, &input("Panela")).await.unwrap();
        let b = create_product(&db, &input("Toalha")).await.unwrap();

        let failing = vec![
            (a, "legenda a".to_string(), "#a".to_string()),
            (999, "legenda x".to_string(), "#x".to_string()),
        ];
        assert!(matches!(
            store_generated_batch(&db, &failing).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(get_product(&db, a).await.unwrap().caption, "");
        assert_eq!(count_ready(&db).await.unwrap(), 0);

        let ok = vec![
            (a, "legenda a".to_string(), "#a".to_string()),
            (b, "legenda b".to_string(), "#b".to_string()),
        ];
        store_generated_batch(&db, &ok).await.unwrap();
        assert_eq!(get_product(&db, b).await.unwrap().hashtags, "#b");
        assert_eq!(count_ready(&db).await.unwrap(), 2);
    }
}
