//! Product Repository
//!
//! Read-only access to the catalog collaborator. The ledger consults a
//! product once, to pre-fill item prices at attach time.

use super::RepoResult;
use shared::models::Product;
use sqlx::{Executor, Sqlite, SqlitePool};

const PRODUCT_SELECT: &str =
    "SELECT id, name, price, image_url, is_active, created_at, updated_at FROM product";

pub async fn find_all(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Product>> {
    let sql =
        format!("{PRODUCT_SELECT} WHERE is_active = 1 ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(exec: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}
