//! Product Model
//!
//! The catalog is an external collaborator. The ledger reads a product
//! only to pre-fill item prices when an item is first attached to it.

use serde::{Deserialize, Serialize};

/// Catalog product (dress)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// List price in minor currency units
    pub price: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
