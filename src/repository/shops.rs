//! Repair shops and mechanics repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::shop::{RepairShop, Workman},
};

#[derive(Clone)]
pub struct ShopsRepository {
    pool: Pool<Postgres>,
}

impl ShopsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List live repair shops
    pub async fn list(&self) -> AppResult<Vec<RepairShop>> {
        let rows = sqlx::query_as::<_, RepairShop>(
            "SELECT * FROM repair_shops WHERE deleted_at IS NULL ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a live repair shop by ID
    pub async fn find(&self, id: i32) -> AppResult<Option<RepairShop>> {
        let row = sqlx::query_as::<_, RepairShop>(
            "SELECT * FROM repair_shops WHERE id = $1 AND deleted_at IS NULL"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// List live mechanics, optionally restricted to one shop
    pub async fn list_workmen(&self, repair_shop_id: Option<i32>) -> AppResult<Vec<Workman>> {
        let where_clause = if repair_shop_id.is_some() {
            "WHERE deleted_at IS NULL AND repair_shop_id = $1"
        } else {
            "WHERE deleted_at IS NULL"
        };

        let query = format!(
            "SELECT * FROM workmen {} ORDER BY last_name, first_name, middle_name, id",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Workman>(&query);
        if let Some(shop_id) = repair_shop_id {
            builder = builder.bind(shop_id);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get a live mechanic by ID
    pub async fn find_workman(&self, id: i32) -> AppResult<Option<Workman>> {
        let row = sqlx::query_as::<_, Workman>(
            "SELECT * FROM workmen WHERE id = $1 AND deleted_at IS NULL"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
