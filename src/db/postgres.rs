use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::ProductStore;
use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductChanges, ProductDraft};

/// PostgreSQL-backed store over the shared connection pool.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, draft: ProductDraft) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO productos (id, name, price, quantity, brand, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, name, price, quantity, brand, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(&draft.brand)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, quantity, brand, created_at, updated_at
             FROM productos ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, quantity, brand, created_at, updated_at
             FROM productos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn update(&self, id: Uuid, changes: &ProductChanges) -> AppResult<Product> {
        // Single statement: absent fields keep their stored value.
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE productos
            SET name       = COALESCE($1, name),
                price      = COALESCE($2, price),
                quantity   = COALESCE($3, quantity),
                brand      = COALESCE($4, brand),
                updated_at = $5
            WHERE id = $6
            RETURNING id, name, price, quantity, brand, created_at, updated_at
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.price)
        .bind(changes.quantity)
        .bind(changes.brand.as_deref())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;

    use super::*;

    /// Store over `DATABASE_URL` when it names a PostgreSQL server; `None`
    /// skips the test.
    async fn store() -> Option<PgProductStore> {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| url.starts_with("postgres"))?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("DATABASE_URL is set but the database is unreachable");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations failed");
        Some(PgProductStore::new(pool))
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Teclado mecánico".to_string(),
            price: 89.99,
            quantity: 15,
            brand: "Magik".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let Some(store) = store().await else {
            return;
        };

        let created = store.create(draft()).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.get_by_id(created.id).await.unwrap(), created);

        let listed = store.list_all().await.unwrap();
        assert!(listed.iter().any(|p| p.id == created.id));
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let Some(store) = store().await else {
            return;
        };

        let created = store.create(draft()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let changes = ProductChanges {
            quantity: Some(4),
            ..Default::default()
        };
        let updated = store.update(created.id, &changes).await.unwrap();

        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.brand, created.brand);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let Some(store) = store().await else {
            return;
        };

        let created = store.create(draft()).await.unwrap();
        store.delete(created.id).await.unwrap();

        assert!(matches!(store.delete(created.id).await, Err(AppError::NotFound)));
        assert!(matches!(
            store.get_by_id(created.id).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            store.update(created.id, &ProductChanges::default()).await,
            Err(AppError::NotFound)
        ));
    }
}
