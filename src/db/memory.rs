use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ProductStore;
use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductChanges, ProductDraft};

/// Process-local store. `IndexMap` keeps insertion order so listing matches
/// creation order, like the SQL store.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<IndexMap<Uuid, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, draft: ProductDraft) -> AppResult<Product> {
        let product = Product::from_draft(draft, Uuid::new_v4(), Utc::now());
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, id: Uuid, changes: &ProductChanges) -> AppResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(AppError::NotFound)?;
        changes.apply_to(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.products
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price,
            quantity: 3,
            brand: "Magik".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let store = MemoryProductStore::new();
        let product = store.create(draft("Teclado", 89.99)).await.unwrap();
        assert!(!product.id.is_nil());
        assert_eq!(product.created_at, product.updated_at);
    }

    #[tokio::test]
    async fn get_returns_created_record() {
        let store = MemoryProductStore::new();
        let created = store.create(draft("Teclado", 89.99)).await.unwrap();
        assert_eq!(store.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryProductStore::new();
        let a = store.create(draft("A", 1.0)).await.unwrap();
        let b = store.create(draft("A", 1.0)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn list_preserves_creation_order() {
        let store = MemoryProductStore::new();
        assert!(store.list_all().await.unwrap().is_empty());

        for name in ["Zeta", "Alfa", "Mango"] {
            store.create(draft(name, 1.0)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alfa", "Mango"]);
    }

    #[tokio::test]
    async fn missing_id_is_not_found_everywhere() {
        let store = MemoryProductStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get_by_id(id).await, Err(AppError::NotFound)));
        assert!(matches!(
            store.update(id, &ProductChanges::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(store.delete(id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn update_price_keeps_other_fields() {
        let store = MemoryProductStore::new();
        let created = store.create(draft("Teclado", 89.99)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let changes = ProductChanges {
            price: Some(74.5),
            ..Default::default()
        };
        store.update(created.id, &changes).await.unwrap();

        let fetched = store.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.price, 74.5);
        assert_eq!(fetched.name, created.name);
        assert_eq!(fetched.quantity, created.quantity);
        assert_eq!(fetched.brand, created.brand);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryProductStore::new();
        let created = store.create(draft("Teclado", 89.99)).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(matches!(
            store.get_by_id(created.id).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(store.delete(created.id).await, Err(AppError::NotFound)));
    }
}
