use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Core product entity as persisted and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Teclado mecánico")]
    pub name: String,
    #[schema(example = 89.99)]
    pub price: f64,
    #[schema(example = 15)]
    pub quantity: i32,
    #[schema(example = "Magik")]
    pub brand: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a validated draft with a fresh identity. Both timestamps
    /// take the same instant.
    pub fn from_draft(draft: ProductDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
            brand: draft.brand,
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Creation body as received on the wire. `name` and `price` are required;
/// they are optional here so a missing field yields our own 400 message
/// instead of a generic decoding failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NewProduct {
    #[schema(example = "Teclado mecánico")]
    pub name: Option<String>,
    #[schema(example = 89.99)]
    pub price: Option<f64>,
    #[schema(example = 15)]
    pub quantity: Option<i32>,
    #[schema(example = "Magik")]
    pub brand: Option<String>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub brand: String,
}

impl TryFrom<NewProduct> for ProductDraft {
    type Error = AppError;

    fn try_from(payload: NewProduct) -> AppResult<Self> {
        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("El campo 'name' es obligatorio".to_string()))?;
        let price = payload
            .price
            .ok_or_else(|| AppError::Validation("El campo 'price' es obligatorio".to_string()))?;

        Ok(Self {
            name,
            price,
            quantity: payload.quantity.unwrap_or(0),
            // An absent brand is stored as an empty string.
            brand: payload.brand.unwrap_or_default(),
        })
    }
}

/// Partial update body. Only the fields present are replaced.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub brand: Option<String>,
}

impl ProductChanges {
    /// A supplied `name` follows the creation rule: blank is rejected, so an
    /// update can never leave a record without a name.
    pub fn validate(&self) -> AppResult<()> {
        match &self.name {
            Some(name) if name.trim().is_empty() => Err(AppError::Validation(
                "El campo 'name' no puede estar vacío".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Apply the supplied fields to `product` and stamp `updated_at`.
    pub fn apply_to(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(brand) = &self.brand {
            product.brand = brand.clone();
        }
        product.updated_at = now;
    }
}
