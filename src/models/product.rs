//! Product creation request/response models
//!
//! The request is deliberately loose: every field may arrive as a string,
//! a number or be missing altogether. [`ProductDraft`] holds the coerced
//! text and is what the shared rule set validates.

use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::common::loose_text;
use crate::validation::{self, FieldSource, FieldValue, ValidationErrors};

/// Body of POST /insert_product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertProductRequest {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub currency_id: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertProductResponse {
    pub success: bool,
    pub id: i32,
    pub created_at: DateTimeWithTimeZone,
}

/// Trimmed text of every product field, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub code: String,
    pub name: String,
    pub price: String,
    pub currency_id: String,
    pub description: String,
}

/// A product that passed every rule and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub currency_id: i32,
    pub description: String,
}

impl From<&InsertProductRequest> for ProductDraft {
    fn from(req: &InsertProductRequest) -> Self {
        Self {
            code: loose_text(req.code.as_ref()),
            name: loose_text(req.name.as_ref()),
            price: loose_text(req.price.as_ref()),
            currency_id: loose_text(req.currency_id.as_ref()),
            description: loose_text(req.description.as_ref()),
        }
    }
}

impl FieldSource for ProductDraft {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        let text = match field {
            "code" => self.code.as_str(),
            "name" => self.name.as_str(),
            "price" => self.price.as_str(),
            "currency_id" => self.currency_id.as_str(),
            "description" => self.description.as_str(),
            _ => "",
        };
        FieldValue::Text(text)
    }
}

impl ProductDraft {
    /// Validate against [`validation::PRODUCT`], aggregating every failure.
    pub fn validate(self) -> Result<ValidProduct, ValidationErrors> {
        validation::PRODUCT.validate(&self)?;

        let price = validation::parse_decimal(&self.price)
            .ok_or_else(|| ValidationErrors::single("price", "Precio inválido"))?;
        let currency_id = validation::parse_id(&self.currency_id)
            .ok_or_else(|| ValidationErrors::single("currency_id", "Moneda inválida"))?;

        Ok(ValidProduct {
            code: self.code,
            name: self.name,
            price,
            currency_id,
            description: self.description,
        })
    }
}
