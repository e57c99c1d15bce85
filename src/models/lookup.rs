//! Selector data for the registration form.

use serde::{Deserialize, Serialize};

use crate::entities::{branches, currencies, materials, warehouses};
use crate::validation::{FieldSource, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub id: i32,
    pub code: String,
    pub description: String,
}

/// Warehouses and branches are exposed with their description as `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyItem {
    pub id: i32,
    pub name: String,
    pub symbol: String,
}

impl From<materials::Model> for MaterialItem {
    fn from(m: materials::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            description: m.description,
        }
    }
}

impl From<warehouses::Model> for NamedItem {
    fn from(w: warehouses::Model) -> Self {
        Self {
            id: w.id,
            name: w.description,
        }
    }
}

impl From<branches::Model> for NamedItem {
    fn from(b: branches::Model) -> Self {
        Self {
            id: b.id,
            name: b.description,
        }
    }
}

impl From<currencies::Model> for CurrencyItem {
    fn from(c: currencies::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            symbol: c.symbol,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialsResponse {
    pub success: bool,
    pub materials: Vec<MaterialItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehousesResponse {
    pub success: bool,
    pub warehouses: Vec<NamedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesResponse {
    pub success: bool,
    pub branches: Vec<NamedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrenciesResponse {
    pub success: bool,
    pub currencies: Vec<CurrencyItem>,
}

/// Query parameters for GET /get_branches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchesQuery {
    pub warehouse_id: Option<String>,
}

impl FieldSource for BranchesQuery {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "warehouse_id" => FieldValue::Text(self.warehouse_id.as_deref().unwrap_or("").trim()),
            _ => FieldValue::Text(""),
        }
    }
}

/// Query parameters for GET /check_code
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckCodeQuery {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckCodeResponse {
    pub success: bool,
    pub available: bool,
}
