//! Material creation and product/material association models

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::common::{loose_ids, loose_text};
use crate::validation::{self, FieldSource, FieldValue, ValidationErrors};

/// Body of POST /insert_material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertMaterialRequest {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertMaterialResponse {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMaterial {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialDraft {
    pub code: String,
    pub description: String,
}

impl From<&InsertMaterialRequest> for MaterialDraft {
    fn from(req: &InsertMaterialRequest) -> Self {
        Self {
            code: loose_text(req.code.as_ref()),
            description: loose_text(req.description.as_ref()),
        }
    }
}

impl FieldSource for MaterialDraft {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "code" => FieldValue::Text(&self.code),
            "description" => FieldValue::Text(&self.description),
            _ => FieldValue::Text(""),
        }
    }
}

impl MaterialDraft {
    pub fn validate(self) -> Result<ValidMaterial, ValidationErrors> {
        validation::MATERIAL.validate(&self)?;
        Ok(ValidMaterial {
            code: self.code,
            description: self.description,
        })
    }
}

/// Body of POST /associate_materials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssociateMaterialsRequest {
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub material_ids: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociateMaterialsResponse {
    pub success: bool,
    pub message: String,
    pub product_id: i32,
    pub material_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct AssociationDraft {
    pub product_id: String,
    pub material_ids: Vec<i64>,
}

/// Validated association: a product and a de-duplicated material set in
/// request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialSet {
    pub product_id: i32,
    pub material_ids: Vec<i32>,
}

impl From<&AssociateMaterialsRequest> for AssociationDraft {
    fn from(req: &AssociateMaterialsRequest) -> Self {
        Self {
            product_id: loose_text(req.product_id.as_ref()),
            material_ids: loose_ids(req.material_ids.as_ref()),
        }
    }
}

impl FieldSource for AssociationDraft {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "product_id" => FieldValue::Text(&self.product_id),
            "material_ids" => FieldValue::Ids(&self.material_ids),
            _ => FieldValue::Text(""),
        }
    }
}

impl AssociationDraft {
    pub fn validate(self) -> Result<MaterialSet, ValidationErrors> {
        validation::ASSOCIATION.validate(&self)?;

        let product_id = validation::parse_id(&self.product_id)
            .ok_or_else(|| ValidationErrors::single("product_id", "ID de producto inválido"))?;

        let mut material_ids: Vec<i32> = Vec::with_capacity(self.material_ids.len());
        for id in self.material_ids {
            let id = i32::try_from(id).map_err(|_| {
                ValidationErrors::single("material_ids", "IDs de materiales inválidos")
            })?;
            if !material_ids.contains(&id) {
                material_ids.push(id);
            }
        }

        Ok(MaterialSet {
            product_id,
            material_ids,
        })
    }
}
