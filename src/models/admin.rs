use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCounts {
    pub products: u64,
    pub product_materials: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearProductsResponse {
    pub success: bool,
    pub message: String,
    pub deleted: DeletedCounts,
    pub summary: String,
}
