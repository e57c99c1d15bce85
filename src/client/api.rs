//! HTTP access to the registry endpoints for form front-ends.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ErrorCode;
use crate::models::common::ErrorResponse;
use crate::models::lookup::{
    BranchesResponse, CheckCodeResponse, CurrenciesResponse, CurrencyItem, MaterialItem,
    MaterialsResponse, NamedItem, WarehousesResponse,
};
use crate::models::material::AssociateMaterialsResponse;
use crate::models::product::{InsertProductRequest, InsertProductResponse};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Error de conexión: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Respuesta inválida del servidor: {0}")]
    Decode(#[from] serde_json::Error),
    /// Structured failure payload returned by the server
    #[error("{message}")]
    Api { code: ErrorCode, message: String },
    /// Non-success status without a parseable error payload
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl ClientError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Every call the registration form makes.
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn materials(&self) -> Result<Vec<MaterialItem>, ClientError>;
    async fn warehouses(&self) -> Result<Vec<NamedItem>, ClientError>;
    async fn branches(&self, warehouse_id: i32) -> Result<Vec<NamedItem>, ClientError>;
    async fn currencies(&self) -> Result<Vec<CurrencyItem>, ClientError>;
    /// `true` when no product uses `code` yet
    async fn check_code(&self, code: &str) -> Result<bool, ClientError>;
    async fn insert_product(
        &self,
        request: &InsertProductRequest,
    ) -> Result<InsertProductResponse, ClientError>;
    async fn associate_materials(
        &self,
        product_id: i32,
        material_ids: &[i32],
    ) -> Result<AssociateMaterialsResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => Err(ClientError::Api {
                code: error.code,
                message: error.error,
            }),
            Err(_) => Err(ClientError::Http {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn materials(&self) -> Result<Vec<MaterialItem>, ClientError> {
        let response = self.client.get(self.url("get_materials")).send().await?;
        let body: MaterialsResponse = Self::read(response).await?;
        Ok(body.materials)
    }

    async fn warehouses(&self) -> Result<Vec<NamedItem>, ClientError> {
        let response = self.client.get(self.url("get_warehouses")).send().await?;
        let body: WarehousesResponse = Self::read(response).await?;
        Ok(body.warehouses)
    }

    async fn branches(&self, warehouse_id: i32) -> Result<Vec<NamedItem>, ClientError> {
        let response = self
            .client
            .get(self.url("get_branches"))
            .query(&[("warehouse_id", warehouse_id)])
            .send()
            .await?;
        let body: BranchesResponse = Self::read(response).await?;
        Ok(body.branches)
    }

    async fn currencies(&self) -> Result<Vec<CurrencyItem>, ClientError> {
        let response = self.client.get(self.url("get_currencies")).send().await?;
        let body: CurrenciesResponse = Self::read(response).await?;
        Ok(body.currencies)
    }

    async fn check_code(&self, code: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .get(self.url("check_code"))
            .query(&[("code", code)])
            .send()
            .await?;
        let body: CheckCodeResponse = Self::read(response).await?;
        Ok(body.available)
    }

    async fn insert_product(
        &self,
        request: &InsertProductRequest,
    ) -> Result<InsertProductResponse, ClientError> {
        let response = self
            .client
            .post(self.url("insert_product"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn associate_materials(
        &self,
        product_id: i32,
        material_ids: &[i32],
    ) -> Result<AssociateMaterialsResponse, ClientError> {
        let response = self
            .client
            .post(self.url("associate_materials"))
            .json(&json!({
                "product_id": product_id,
                "material_ids": material_ids,
            }))
            .send()
            .await?;
        Self::read(response).await
    }
}
