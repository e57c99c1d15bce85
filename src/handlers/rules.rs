use axum::Json;

use crate::models::common::ValidationRulesResponse;
use crate::validation;

/// Publish the rule sets so any form evaluates exactly what the server does.
pub async fn validation_rules() -> Json<ValidationRulesResponse> {
    Json(ValidationRulesResponse {
        success: true,
        rules: validation::ALL,
    })
}
