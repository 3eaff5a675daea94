use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "ID": "E001",
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@company.com"
    })
)]
pub struct Employee {
    #[serde(rename = "ID")]
    #[schema(example = "E001")]
    pub id: String,

    #[serde(rename = "firstName")]
    #[schema(example = "John")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com", nullable = true)]
    pub email: Option<String>,
}
