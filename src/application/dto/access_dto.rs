use serde::{Deserialize, Serialize};

use crate::domain::models::access::AccessStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessRequestDto {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessStatusDto {
    pub status: AccessStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl AccessStatusDto {
    pub fn bare(status: AccessStatus) -> Self {
        Self {
            status,
            requested_at: None,
            updated_at: None,
        }
    }
}
