//! Response DTOs.

use serde::{Deserialize, Serialize};

use tutorhub_service::availability::PublishedSlot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Which side(s) this process serves.
    pub svc: String,
    pub version: String,
}

/// Result of publishing every draft slot.
#[derive(Debug, Clone, Serialize)]
pub struct PublishAllResponse {
    pub count: usize,
    pub published: Vec<PublishedSlot>,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedCountResponse {
    pub deleted: usize,
}
