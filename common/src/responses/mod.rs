use serde::{Deserialize, Serialize};

/// Body of `GET /api/health`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: "Server is running".to_string(),
        }
    }
}

/// Body of `GET /api/shift-data/pending-images`: screenshots still waiting
/// in the uploads directory to be forwarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingImages {
    pub has_images: bool,
    pub count: usize,
}

impl PendingImages {
    pub fn from_count(count: usize) -> Self {
        Self {
            has_images: count > 0,
            count,
        }
    }
}
