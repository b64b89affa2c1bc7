//! Response DTOs.

use serde::{Deserialize, Serialize};

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

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub database: String,
    pub cache: String,
    /// Access history entries lost to a full queue since startup.
    pub audit_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_reports_dropped_audit_entries() {
        let health = HealthResponse {
            status: "ok".into(),
            version: "0.1.0".into(),
            database: "ok".into(),
            cache: "ok".into(),
            audit_dropped: 3,
        };
        let value = serde_json::to_value(ApiResponse::ok(health)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["audit_dropped"], 3);
    }
}
