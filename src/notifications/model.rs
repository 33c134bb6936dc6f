use serde::{Deserialize, Serialize};

/// One entry of `GET /api/notifications`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub created_at: String,
    /// Record the notification is about, if any
    #[serde(default)]
    pub dof_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkReadRequest {
    pub notification_id: u64,
}

/// `{ "success": ... }` answer of the mark-read endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
