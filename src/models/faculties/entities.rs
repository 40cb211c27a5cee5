use serde::{Deserialize, Serialize};

// 院系实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub coordinator_id: Option<i64>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
