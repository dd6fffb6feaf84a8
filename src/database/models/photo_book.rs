use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PhotoBook {
    pub id: i64,
    pub user_id: i64,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}
