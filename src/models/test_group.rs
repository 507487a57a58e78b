//! Test group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Named partition of a problem's test cases sharing a point value
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGroup {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub name: String,
    pub points: i32,
    pub is_sample: bool,
    pub created_at: DateTime<Utc>,
}
