//! Problem model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Problem database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub title: String,
    pub statement_latex: Option<String>,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Get memory limit in bytes
    pub fn memory_limit_bytes(&self) -> i64 {
        self.memory_limit_mb as i64 * 1024 * 1024
    }

    /// Whether `user_id` owns this problem
    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.author_id == *user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_limit_bytes() {
        let now = Utc::now();
        let problem = Problem {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            name: "a-plus-b".to_string(),
            title: "A + B".to_string(),
            statement_latex: None,
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            input_format: None,
            output_format: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(problem.memory_limit_bytes(), 268_435_456);
        assert!(problem.is_owned_by(&problem.author_id.clone()));
        assert!(!problem.is_owned_by(&Uuid::new_v4()));
    }
}
