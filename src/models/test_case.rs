//! Test case model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Test case database model
///
/// `output_data` stays empty until a solution run produces it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub test_group_id: Uuid,
    pub test_index: i32,
    pub input_data: String,
    pub output_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestCase {
    /// Whether the expected output has been produced yet
    pub fn has_output(&self) -> bool {
        !self.output_data.is_empty()
    }

    /// Get a preview of the input (truncated)
    pub fn input_preview(&self, max_len: usize) -> String {
        preview(&self.input_data, max_len)
    }
}

fn preview(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("5 3", 10), "5 3");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
