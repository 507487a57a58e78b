//! Test data request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{DEFAULT_GROUP_NAME, DEFAULT_TEST_COUNT, MAX_GROUP_NAME_LENGTH};

/// Generate test inputs
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestsRequest {
    /// Name of an uploaded generator file
    pub generator_file: Option<String>,

    /// Upper bound is the configured per-request maximum
    #[serde(default = "default_test_count")]
    pub test_count: i32,

    #[serde(default = "default_group_name")]
    #[validate(length(min = 1, max = MAX_GROUP_NAME_LENGTH))]
    pub group_name: String,
}

fn default_test_count() -> i32 {
    DEFAULT_TEST_COUNT
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

/// Produce expected outputs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutputsRequest {
    /// Name of an uploaded solution file
    pub solution_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let request: GenerateTestsRequest =
            serde_json::from_str(r#"{"generatorFile": "gen.py"}"#).unwrap();

        assert_eq!(request.generator_file.as_deref(), Some("gen.py"));
        assert_eq!(request.test_count, 5);
        assert_eq!(request.group_name, "main");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_generator_file_may_be_omitted() {
        let request: GenerateTestsRequest = serde_json::from_str("{}").unwrap();
        assert!(request.generator_file.is_none());
    }

    #[test]
    fn test_empty_group_name_is_invalid() {
        let request: GenerateTestsRequest =
            serde_json::from_str(r#"{"generatorFile": "gen.py", "groupName": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
