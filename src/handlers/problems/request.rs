//! Problem request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{
        DEFAULT_MEMORY_LIMIT_MB, DEFAULT_TIME_LIMIT_MS, MAX_MEMORY_LIMIT_MB,
        MAX_PROBLEM_NAME_LENGTH, MAX_TIME_LIMIT_MS, MIN_MEMORY_LIMIT_MB, MIN_TIME_LIMIT_MS,
    },
    db::repositories::{NewProblem, ProblemChanges},
};

/// Create problem request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemRequest {
    /// Short machine name, used for the export archive
    #[validate(length(min = 1, max = MAX_PROBLEM_NAME_LENGTH))]
    pub name: String,

    #[validate(length(min = 1, max = MAX_PROBLEM_NAME_LENGTH))]
    pub title: String,

    pub statement_latex: Option<String>,

    /// Time limit in milliseconds
    #[serde(default = "default_time_limit")]
    #[validate(range(min = MIN_TIME_LIMIT_MS, max = MAX_TIME_LIMIT_MS))]
    pub time_limit: i32,

    /// Memory limit in megabytes
    #[serde(default = "default_memory_limit")]
    #[validate(range(min = MIN_MEMORY_LIMIT_MB, max = MAX_MEMORY_LIMIT_MB))]
    pub memory_limit: i32,

    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub notes: Option<String>,
}

fn default_time_limit() -> i32 {
    DEFAULT_TIME_LIMIT_MS
}

fn default_memory_limit() -> i32 {
    DEFAULT_MEMORY_LIMIT_MB
}

impl CreateProblemRequest {
    pub fn as_new_problem(&self) -> NewProblem<'_> {
        NewProblem {
            name: self.name.trim(),
            title: self.title.trim(),
            statement_latex: self.statement_latex.as_deref(),
            time_limit_ms: self.time_limit,
            memory_limit_mb: self.memory_limit,
            input_format: self.input_format.as_deref(),
            output_format: self.output_format.as_deref(),
            notes: self.notes.as_deref(),
        }
    }
}

/// Update problem request.
///
/// Only the listed fields may be changed; anything else is rejected.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = MAX_PROBLEM_NAME_LENGTH))]
    pub title: Option<String>,

    pub statement_latex: Option<String>,

    #[validate(range(min = MIN_TIME_LIMIT_MS, max = MAX_TIME_LIMIT_MS))]
    pub time_limit: Option<i32>,

    #[validate(range(min = MIN_MEMORY_LIMIT_MB, max = MAX_MEMORY_LIMIT_MB))]
    pub memory_limit: Option<i32>,

    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub notes: Option<String>,
}

impl UpdateProblemRequest {
    pub fn as_changes(&self) -> ProblemChanges<'_> {
        ProblemChanges {
            name: self.name.as_deref().map(str::trim),
            title: self.title.as_deref().map(str::trim),
            statement_latex: self.statement_latex.as_deref(),
            time_limit_ms: self.time_limit,
            memory_limit_mb: self.memory_limit,
            input_format: self.input_format.as_deref(),
            output_format: self.output_format.as_deref(),
            notes: self.notes.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let request: CreateProblemRequest =
            serde_json::from_str(r#"{"name": "aplusb", "title": "A + B"}"#).unwrap();

        assert_eq!(request.time_limit, 1000);
        assert_eq!(request.memory_limit, 256);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_limits_are_bounded() {
        let request: CreateProblemRequest = serde_json::from_str(
            r#"{"name": "aplusb", "title": "A + B", "timeLimit": 50, "memoryLimit": 4096}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("time_limit"));
        assert!(fields.contains_key("memory_limit"));
    }

    #[test]
    fn test_update_maps_whitelisted_fields() {
        let request: UpdateProblemRequest =
            serde_json::from_str(r#"{"statementLatex": "$a+b$", "timeLimit": 2000}"#).unwrap();
        let changes = request.as_changes();

        assert_eq!(changes.statement_latex, Some("$a+b$"));
        assert_eq!(changes.time_limit_ms, Some(2000));
        assert_eq!(changes.title, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let result = serde_json::from_str::<UpdateProblemRequest>(r#"{"authorId": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_update_has_no_changes() {
        let request: UpdateProblemRequest = serde_json::from_str("{}").unwrap();
        assert!(request.as_changes().is_empty());
    }
}
