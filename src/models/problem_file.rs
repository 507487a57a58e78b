//! Problem file model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::file_types;

/// Problem file database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemFile {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub file_type: String,
    pub file_name: String,
    pub file_path: String,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Role a problem file plays in the package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Generator,
    Checker,
    Interactor,
    Solution,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => file_types::GENERATOR,
            Self::Checker => file_types::CHECKER,
            Self::Interactor => file_types::INTERACTOR,
            Self::Solution => file_types::SOLUTION,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            file_types::GENERATOR => Ok(Self::Generator),
            file_types::CHECKER => Ok(Self::Checker),
            file_types::INTERACTOR => Ok(Self::Interactor),
            file_types::SOLUTION => Ok(Self::Solution),
            other => Err(format!(
                "Unknown file type '{}', expected one of: {}",
                other,
                file_types::ALL.join(", ")
            )),
        }
    }
}
