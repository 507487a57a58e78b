//! Problem response DTOs

use serde::Serialize;

use crate::{
    models::{Problem, ProblemFile, TestCase, TestGroup},
    services::problem_service::ProblemDetail,
};

/// Single problem
#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub problem: Problem,
}

/// Caller's problems
#[derive(Debug, Serialize)]
pub struct ProblemsListResponse {
    pub problems: Vec<Problem>,
}

/// Problem with its tests and files
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetailResponse {
    pub problem: Problem,
    pub test_groups: Vec<TestGroup>,
    pub test_cases: Vec<TestCase>,
    pub files: Vec<ProblemFile>,
}

impl From<ProblemDetail> for ProblemDetailResponse {
    fn from(detail: ProblemDetail) -> Self {
        Self {
            problem: detail.problem,
            test_groups: detail.test_groups,
            test_cases: detail.test_cases,
            files: detail.files,
        }
    }
}

/// Uploaded file
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub file: ProblemFile,
}

/// Files of a problem
#[derive(Debug, Serialize)]
pub struct FilesListResponse {
    pub files: Vec<ProblemFile>,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
