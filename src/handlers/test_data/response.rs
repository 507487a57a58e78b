//! Test data response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{TestCase, TestGroup},
    testgen::SkippedRun,
};

/// Result of a generation batch
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestsResponse {
    pub message: String,
    pub test_cases: Vec<TestCase>,
    pub test_group_id: Option<Uuid>,
    /// Indices that were skipped, with the reason
    pub failures: Vec<SkippedRun>,
}

/// Result of an output production batch
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutputsResponse {
    pub message: String,
    pub test_cases: Vec<TestCase>,
    pub failures: Vec<SkippedRun>,
}

/// All tests of a problem
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestsListResponse {
    pub test_groups: Vec<TestGroup>,
    pub test_cases: Vec<TestCase>,
}
