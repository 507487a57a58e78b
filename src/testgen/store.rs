//! Persistence seam used by the pipeline

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ProblemFileRepository, TestRepository},
    error::{AppError, AppResult},
    models::{FileType, ProblemFile, TestCase, TestGroup},
};

/// Records the pipeline reads and writes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestStore: Send + Sync {
    /// Look up a problem file by role and name
    async fn find_problem_file(
        &self,
        problem_id: Uuid,
        file_type: FileType,
        file_name: &str,
    ) -> AppResult<Option<ProblemFile>>;

    /// Return the named group, creating it with `points` if it is new
    async fn find_or_create_group(
        &self,
        problem_id: Uuid,
        name: &str,
        points: i32,
    ) -> AppResult<TestGroup>;

    /// First unused test index in a group
    async fn next_test_index(&self, group_id: Uuid) -> AppResult<i32>;

    /// Store a generated case with empty output
    async fn insert_test_case(
        &self,
        problem_id: Uuid,
        group_id: Uuid,
        test_index: i32,
        input_data: &str,
    ) -> AppResult<TestCase>;

    /// All cases of a problem ordered by group and index
    async fn list_test_cases(&self, problem_id: Uuid) -> AppResult<Vec<TestCase>>;

    /// Replace the output of an existing case
    async fn update_test_output(&self, test_case_id: Uuid, output_data: &str) -> AppResult<TestCase>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgTestStore {
    pool: PgPool,
}

impl PgTestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestStore for PgTestStore {
    async fn find_problem_file(
        &self,
        problem_id: Uuid,
        file_type: FileType,
        file_name: &str,
    ) -> AppResult<Option<ProblemFile>> {
        ProblemFileRepository::find_by_name(&self.pool, &problem_id, file_type, file_name).await
    }

    async fn find_or_create_group(
        &self,
        problem_id: Uuid,
        name: &str,
        points: i32,
    ) -> AppResult<TestGroup> {
        if let Some(group) = TestRepository::find_group_by_name(&self.pool, &problem_id, name).await? {
            return Ok(group);
        }

        if let Some(group) = TestRepository::create_group(&self.pool, &problem_id, name, points).await? {
            tracing::info!(problem_id = %problem_id, group = %name, "Created test group");
            return Ok(group);
        }

        // Lost a creation race; the winner's row is there now
        TestRepository::find_group_by_name(&self.pool, &problem_id, name)
            .await?
            .ok_or_else(|| AppError::Database(format!("Test group '{}' vanished after insert", name)))
    }

    async fn next_test_index(&self, group_id: Uuid) -> AppResult<i32> {
        TestRepository::next_test_index(&self.pool, &group_id).await
    }

    async fn insert_test_case(
        &self,
        problem_id: Uuid,
        group_id: Uuid,
        test_index: i32,
        input_data: &str,
    ) -> AppResult<TestCase> {
        TestRepository::create_test_case(&self.pool, &problem_id, &group_id, test_index, input_data)
            .await
    }

    async fn list_test_cases(&self, problem_id: Uuid) -> AppResult<Vec<TestCase>> {
        TestRepository::list_test_cases(&self.pool, &problem_id).await
    }

    async fn update_test_output(&self, test_case_id: Uuid, output_data: &str) -> AppResult<TestCase> {
        TestRepository::update_output(&self.pool, &test_case_id, output_data).await
    }
}
