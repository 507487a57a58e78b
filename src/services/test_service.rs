//! Test data service: ownership checks around the generation pipeline

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ProblemRepository, TestRepository},
    error::{AppError, AppResult},
    models::{TestCase, TestGroup},
    services::ProblemService,
    testgen::{GenerationOutcome, PgTestStore, ProductionOutcome, TestPipeline},
};

/// Test data service
pub struct TestService;

impl TestService {
    /// Generate test inputs for a problem the caller owns
    pub async fn generate_tests(
        pool: &PgPool,
        pipeline: &TestPipeline,
        problem_id: &Uuid,
        user_id: &Uuid,
        generator_file: Option<&str>,
        test_count: i32,
        group_name: &str,
    ) -> AppResult<GenerationOutcome> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        let generator_file = non_blank(generator_file)
            .ok_or_else(|| AppError::NotFound("Generator file not specified".to_string()))?;

        let store = PgTestStore::new(pool.clone());
        let outcome = pipeline
            .generate(&store, *problem_id, generator_file, test_count, group_name.trim())
            .await?;

        if !outcome.test_cases.is_empty() {
            ProblemRepository::touch(pool, problem_id).await?;
        }

        Ok(outcome)
    }

    /// Fill in expected outputs by running a solution over every test
    pub async fn generate_outputs(
        pool: &PgPool,
        pipeline: &TestPipeline,
        problem_id: &Uuid,
        user_id: &Uuid,
        solution_file: Option<&str>,
    ) -> AppResult<ProductionOutcome> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        let solution_file = non_blank(solution_file)
            .ok_or_else(|| AppError::NotFound("Solution file not specified".to_string()))?;

        let store = PgTestStore::new(pool.clone());
        let outcome = pipeline
            .produce_outputs(&store, *problem_id, solution_file)
            .await?;

        if !outcome.test_cases.is_empty() {
            ProblemRepository::touch(pool, problem_id).await?;
        }

        Ok(outcome)
    }

    /// Groups and cases of a problem
    pub async fn list_tests(
        pool: &PgPool,
        problem_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<(Vec<TestGroup>, Vec<TestCase>)> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        futures::try_join!(
            TestRepository::list_groups(pool, problem_id),
            TestRepository::list_test_cases(pool, problem_id),
        )
    }

    /// Delete one test case
    pub async fn delete_test(
        pool: &PgPool,
        problem_id: &Uuid,
        test_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        if !TestRepository::delete_test_case(pool, problem_id, test_id).await? {
            return Err(AppError::NotFound("Test case not found".to_string()));
        }

        ProblemRepository::touch(pool, problem_id).await?;
        tracing::info!(problem_id = %problem_id, test_case_id = %test_id, "Test case deleted");
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
