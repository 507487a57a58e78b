//! Test group and test case repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{TestCase, TestGroup},
};

/// Repository for test group and test case database operations
pub struct TestRepository;

impl TestRepository {
    /// Find a group by its per-problem name
    pub async fn find_group_by_name(
        pool: &PgPool,
        problem_id: &Uuid,
        name: &str,
    ) -> AppResult<Option<TestGroup>> {
        let group = sqlx::query_as::<_, TestGroup>(
            r#"SELECT * FROM test_groups WHERE problem_id = $1 AND name = $2"#,
        )
        .bind(problem_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(group)
    }

    /// Insert a group unless one with the same name already exists.
    ///
    /// Returns `None` when another request created it first.
    pub async fn create_group(
        pool: &PgPool,
        problem_id: &Uuid,
        name: &str,
        points: i32,
    ) -> AppResult<Option<TestGroup>> {
        let group = sqlx::query_as::<_, TestGroup>(
            r#"
            INSERT INTO test_groups (problem_id, name, points)
            VALUES ($1, $2, $3)
            ON CONFLICT (problem_id, name) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(problem_id)
        .bind(name)
        .bind(points)
        .fetch_optional(pool)
        .await?;

        Ok(group)
    }

    /// List groups of a problem in creation order
    pub async fn list_groups(pool: &PgPool, problem_id: &Uuid) -> AppResult<Vec<TestGroup>> {
        let groups = sqlx::query_as::<_, TestGroup>(
            r#"SELECT * FROM test_groups WHERE problem_id = $1 ORDER BY created_at, name"#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(groups)
    }

    /// One past the highest test index used in a group (1 for an empty group)
    pub async fn next_test_index(pool: &PgPool, group_id: &Uuid) -> AppResult<i32> {
        let next: i32 = sqlx::query_scalar(
            r#"SELECT COALESCE(MAX(test_index), 0) + 1 FROM test_cases WHERE test_group_id = $1"#,
        )
        .bind(group_id)
        .fetch_one(pool)
        .await?;

        Ok(next)
    }

    /// Create test case with empty output
    pub async fn create_test_case(
        pool: &PgPool,
        problem_id: &Uuid,
        group_id: &Uuid,
        test_index: i32,
        input_data: &str,
    ) -> AppResult<TestCase> {
        let test_case = sqlx::query_as::<_, TestCase>(
            r#"
            INSERT INTO test_cases (problem_id, test_group_id, test_index, input_data, output_data)
            VALUES ($1, $2, $3, $4, '')
            RETURNING *
            "#,
        )
        .bind(problem_id)
        .bind(group_id)
        .bind(test_index)
        .bind(input_data)
        .fetch_one(pool)
        .await?;

        Ok(test_case)
    }

    /// Get test cases for problem ordered by group and index
    pub async fn list_test_cases(pool: &PgPool, problem_id: &Uuid) -> AppResult<Vec<TestCase>> {
        let test_cases = sqlx::query_as::<_, TestCase>(
            r#"
            SELECT * FROM test_cases
            WHERE problem_id = $1
            ORDER BY test_group_id, test_index
            "#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(test_cases)
    }

    /// Store the produced output of a test case
    pub async fn update_output(pool: &PgPool, id: &Uuid, output_data: &str) -> AppResult<TestCase> {
        let test_case = sqlx::query_as::<_, TestCase>(
            r#"
            UPDATE test_cases
            SET output_data = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(output_data)
        .fetch_one(pool)
        .await?;

        Ok(test_case)
    }

    /// Delete a test case belonging to `problem_id`; returns whether a row went away
    pub async fn delete_test_case(pool: &PgPool, problem_id: &Uuid, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM test_cases WHERE id = $1 AND problem_id = $2"#)
            .bind(id)
            .bind(problem_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
