//! Problem service

use std::path::Path;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{NewProblem, ProblemChanges, ProblemFileRepository, ProblemRepository, TestRepository},
    error::{AppError, AppResult},
    models::{Problem, ProblemFile, TestCase, TestGroup},
};

/// A problem with everything attached to it
#[derive(Debug)]
pub struct ProblemDetail {
    pub problem: Problem,
    pub test_groups: Vec<TestGroup>,
    pub test_cases: Vec<TestCase>,
    pub files: Vec<ProblemFile>,
}

/// Problem service for business logic
pub struct ProblemService;

impl ProblemService {
    /// Load a problem the caller owns.
    ///
    /// Problems owned by someone else are reported as missing.
    pub async fn require_owned(pool: &PgPool, id: &Uuid, user_id: &Uuid) -> AppResult<Problem> {
        ProblemRepository::find_owned(pool, id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))
    }

    /// Create a new problem
    pub async fn create_problem(
        pool: &PgPool,
        author_id: &Uuid,
        new_problem: &NewProblem<'_>,
    ) -> AppResult<Problem> {
        let problem = ProblemRepository::create(pool, author_id, new_problem).await?;
        tracing::info!(problem_id = %problem.id, name = %problem.name, "Problem created");
        Ok(problem)
    }

    /// List the caller's problems
    pub async fn list_problems(pool: &PgPool, author_id: &Uuid) -> AppResult<Vec<Problem>> {
        ProblemRepository::list_by_author(pool, author_id).await
    }

    /// Problem with its groups, cases and files
    pub async fn get_detail(pool: &PgPool, id: &Uuid, user_id: &Uuid) -> AppResult<ProblemDetail> {
        let problem = Self::require_owned(pool, id, user_id).await?;

        let (test_groups, test_cases, files) = futures::try_join!(
            TestRepository::list_groups(pool, id),
            TestRepository::list_test_cases(pool, id),
            ProblemFileRepository::list_for_problem(pool, id),
        )?;

        Ok(ProblemDetail {
            problem,
            test_groups,
            test_cases,
            files,
        })
    }

    /// Apply a partial update
    pub async fn update_problem(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
        changes: &ProblemChanges<'_>,
    ) -> AppResult<Problem> {
        if changes.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        Self::require_owned(pool, id, user_id).await?;
        ProblemRepository::update(pool, id, changes).await
    }

    /// Delete a problem and its stored files
    pub async fn delete_problem(
        pool: &PgPool,
        uploads_path: &Path,
        id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        Self::require_owned(pool, id, user_id).await?;
        ProblemRepository::delete(pool, id).await?;

        let dir = uploads_path.join(id.to_string());
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(problem_id = %id, dir = %dir.display(), error = %e, "Failed to remove problem files");
            }
        }

        tracing::info!(problem_id = %id, "Problem deleted");
        Ok(())
    }
}
