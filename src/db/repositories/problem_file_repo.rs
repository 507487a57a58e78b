//! Problem file repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{FileType, ProblemFile},
};

/// Repository for problem file database operations
pub struct ProblemFileRepository;

impl ProblemFileRepository {
    /// Record an uploaded file
    pub async fn create(
        pool: &PgPool,
        problem_id: &Uuid,
        file_type: FileType,
        file_name: &str,
        file_path: &str,
        language: Option<&str>,
    ) -> AppResult<ProblemFile> {
        let file = sqlx::query_as::<_, ProblemFile>(
            r#"
            INSERT INTO problem_files (problem_id, file_type, file_name, file_path, language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(problem_id)
        .bind(file_type.as_str())
        .bind(file_name)
        .bind(file_path)
        .bind(language)
        .fetch_one(pool)
        .await?;

        Ok(file)
    }

    /// Find a file by role and name; the newest upload wins when names repeat
    pub async fn find_by_name(
        pool: &PgPool,
        problem_id: &Uuid,
        file_type: FileType,
        file_name: &str,
    ) -> AppResult<Option<ProblemFile>> {
        let file = sqlx::query_as::<_, ProblemFile>(
            r#"
            SELECT * FROM problem_files
            WHERE problem_id = $1 AND file_type = $2 AND file_name = $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(problem_id)
        .bind(file_type.as_str())
        .bind(file_name)
        .fetch_optional(pool)
        .await?;

        Ok(file)
    }

    /// Find a file by ID within a problem
    pub async fn find_by_id(
        pool: &PgPool,
        problem_id: &Uuid,
        id: &Uuid,
    ) -> AppResult<Option<ProblemFile>> {
        let file = sqlx::query_as::<_, ProblemFile>(
            r#"SELECT * FROM problem_files WHERE id = $1 AND problem_id = $2"#,
        )
        .bind(id)
        .bind(problem_id)
        .fetch_optional(pool)
        .await?;

        Ok(file)
    }

    /// List all files of a problem grouped by role
    pub async fn list_for_problem(pool: &PgPool, problem_id: &Uuid) -> AppResult<Vec<ProblemFile>> {
        let files = sqlx::query_as::<_, ProblemFile>(
            r#"SELECT * FROM problem_files WHERE problem_id = $1 ORDER BY file_type, created_at"#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(files)
    }

    /// Delete a file record
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM problem_files WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
