//! Problem repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::Problem};

/// Column values for a new problem
#[derive(Debug)]
pub struct NewProblem<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub statement_latex: Option<&'a str>,
    pub time_limit_ms: i32,
    pub memory_limit_mb: i32,
    pub input_format: Option<&'a str>,
    pub output_format: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Columns that may be changed after creation; `None` leaves a column as is
#[derive(Debug, Default)]
pub struct ProblemChanges<'a> {
    pub name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub statement_latex: Option<&'a str>,
    pub time_limit_ms: Option<i32>,
    pub memory_limit_mb: Option<i32>,
    pub input_format: Option<&'a str>,
    pub output_format: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl ProblemChanges<'_> {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.statement_latex.is_none()
            && self.time_limit_ms.is_none()
            && self.memory_limit_mb.is_none()
            && self.input_format.is_none()
            && self.output_format.is_none()
            && self.notes.is_none()
    }
}

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem
    pub async fn create(
        pool: &PgPool,
        author_id: &Uuid,
        problem: &NewProblem<'_>,
    ) -> AppResult<Problem> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (
                author_id, name, title, statement_latex, time_limit_ms,
                memory_limit_mb, input_format, output_format, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(author_id)
        .bind(problem.name)
        .bind(problem.title)
        .bind(problem.statement_latex)
        .bind(problem.time_limit_ms)
        .bind(problem.memory_limit_mb)
        .bind(problem.input_format)
        .bind(problem.output_format)
        .bind(problem.notes)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Find a problem owned by `author_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: &Uuid,
        author_id: &Uuid,
    ) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT * FROM problems WHERE id = $1 AND author_id = $2"#,
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(pool)
        .await?;

        Ok(problem)
    }

    /// List an author's problems, most recently updated first
    pub async fn list_by_author(pool: &PgPool, author_id: &Uuid) -> AppResult<Vec<Problem>> {
        let problems = sqlx::query_as::<_, Problem>(
            r#"SELECT * FROM problems WHERE author_id = $1 ORDER BY updated_at DESC"#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    /// Update problem
    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        changes: &ProblemChanges<'_>,
    ) -> AppResult<Problem> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"
            UPDATE problems
            SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                statement_latex = COALESCE($4, statement_latex),
                time_limit_ms = COALESCE($5, time_limit_ms),
                memory_limit_mb = COALESCE($6, memory_limit_mb),
                input_format = COALESCE($7, input_format),
                output_format = COALESCE($8, output_format),
                notes = COALESCE($9, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.title)
        .bind(changes.statement_latex)
        .bind(changes.time_limit_ms)
        .bind(changes.memory_limit_mb)
        .bind(changes.input_format)
        .bind(changes.output_format)
        .bind(changes.notes)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Delete problem; groups, cases and files go with it
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM problems WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Bump `updated_at` after a change to a child row
    pub async fn touch(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"UPDATE problems SET updated_at = NOW() WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_changes() {
        assert!(ProblemChanges::default().is_empty());

        let changes = ProblemChanges {
            time_limit_ms: Some(2000),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
