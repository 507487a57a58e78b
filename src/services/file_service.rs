//! Problem file storage

use std::path::{Path, PathBuf};

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::StorageConfig,
    constants::ALLOWED_UPLOAD_EXTENSIONS,
    db::repositories::{ProblemFileRepository, ProblemRepository},
    error::{AppError, AppResult},
    models::{FileType, ProblemFile},
    services::ProblemService,
    testgen::compiler::executable_path,
    utils::validation::{allowed_extension, infer_language, sanitize_file_name},
};

/// One file received from a multipart upload
#[derive(Debug)]
pub struct Upload<'a> {
    pub file_name: &'a str,
    pub file_type: FileType,
    pub language: Option<&'a str>,
    pub bytes: &'a [u8],
}

/// File service for uploads and their on-disk copies
pub struct FileService;

impl FileService {
    /// Store an uploaded file under `<uploads>/<problem id>/` and record it
    pub async fn upload(
        pool: &PgPool,
        storage: &StorageConfig,
        problem_id: &Uuid,
        user_id: &Uuid,
        upload: Upload<'_>,
    ) -> AppResult<ProblemFile> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        let (file_name, extension) =
            check_upload(upload.file_name, upload.bytes.len(), storage.max_upload_bytes)?;
        let language = upload
            .language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| infer_language(&extension).to_string());

        let dir = storage.uploads_path.join(problem_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        // Programs are later started from their own directory, so keep an absolute path
        let dir = tokio::fs::canonicalize(&dir).await?;
        let stored = dir.join(format!("{}.{}", Uuid::new_v4(), extension));
        tokio::fs::write(&stored, upload.bytes).await?;

        let file = match ProblemFileRepository::create(
            pool,
            problem_id,
            upload.file_type,
            &file_name,
            &stored.to_string_lossy(),
            Some(&language),
        )
        .await
        {
            Ok(file) => file,
            Err(e) => {
                remove_artifacts(&stored).await;
                return Err(e);
            }
        };

        ProblemRepository::touch(pool, problem_id).await?;

        tracing::info!(
            problem_id = %problem_id,
            file_id = %file.id,
            file_type = %upload.file_type,
            file_name = %file.file_name,
            bytes = upload.bytes.len(),
            "File uploaded"
        );

        Ok(file)
    }

    /// List a problem's files
    pub async fn list_files(pool: &PgPool, problem_id: &Uuid, user_id: &Uuid) -> AppResult<Vec<ProblemFile>> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;
        ProblemFileRepository::list_for_problem(pool, problem_id).await
    }

    /// Delete a file record with its stored source and any compiled binary
    pub async fn delete_file(
        pool: &PgPool,
        problem_id: &Uuid,
        file_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        ProblemService::require_owned(pool, problem_id, user_id).await?;

        let file = ProblemFileRepository::find_by_id(pool, problem_id, file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        ProblemFileRepository::delete(pool, &file.id).await?;
        remove_artifacts(Path::new(&file.file_path)).await;
        ProblemRepository::touch(pool, problem_id).await?;

        tracing::info!(problem_id = %problem_id, file_id = %file_id, "File deleted");
        Ok(())
    }
}

/// Validate an upload's name and size; returns the sanitized name and extension
fn check_upload(name: &str, size: usize, max_bytes: usize) -> AppResult<(String, String)> {
    if size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "File exceeds the maximum size of {} bytes",
            max_bytes
        )));
    }

    let file_name = sanitize_file_name(name)
        .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;
    let extension = allowed_extension(&file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "File type not allowed; accepted extensions: {}",
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        ))
    })?;

    Ok((file_name, extension))
}

/// Remove a stored source and the binary built from it, if any
async fn remove_artifacts(source: &Path) {
    let paths: [PathBuf; 2] = [source.to_path_buf(), executable_path(source)];
    for path in paths {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed stored file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_upload_accepts_sources() {
        let (name, extension) = check_upload("my gen.cpp", 10, 100).unwrap();
        assert_eq!(name, "my_gen.cpp");
        assert_eq!(extension, "cpp");
    }

    #[test]
    fn test_check_upload_rejects() {
        assert!(matches!(check_upload("gen.cpp", 0, 100), Err(AppError::Validation(_))));
        assert!(matches!(check_upload("gen.cpp", 101, 100), Err(AppError::Validation(_))));
        assert!(matches!(check_upload("gen.rb", 10, 100), Err(AppError::Validation(_))));
        assert!(matches!(check_upload("../", 10, 100), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_artifacts_deletes_source_and_binary() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a1.cpp");
        std::fs::write(&source, "int main() {}").unwrap();
        std::fs::write(dir.path().join("a1.exe"), "ELF").unwrap();
        std::fs::write(dir.path().join("other.cpp"), "int main() {}").unwrap();

        remove_artifacts(&source).await;

        assert!(!source.exists());
        assert!(!dir.path().join("a1.exe").exists());
        assert!(dir.path().join("other.cpp").exists());
    }

    #[tokio::test]
    async fn test_remove_artifacts_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        remove_artifacts(&dir.path().join("gone.py")).await;
    }
}
