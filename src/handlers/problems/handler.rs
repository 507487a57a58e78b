//! Problem handler implementations

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::AppJson,
    middleware::auth::AuthenticatedUser,
    models::FileType,
    services::{file_service::Upload, ExportService, FileService, ProblemService},
    state::AppState,
};

use super::{
    request::{CreateProblemRequest, UpdateProblemRequest},
    response::{
        FileResponse, FilesListResponse, MessageResponse, ProblemDetailResponse, ProblemResponse,
        ProblemsListResponse,
    },
};

/// List the caller's problems
pub async fn list_problems(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ProblemsListResponse>> {
    let problems = ProblemService::list_problems(state.db(), &auth_user.id).await?;
    Ok(Json(ProblemsListResponse { problems }))
}

/// Create a new problem
pub async fn create_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    AppJson(payload): AppJson<CreateProblemRequest>,
) -> AppResult<(StatusCode, Json<ProblemResponse>)> {
    payload.validate()?;

    let problem =
        ProblemService::create_problem(state.db(), &auth_user.id, &payload.as_new_problem()).await?;

    Ok((StatusCode::CREATED, Json(ProblemResponse { problem })))
}

/// Get a problem with its tests and files
pub async fn get_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProblemDetailResponse>> {
    let detail = ProblemService::get_detail(state.db(), &id, &auth_user.id).await?;
    Ok(Json(detail.into()))
}

/// Update a problem
pub async fn update_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateProblemRequest>,
) -> AppResult<Json<ProblemResponse>> {
    payload.validate()?;

    let problem =
        ProblemService::update_problem(state.db(), &id, &auth_user.id, &payload.as_changes()).await?;

    Ok(Json(ProblemResponse { problem }))
}

/// Delete a problem
pub async fn delete_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    ProblemService::delete_problem(
        state.db(),
        &state.config().storage.uploads_path,
        &id,
        &auth_user.id,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Problem deleted successfully".to_string(),
    }))
}

/// Upload a generator, checker, interactor or solution
pub async fn upload_file(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<FileResponse>)> {
    let mut file: Option<(String, Bytes)> = None;
    let mut file_type: Option<String> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, data));
            }
            "fileType" => {
                file_type = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read fileType: {}", e))
                })?);
            }
            "language" => {
                language = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read language: {}", e))
                })?);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let (file_name, data) = file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let file_type: FileType = file_type
        .ok_or_else(|| AppError::Validation("fileType is required".to_string()))?
        .trim()
        .parse()
        .map_err(AppError::Validation)?;

    let file = FileService::upload(
        state.db(),
        &state.config().storage,
        &id,
        &auth_user.id,
        Upload {
            file_name: &file_name,
            file_type,
            language: language.as_deref(),
            bytes: &data,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(FileResponse { file })))
}

/// List a problem's files
pub async fn list_files(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FilesListResponse>> {
    let files = FileService::list_files(state.db(), &id, &auth_user.id).await?;
    Ok(Json(FilesListResponse { files }))
}

/// Delete a problem file
pub async fn delete_file(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    FileService::delete_file(state.db(), &id, &file_id, &auth_user.id).await?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// Download the problem package as a ZIP archive
pub async fn export_problem(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (archive_name, bytes) = ExportService::export_problem(state.db(), &id, &auth_user.id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", archive_name),
        ),
    ];

    Ok((headers, bytes))
}
