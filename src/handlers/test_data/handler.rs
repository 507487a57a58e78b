//! Test data handler implementations

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{problems::MessageResponse, AppJson},
    middleware::auth::AuthenticatedUser,
    services::TestService,
    state::AppState,
};

use super::{
    request::{GenerateOutputsRequest, GenerateTestsRequest},
    response::{GenerateOutputsResponse, GenerateTestsResponse, TestsListResponse},
};

/// Run a generator to create test inputs
pub async fn generate_tests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<GenerateTestsRequest>,
) -> AppResult<Json<GenerateTestsResponse>> {
    payload.validate()?;

    let outcome = TestService::generate_tests(
        state.db(),
        &state.pipeline(),
        &id,
        &auth_user.id,
        payload.generator_file.as_deref(),
        payload.test_count,
        &payload.group_name,
    )
    .await?;

    Ok(Json(GenerateTestsResponse {
        message: format!("Generated {} test case(s)", outcome.test_cases.len()),
        test_cases: outcome.test_cases,
        test_group_id: outcome.test_group_id,
        failures: outcome.skipped,
    }))
}

/// Run a solution to fill in expected outputs
pub async fn generate_outputs(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<GenerateOutputsRequest>,
) -> AppResult<Json<GenerateOutputsResponse>> {
    let outcome = TestService::generate_outputs(
        state.db(),
        &state.pipeline(),
        &id,
        &auth_user.id,
        payload.solution_file.as_deref(),
    )
    .await?;

    Ok(Json(GenerateOutputsResponse {
        message: format!("Generated outputs for {} test case(s)", outcome.test_cases.len()),
        test_cases: outcome.test_cases,
        failures: outcome.skipped,
    }))
}

/// List groups and cases
pub async fn list_tests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TestsListResponse>> {
    let (test_groups, test_cases) = TestService::list_tests(state.db(), &id, &auth_user.id).await?;
    Ok(Json(TestsListResponse {
        test_groups,
        test_cases,
    }))
}

/// Delete one test case
pub async fn delete_test(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, test_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    TestService::delete_test(state.db(), &id, &test_id, &auth_user.id).await?;

    Ok(Json(MessageResponse {
        message: "Test case deleted successfully".to_string(),
    }))
}
