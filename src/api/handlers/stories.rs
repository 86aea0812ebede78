//! Story CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::STORY_TAG;
use crate::api::dto::{CreateStoryRequest, ErrorResponse, StoryResponse, UpdateStoryRequest};
use crate::api::handlers::require_id;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn story_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_stories, create_story))
        .routes(routes!(get_story, update_story, delete_story))
}

/// Newest first.
#[utoipa::path(
    get,
    path = "/api/stories",
    tag = STORY_TAG,
    responses(
        (status = 200, description = "All stories, newest first", body = Vec<StoryResponse>)
    )
)]
async fn list_stories(State(state): State<AppState>) -> AppResult<Json<Vec<StoryResponse>>> {
    let stories = state.services.stories.list_stories().await?;
    Ok(Json(stories.into_iter().map(StoryResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/stories",
    tag = STORY_TAG,
    request_body = CreateStoryRequest,
    responses(
        (status = 201, description = "Story created", body = StoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_story(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStoryRequest>,
) -> AppResult<(StatusCode, Json<StoryResponse>)> {
    let story = state.services.stories.create_story(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(StoryResponse::from(story))))
}

#[utoipa::path(
    get,
    path = "/api/stories/{id}",
    tag = STORY_TAG,
    params(("id" = String, Path, description = "Story ID")),
    responses(
        (status = 200, description = "Story found", body = StoryResponse),
        (status = 400, description = "Empty id", body = ErrorResponse),
        (status = 404, description = "Story not found", body = ErrorResponse)
    )
)]
async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StoryResponse>> {
    let story = state.services.stories.get_story(require_id(&id)?).await?;
    Ok(Json(StoryResponse::from(story)))
}

#[utoipa::path(
    put,
    path = "/api/stories/{id}",
    tag = STORY_TAG,
    params(("id" = String, Path, description = "Story ID")),
    request_body = UpdateStoryRequest,
    responses(
        (status = 200, description = "Story updated", body = StoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Story not found", body = ErrorResponse)
    )
)]
async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStoryRequest>,
) -> AppResult<Json<StoryResponse>> {
    let story = state
        .services
        .stories
        .update_story(require_id(&id)?, payload.into())
        .await?;
    Ok(Json(StoryResponse::from(story)))
}

#[utoipa::path(
    delete,
    path = "/api/stories/{id}",
    tag = STORY_TAG,
    params(("id" = String, Path, description = "Story ID")),
    responses(
        (status = 204, description = "Story deleted"),
        (status = 400, description = "Empty id", body = ErrorResponse),
        (status = 404, description = "Story not found", body = ErrorResponse)
    )
)]
async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.stories.delete_story(require_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
