use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Club, Transition, User},
    error::Result,
    service::NewClub,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 100, message = "Club name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "A lead must be assigned"))]
    pub lead_id: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserSearch {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 2000, message = "Announcement cannot be empty"))]
    pub message: String,
}

pub async fn pending_clubs(State(state): State<AppState>) -> Result<Json<Vec<Club>>> {
    Ok(Json(state.service_context.directory.pending_clubs().await?))
}

pub async fn approve_club(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Transition<Club>>> {
    let outcome = state.service_context.membership
        .approve_club_proposal(&current_user.actor(), &id)
        .await?;
    Ok(Json(outcome))
}

pub async fn reject_club(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Club>> {
    let removed = state.service_context.membership
        .reject_club_proposal(&current_user.actor(), &id)
        .await?;
    Ok(Json(removed))
}

pub async fn create_club(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<Club>)> {
    request.validate()?;

    let club = state.service_context.membership
        .propose_club(
            &current_user.actor(),
            NewClub {
                name: request.name,
                description: request.description,
                category: request.category,
                lead_id: Some(request.lead_id),
                image: request.image,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<UserSearch>,
) -> Result<Json<Vec<User>>> {
    let users = state.service_context.directory
        .search_users(&current_user.actor(), params.search.as_deref())
        .await?;
    Ok(Json(users))
}

/// Accepted and logged only; there is no delivery channel behind it.
pub async fn announce(
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<AnnouncementRequest>,
) -> Result<StatusCode> {
    request.validate()?;

    tracing::info!(
        admin_id = %current_user.user.id,
        "Announcement broadcast: {}",
        request.message
    );
    Ok(StatusCode::ACCEPTED)
}
