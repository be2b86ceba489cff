use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Club, Event, EventWindow, RosterStanding, Transition},
    error::Result,
    service::{ClubFilter, ClubRoster, NewClub},
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProposeClubRequest {
    #[validate(length(min = 1, max = 100, message = "Club name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDescriptionRequest {
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDetail {
    pub club: Club,
    pub standing: RosterStanding,
    pub upcoming_events: Vec<Event>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(filter): Query<ClubFilter>,
) -> Result<Json<Vec<Club>>> {
    let clubs = state.service_context.directory
        .search_clubs(&current_user.actor(), &filter)
        .await?;
    Ok(Json(clubs))
}

pub async fn categories(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>> {
    let categories = state.service_context.directory
        .categories(&current_user.actor())
        .await?;
    Ok(Json(categories))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ClubDetail>> {
    let actor = current_user.actor();
    let club = state.service_context.directory.club_detail(&actor, &id).await?;

    let upcoming_events = state.service_context.events
        .list_events(&actor, EventWindow::Upcoming, Utc::now())
        .await?
        .into_iter()
        .filter(|e| e.club_id == club.id)
        .collect();

    Ok(Json(ClubDetail {
        standing: club.standing_of(&actor.user_id),
        club,
        upcoming_events,
    }))
}

pub async fn propose(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<ProposeClubRequest>,
) -> Result<(StatusCode, Json<Club>)> {
    request.validate()?;

    let club = state.service_context.membership
        .propose_club(
            &current_user.actor(),
            NewClub {
                name: request.name,
                description: request.description,
                category: request.category,
                lead_id: None,
                image: request.image,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn update_description(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDescriptionRequest>,
) -> Result<Json<Club>> {
    request.validate()?;

    let club = state.service_context.membership
        .update_description(&current_user.actor(), &id, request.description)
        .await?;
    Ok(Json(club))
}

pub async fn join(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Transition<Club>>> {
    let outcome = state.service_context.membership
        .request_join(&current_user.actor(), &id)
        .await?;
    Ok(Json(outcome))
}

pub async fn approve_member(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Transition<Club>>> {
    let outcome = state.service_context.membership
        .approve_member(&current_user.actor(), &id, &user_id)
        .await?;
    Ok(Json(outcome))
}

pub async fn reject_member(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<Transition<Club>>> {
    let outcome = state.service_context.membership
        .reject_member(&current_user.actor(), &id, &user_id)
        .await?;
    Ok(Json(outcome))
}

pub async fn roster(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ClubRoster>> {
    let roster = state.service_context.membership
        .roster(&current_user.actor(), &id)
        .await?;
    Ok(Json(roster))
}
