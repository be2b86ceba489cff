use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Event, EventWindow, Transition, User},
    error::Result,
    service::NewEvent,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub when: EventWindow,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub club_id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>> {
    let events = state.service_context.events
        .list_events(&current_user.actor(), params.when, Utc::now())
        .await?;
    Ok(Json(events))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let event = state.service_context.events
        .get_event(&current_user.actor(), &id)
        .await?;
    Ok(Json(event))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    request.validate()?;

    let event = state.service_context.events
        .create_event(
            &current_user.actor(),
            NewEvent {
                club_id: request.club_id,
                title: request.title,
                description: request.description,
                date: request.date,
                time: request.time,
                location: request.location,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Transition<Event>>> {
    let outcome = state.service_context.events
        .register_attendance(&current_user.actor(), &id)
        .await?;
    Ok(Json(outcome))
}

pub async fn attendees(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>> {
    let profiles = state.service_context.events
        .list_attendee_profiles(&current_user.actor(), &id)
        .await?;
    Ok(Json(profiles))
}
