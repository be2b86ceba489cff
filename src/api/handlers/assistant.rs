use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    assistant::AssistantContext,
    domain::{Club, Event},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 1000, message = "Ask a question"))]
    pub query: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRequest {
    pub club_id: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub keywords: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct DescriptionDraft {
    pub description: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AssistantReply>> {
    request.validate()?;

    let store = &state.service_context.store;
    let context = AssistantContext::new(
        store.get_all::<Club>().await?,
        store.get_all::<Event>().await?,
    );

    let answer = state.service_context.assistant
        .answer(request.query.trim(), &context)
        .await;
    Ok(Json(AssistantReply { answer }))
}

/// Drafts a description for a club the caller manages. Nothing is saved.
pub async fn describe(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<DescribeRequest>,
) -> Result<Json<DescriptionDraft>> {
    request.validate()?;

    let club = state.service_context.membership.get_club(&request.club_id).await?;
    if !club.can_be_managed_by(&current_user.actor()) {
        return Err(AppError::forbidden("Only the club lead can edit this club"));
    }

    let description = state.service_context.assistant
        .describe_club(&club.name, &club.category, &request.keywords)
        .await;
    Ok(Json(DescriptionDraft { description }))
}
