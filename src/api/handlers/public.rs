use axum::{extract::State, Json};

use crate::{api::state::AppState, error::Result};

/// Clubs that can still take a faculty mentor, for the admin sign-up form.
pub async fn mentorships(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let available = state.service_context.directory.available_mentorships().await?;
    Ok(Json(available))
}
