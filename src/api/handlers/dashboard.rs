use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::User,
    error::Result,
    service::Dashboard,
};

pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<User> {
    Json(current_user.user)
}

/// Role-specific landing view for the signed-in user.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Dashboard>> {
    let dashboard = state.service_context.directory
        .dashboard(&current_user.user, Utc::now())
        .await?;
    Ok(Json(dashboard))
}
