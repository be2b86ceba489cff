use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::{Actor, User},
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        self.user.actor()
    }
}

async fn resolve_user(state: &AppState, jar: &CookieJar) -> Result<User, AppError> {
    let session_cookie = jar
        .get(SESSION_COOKIE)
        .ok_or(AppError::Unauthorized)?;

    state.service_context.auth_service
        .current_user(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, &jar).await?;

    // Insert current user into request extensions
    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, &jar).await?;

    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, "Non-admin request to admin surface");
        return Err(AppError::forbidden("Admin access required"));
    }

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}
