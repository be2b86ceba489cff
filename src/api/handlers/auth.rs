use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::{AuthService, SignUp, SignedIn, SESSION_COOKIE},
    domain::{User, UserRole},
    error::Result,
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DemoLoginRequest {
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub message: String,
}

fn respond(
    state: &AppState,
    jar: CookieJar,
    signed_in: SignedIn,
    message: &str,
) -> (CookieJar, Json<SessionResponse>) {
    let cookie = state.service_context.auth_service.create_session_cookie(&signed_in.token);
    (
        jar.add(cookie),
        Json(SessionResponse {
            user: signed_in.user,
            message: message.to_string(),
        }),
    )
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate()?;

    let signed_in = state.service_context.auth_service
        .sign_in(&req.email, &req.password)
        .await?;

    Ok(respond(&state, jar, signed_in, "Login successful"))
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignUp>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let signed_in = state.service_context.auth_service.sign_up(req).await?;

    let (jar, body) = respond(&state, jar, signed_in, "Account created");
    Ok((StatusCode::CREATED, jar, body))
}

pub async fn demo(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<DemoLoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let signed_in = state.service_context.auth_service
        .login_with_demo(req.role)
        .await?;

    Ok(respond(&state, jar, signed_in, "Demo login successful"))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .sign_out(session_cookie.value())
            .await;
    }

    Ok((jar.add(AuthService::create_logout_cookie()), StatusCode::NO_CONTENT))
}
