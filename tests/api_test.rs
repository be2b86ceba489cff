use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uniclubs::{
    api::create_app,
    assistant::{AssistantGateway, MISSING_KEY_REPLY},
    auth::AuthService,
    config::Settings,
    repository::RecordStore,
    seed,
    service::ServiceContext,
};

async fn app() -> anyhow::Result<Router> {
    let settings = Settings::default();
    let store = RecordStore::in_memory();
    store.seed(&seed::users(), &seed::clubs(), &seed::events(Utc::now())).await?;

    let auth_service = Arc::new(AuthService::new(store.clone(), settings.auth.clone()));
    for user in seed::users() {
        auth_service.set_password(&user, seed::SEED_PASSWORD).await?;
    }

    let context = Arc::new(ServiceContext::new(
        store,
        auth_service,
        Arc::new(AssistantGateway::unconfigured()),
    ));
    Ok(create_app(context, Arc::new(settings)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Option<String>, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, set_cookie, json))
}

async fn login(app: &Router, email: &str) -> anyhow::Result<String> {
    let (status, cookie, _) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": seed::SEED_PASSWORD })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(cookie.expect("session cookie set"))
}

#[tokio::test]
async fn test_health_and_auth_gate() -> anyhow::Result<()> {
    let app = app().await?;

    let (status, _, body) = send(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (_, _, info) = send(&app, Method::GET, "/", None, None).await?;
    assert_eq!(info["features"]["assistant"], false);
    assert_eq!(info["features"]["demoLogin"], true);

    let (status, _, _) = send(&app, Method::GET, "/api/clubs", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::GET, "/api/me", Some("session=bogus"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_student_join_and_lead_approval() -> anyhow::Result<()> {
    let app = app().await?;
    let david = login(&app, "david@uni.edu").await?;
    let bob = login(&app, "bob@uni.edu").await?;

    let (status, _, me) = send(&app, Method::GET, "/api/me", Some(david.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], "u4");

    // Students only see approved clubs
    let (_, _, clubs) = send(&app, Method::GET, "/api/clubs", Some(david.as_str()), None).await?;
    assert_eq!(clubs.as_array().map(Vec::len), Some(3));

    // Business only appears through the pending c4
    let (_, _, categories) = send(&app, Method::GET, "/api/clubs/categories", Some(david.as_str()), None).await?;
    assert_eq!(categories, json!(["Arts", "Dance", "Technology"]));

    let (status, _, outcome) = send(&app, Method::POST, "/api/clubs/c2/join", Some(david.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "applied");
    assert_eq!(outcome["record"]["pendingMembers"], json!(["u4"]));

    let (status, _, _) = send(&app, Method::POST, "/api/clubs/c1/members/u4/approve", Some(david.as_str()), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, outcome) = send(&app, Method::POST, "/api/clubs/c1/members/u4/approve", Some(bob.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["record"]["members"], json!(["u1", "u2", "u4"]));

    let (_, _, detail) = send(&app, Method::GET, "/api/clubs/c1", Some(david.as_str()), None).await?;
    assert_eq!(detail["standing"], "member");

    let (_, _, dashboard) = send(&app, Method::GET, "/api/dashboard", Some(david.as_str()), None).await?;
    assert_eq!(dashboard["role"], "STUDENT");
    assert_eq!(dashboard["myClubs"][0]["id"], "c1");

    Ok(())
}

#[tokio::test]
async fn test_event_posting_and_registration() -> anyhow::Result<()> {
    let app = app().await?;
    let alice = login(&app, "alice@uni.edu").await?;
    let bob = login(&app, "bob@uni.edu").await?;
    let date = (Utc::now() + chrono::Duration::days(3)).date_naive().to_string();
    let event = json!({
        "title": "Lightning Talks",
        "description": "Five minutes each.",
        "date": date,
        "time": "17:00:00",
        "location": "Room 101"
    });

    let (status, _, _) = send(&app, Method::POST, "/api/events", Some(alice.as_str()), Some(event.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(bob.as_str()),
        Some(json!({ "title": "", "date": date, "time": "17:00:00", "location": "Room 101" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, created) = send(&app, Method::POST, "/api/events", Some(bob.as_str()), Some(event)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["clubId"], "c1");
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let uri = format!("/api/events/{}/register", id);
    let (_, _, first) = send(&app, Method::POST, &uri, Some(alice.as_str()), None).await?;
    let (_, _, second) = send(&app, Method::POST, &uri, Some(alice.as_str()), None).await?;
    assert_eq!(first["outcome"], "applied");
    assert_eq!(second["outcome"], "unchanged");
    assert_eq!(second["record"]["attendees"], json!(["u1"]));

    let attendees = format!("/api/events/{}/attendees", id);
    let (status, _, _) = send(&app, Method::GET, &attendees, Some(alice.as_str()), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, _, profiles) = send(&app, Method::GET, &attendees, Some(bob.as_str()), None).await?;
    assert_eq!(profiles[0]["email"], "alice@uni.edu");

    let (_, _, upcoming) = send(&app, Method::GET, "/api/events?when=upcoming", Some(alice.as_str()), None).await?;
    assert_eq!(upcoming.as_array().map(Vec::len), Some(3));

    Ok(())
}

#[tokio::test]
async fn test_admin_surface() -> anyhow::Result<()> {
    let app = app().await?;
    let carol = login(&app, "carol@uni.edu").await?;
    let alice = login(&app, "alice@uni.edu").await?;

    let (status, _, _) = send(&app, Method::GET, "/admin/clubs/pending", Some(alice.as_str()), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, _, pending) = send(&app, Method::GET, "/admin/clubs/pending", Some(carol.as_str()), None).await?;
    assert_eq!(pending[0]["id"], "c4");

    let (_, _, approved) = send(&app, Method::POST, "/admin/clubs/c4/approve", Some(carol.as_str()), None).await?;
    assert_eq!(approved["record"]["status"], "APPROVED");
    let (_, _, again) = send(&app, Method::POST, "/admin/clubs/c4/approve", Some(carol.as_str()), None).await?;
    assert_eq!(again["outcome"], "unchanged");

    let (status, _, _) = send(&app, Method::DELETE, "/admin/clubs/c3", Some(carol.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, Method::GET, "/api/clubs/c3", Some(carol.as_str()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, users) = send(&app, Method::GET, "/admin/users?search=david", Some(carol.as_str()), None).await?;
    assert_eq!(users.as_array().map(Vec::len), Some(1));

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/admin/announcements",
        Some(carol.as_str()),
        Some(json!({ "message": "Club fair on Friday" })),
    )
    .await?;
    assert_eq!(status, StatusCode::ACCEPTED);

    Ok(())
}

#[tokio::test]
async fn test_signup_logout_and_assistant_fallback() -> anyhow::Result<()> {
    let app = app().await?;

    let (_, _, mentorships) = send(&app, Method::GET, "/public/mentorships", None, None).await?;
    assert!(mentorships.as_array().is_some_and(|m| m.iter().any(|n| n == "Rhythm Soul")));

    let (status, cookie, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({
            "email": "new@uni.edu",
            "password": "secret99",
            "name": "New Student",
            "role": "STUDENT",
            "studentYear": "1st Year"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["studentYear"], "1st Year");
    let cookie = cookie.expect("session cookie set");

    let (_, _, reply) = send(
        &app,
        Method::POST,
        "/api/assistant/ask",
        Some(cookie.as_str()),
        Some(json!({ "query": "Which clubs are about tech?" })),
    )
    .await?;
    assert_eq!(reply["answer"], MISSING_KEY_REPLY);

    let (status, _, _) = send(&app, Method::POST, "/auth/logout", Some(cookie.as_str()), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, Method::GET, "/api/me", Some(cookie.as_str()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}
