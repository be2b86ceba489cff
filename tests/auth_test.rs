use chrono::Utc;
use uniclubs::{
    auth::{AuthService, IdentityChange, SignUp},
    config::AuthConfig,
    domain::{Club, ClubStatus, User, UserRole},
    error::AppError,
    repository::RecordStore,
    seed,
};

async fn service() -> anyhow::Result<(RecordStore, AuthService)> {
    let store = RecordStore::in_memory();
    store.seed(&seed::users(), &seed::clubs(), &seed::events(Utc::now())).await?;
    let auth = AuthService::new(store.clone(), AuthConfig::default());
    for user in seed::users() {
        auth.set_password(&user, seed::SEED_PASSWORD).await?;
    }
    Ok((store, auth))
}

fn sign_up(email: &str, role: UserRole) -> SignUp {
    SignUp {
        email: email.to_string(),
        password: "hunter22".to_string(),
        name: "Priya Patel".to_string(),
        role,
        student_year: Some("2nd Year".to_string()),
        department: Some("Biology".to_string()),
        club_name: None,
        club_category: None,
        mentored_club: None,
    }
}

#[tokio::test]
async fn test_sign_in_with_seeded_account() -> anyhow::Result<()> {
    let (_store, auth) = service().await?;

    let signed_in = auth.sign_in("Alice@Uni.edu", seed::SEED_PASSWORD).await?;
    assert_eq!(signed_in.user.id, "u1");

    let current = auth.current_user(&signed_in.token).await?;
    assert_eq!(current.map(|u| u.id), Some("u1".to_string()));

    let err = auth.sign_in("alice@uni.edu", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    let err = auth.sign_in("nobody@uni.edu", "password123").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    Ok(())
}

#[tokio::test]
async fn test_student_sign_up() -> anyhow::Result<()> {
    let (store, auth) = service().await?;

    let signed_in = auth.sign_up(sign_up("priya@uni.edu", UserRole::Student)).await?;
    assert_eq!(signed_in.user.role, UserRole::Student);
    assert!(signed_in.user.joined_clubs.is_empty());
    assert!(store.find::<User>(&signed_in.user.id).await?.is_some());

    // The new password works
    auth.sign_in("priya@uni.edu", "hunter22").await?;

    let err = auth.sign_up(sign_up("PRIYA@uni.edu", UserRole::Student)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let mut short = sign_up("short@uni.edu", UserRole::Student);
    short.password = "abc".to_string();
    let err = auth.sign_up(short).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_lead_sign_up_proposes_club() -> anyhow::Result<()> {
    let (store, auth) = service().await?;

    let err = auth.sign_up(sign_up("lead@uni.edu", UserRole::ClubLead)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut request = sign_up("lead@uni.edu", UserRole::ClubLead);
    request.club_name = Some("Astronomy Society".to_string());
    request.club_category = Some("Science".to_string());
    let signed_in = auth.sign_up(request).await?;

    let clubs = store.get_all::<Club>().await?;
    let proposed = clubs
        .iter()
        .find(|c| c.name == "Astronomy Society")
        .expect("club proposed");
    assert_eq!(proposed.lead_id, signed_in.user.id);
    assert_eq!(proposed.status, ClubStatus::Pending);
    assert_eq!(proposed.category, "Science");

    Ok(())
}

#[tokio::test]
async fn test_mentor_cap() -> anyhow::Result<()> {
    let (_store, auth) = service().await?;

    // u3 already mentors Tech Innovators
    let mut second = sign_up("mentor2@uni.edu", UserRole::Admin);
    second.mentored_club = Some("Tech Innovators".to_string());
    let admin = auth.sign_up(second).await?;
    assert_eq!(admin.user.mentored_club.as_deref(), Some("Tech Innovators"));
    assert!(admin.user.student_year.is_none());

    let mut third = sign_up("mentor3@uni.edu", UserRole::Admin);
    third.mentored_club = Some("Tech Innovators".to_string());
    let err = auth.sign_up(third).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_demo_login_and_notifications() -> anyhow::Result<()> {
    let (store, auth) = service().await?;
    let mut changes = auth.subscribe();

    let demo = auth.login_with_demo(UserRole::ClubLead).await?;
    assert_eq!(demo.user.role, UserRole::ClubLead);
    assert!(store.find::<User>(&demo.user.id).await?.is_some());

    // Logging in again reuses the stored record
    auth.login_with_demo(UserRole::ClubLead).await?;
    let demo_users = store
        .get_all::<User>()
        .await?
        .into_iter()
        .filter(|u| u.id == demo.user.id)
        .count();
    assert_eq!(demo_users, 1);

    auth.sign_out(&demo.token).await;
    assert!(auth.current_user(&demo.token).await?.is_none());

    assert_eq!(changes.recv().await?, IdentityChange::SignedIn(demo.user.clone()));
    assert_eq!(changes.recv().await?, IdentityChange::SignedIn(demo.user.clone()));
    assert_eq!(
        changes.recv().await?,
        IdentityChange::SignedOut { user_id: demo.user.id.clone() }
    );

    Ok(())
}

#[tokio::test]
async fn test_demo_login_can_be_disabled() -> anyhow::Result<()> {
    let store = RecordStore::in_memory();
    let auth = AuthService::new(
        store,
        AuthConfig {
            demo_login_enabled: false,
            ..AuthConfig::default()
        },
    );

    let err = auth.login_with_demo(UserRole::Admin).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    Ok(())
}

#[tokio::test]
async fn test_club_name_ignored_for_non_leads() -> anyhow::Result<()> {
    let (store, auth) = service().await?;
    let clubs_before = store.get_all::<Club>().await?.len();

    let mut request = sign_up("p@uni.edu", UserRole::Student);
    request.club_name = Some("Chess".to_string());
    let signed_in = auth.sign_up(request).await?;
    assert_eq!(signed_in.user.role, UserRole::Student);

    let mut request = sign_up("admin2@uni.edu", UserRole::Admin);
    request.club_name = Some("Chess".to_string());
    auth.sign_up(request).await?;

    assert_eq!(store.get_all::<Club>().await?.len(), clubs_before);
    auth.sign_in("p@uni.edu", "hunter22").await?;

    Ok(())
}

#[tokio::test]
async fn test_refused_sign_up_writes_nothing() -> anyhow::Result<()> {
    let (store, auth) = service().await?;
    let users_before = store.get_all::<User>().await?;

    // Club lead without a club
    let err = auth.sign_up(sign_up("lead@uni.edu", UserRole::ClubLead)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.get_all::<User>().await?, users_before);

    // A corrected retry goes through
    let mut request = sign_up("lead@uni.edu", UserRole::ClubLead);
    request.club_name = Some("Chess".to_string());
    auth.sign_up(request).await?;

    Ok(())
}

#[tokio::test]
async fn test_email_taken_by_user_without_credentials() -> anyhow::Result<()> {
    let (store, auth) = service().await?;
    auth.login_with_demo(UserRole::Student).await?;

    let err = auth
        .sign_up(sign_up("Demo.Student@uniclubs.edu", UserRole::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let same_email = store
        .get_all::<User>()
        .await?
        .into_iter()
        .filter(|u| u.email == "demo.student@uniclubs.edu")
        .count();
    assert_eq!(same_email, 1);

    Ok(())
}
