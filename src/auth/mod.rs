use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Duration;
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    domain::*,
    error::{AppError, Result},
    repository::RecordStore,
    service::{membership::MembershipEngine, NewClub, MAX_MENTORS_PER_CLUB},
};

pub mod session;

use session::SessionStore;

pub const SESSION_COOKIE: &str = "session";
const CREDENTIALS_KEY: &str = "credentials";

/// Login material kept apart from the public user records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credential {
    email: String,
    user_id: String,
    password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub student_year: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// CLUB_LEAD only: the club proposed alongside the account.
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub club_category: Option<String>,
    /// ADMIN only.
    #[serde(default)]
    pub mentored_club: Option<String>,
}

/// Broadcast whenever the signed-in identity changes.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityChange {
    SignedIn(User),
    SignedUp(User),
    SignedOut { user_id: String },
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

/// Identity provider: credentials, sessions and change notifications.
pub struct AuthService {
    store: RecordStore,
    sessions: SessionStore,
    changes: broadcast::Sender<IdentityChange>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: RecordStore, config: AuthConfig) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            store,
            sessions: SessionStore::new(),
            changes,
            config,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdentityChange> {
        self.changes.subscribe()
    }

    fn notify(&self, change: IdentityChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    async fn credentials(&self) -> Result<Vec<Credential>> {
        match self.store.backend().read(CREDENTIALS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_credentials(&self, credentials: &[Credential]) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        self.store.backend().write(CREDENTIALS_KEY, raw).await
    }

    /// Attaches a password to an existing user record (used when seeding).
    pub async fn set_password(&self, user: &User, password: &str) -> Result<()> {
        let password_hash = Self::hash_password(password).await?;
        let mut credentials = self.credentials().await?;
        credentials.retain(|c| c.user_id != user.id);
        credentials.push(Credential {
            email: user.email.to_lowercase(),
            user_id: user.id.clone(),
            password_hash,
        });
        self.save_credentials(&credentials).await
    }

    async fn open_session(&self, user: &User) -> String {
        let token = generate_token();
        self.sessions
            .create(&user.id, &token, Duration::hours(self.config.session_duration_hours))
            .await;
        token
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn> {
        let email = email.trim().to_lowercase();
        let credential = self
            .credentials()
            .await?
            .into_iter()
            .find(|c| c.email == email)
            .ok_or(AppError::Unauthorized)?;

        if !Self::verify_password(password, &credential.password_hash).await? {
            tracing::warn!("Failed sign-in for {}", email);
            return Err(AppError::Unauthorized);
        }

        let user = self
            .store
            .find::<User>(&credential.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let token = self.open_session(&user).await;
        tracing::info!(user_id = %user.id, "Signed in");
        self.notify(IdentityChange::SignedIn(user.clone()));

        Ok(SignedIn { user, token })
    }

    /// Creates the account and signs it in. A club lead's club is proposed
    /// in the same step; an admin's mentorship is checked against the cap.
    pub async fn sign_up(&self, request: SignUp) -> Result<SignedIn> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let mut credentials = self.credentials().await?;
        let mut users = self.store.get_all::<User>().await?;
        if credentials.iter().any(|c| c.email == email)
            || users.iter().any(|u| u.email.to_lowercase() == email)
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // Only club leads propose a club with their account.
        let club_name = match request.role {
            UserRole::ClubLead => Some(
                non_empty(request.club_name.clone())
                    .ok_or_else(|| AppError::Validation("Club name is required for club leads".to_string()))?,
            ),
            _ => None,
        };

        let mentored_club = match request.role {
            UserRole::Admin => non_empty(request.mentored_club.clone()),
            _ => None,
        };
        if let Some(ref club) = mentored_club {
            if users.iter().filter(|u| u.mentors(club)).count() >= MAX_MENTORS_PER_CLUB {
                return Err(AppError::Conflict(format!("{} already has {} mentors", club, MAX_MENTORS_PER_CLUB)));
            }
        }

        let password_hash = Self::hash_password(&request.password).await?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            avatar: avatar_for(&request.name),
            name: request.name.trim().to_string(),
            email: email.clone(),
            role: request.role,
            joined_clubs: Vec::new(),
            student_year: match request.role {
                UserRole::Admin => None,
                _ => non_empty(request.student_year.clone()),
            },
            department: non_empty(request.department.clone()),
            mentored_club,
        };

        // Nothing is written until every check above has passed.
        users.push(user.clone());
        self.store.replace_all(&users).await?;

        credentials.push(Credential {
            email,
            user_id: user.id.clone(),
            password_hash,
        });
        self.save_credentials(&credentials).await?;

        if let Some(name) = club_name {
            let category = non_empty(request.club_category.clone()).unwrap_or_else(|| "Technology".to_string());
            MembershipEngine::new(self.store.clone())
                .propose_club(
                    &user.actor(),
                    NewClub {
                        name,
                        description: None,
                        category,
                        lead_id: None,
                        image: None,
                    },
                )
                .await?;
        }

        let token = self.open_session(&user).await;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Signed up");
        self.notify(IdentityChange::SignedUp(user.clone()));

        Ok(SignedIn { user, token })
    }

    /// Signs in a canned account for the given role, creating it on first use.
    pub async fn login_with_demo(&self, role: UserRole) -> Result<SignedIn> {
        if !self.config.demo_login_enabled {
            return Err(AppError::forbidden("Demo login is disabled"));
        }

        let demo = demo_user(role);
        let mut users = self.store.get_all::<User>().await?;
        let user = match users.iter().find(|u| u.id == demo.id) {
            Some(existing) => existing.clone(),
            None => {
                users.push(demo.clone());
                self.store.replace_all(&users).await?;
                demo
            }
        };

        let token = self.open_session(&user).await;
        tracing::info!(user_id = %user.id, "Demo sign-in");
        self.notify(IdentityChange::SignedIn(user.clone()));

        Ok(SignedIn { user, token })
    }

    pub async fn sign_out(&self, token: &str) {
        if let Some(session) = self.sessions.delete_by_token(token).await {
            tracing::info!(user_id = %session.user_id, "Signed out");
            self.notify(IdentityChange::SignedOut { user_id: session.user_id });
        }
    }

    /// Resolves a session token to the user's current record.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>> {
        match self.sessions.find_by_token(token).await {
            Some(session) => self.store.find::<User>(&session.user_id).await,
            None => Ok(None),
        }
    }

    pub async fn cleanup_expired_sessions(&self) -> usize {
        self.sessions.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.config.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.config.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

pub fn demo_user(role: UserRole) -> User {
    let slug = role.as_str().to_lowercase();
    User {
        id: format!("demo-{}", slug),
        email: format!("demo.{}@uniclubs.edu", slug),
        name: format!("Demo {}", role.display_name()),
        role,
        avatar: format!(
            "https://ui-avatars.com/api/?name=Demo+{}&background=random&color=fff",
            role.as_str()
        ),
        joined_clubs: vec!["c1".to_string()],
        student_year: (role != UserRole::Admin).then(|| "3rd Year".to_string()),
        department: Some("Computer Science".to_string()),
        mentored_club: (role == UserRole::Admin).then(|| "Tech Innovators".to_string()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
