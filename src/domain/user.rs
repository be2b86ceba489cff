use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    ClubLead,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::ClubLead => "CLUB_LEAD",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Human label, e.g. "Club_lead" the way demo accounts are named.
    pub fn display_name(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: String,
    #[serde(default)]
    pub joined_clubs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Name of the club an ADMIN mentors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentored_club: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn has_joined(&self, club_id: &str) -> bool {
        self.joined_clubs.iter().any(|id| id == club_id)
    }

    /// Records a club in `joined_clubs`; returns false if it was already there.
    pub fn join_club(&mut self, club_id: &str) -> bool {
        if self.has_joined(club_id) {
            return false;
        }
        self.joined_clubs.push(club_id.to_string());
        true
    }

    pub fn mentors(&self, club_name: &str) -> bool {
        self.is_admin() && self.mentored_club.as_deref() == Some(club_name)
    }

    pub fn actor(&self) -> Actor {
        Actor::from(self)
    }
}

pub fn avatar_for(name: &str) -> String {
    format!("https://ui-avatars.com/api/?name={}", name.replace(' ', "+"))
}

/// Whoever is invoking an engine operation. Engines decide permit/deny
/// from this alone; they never consult the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}
