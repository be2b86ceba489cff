use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::RecordStore,
};

/// Two faculty mentors at most per club.
pub const MAX_MENTORS_PER_CLUB: usize = 2;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ClubFilter {
    fn matches(&self, club: &Club) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => club.matches_search(term),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(category) if !category.is_empty() && category != "All" => club.category == category,
            _ => true,
        };
        search_ok && category_ok
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dashboard {
    Student(StudentDashboard),
    ClubLead(LeadDashboard),
    Admin(AdminDashboard),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub upcoming_events: Vec<Event>,
    pub my_events: Vec<Event>,
    pub my_clubs: Vec<Club>,
    pub suggested_clubs: Vec<Club>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDashboard {
    pub club: Option<Club>,
    pub pending_users: Vec<User>,
    pub members: Vec<User>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub pending_clubs: Vec<Club>,
    pub total_students: usize,
    pub total_clubs: usize,
    pub mentored_club: Option<Club>,
    pub mentored_events: Vec<Event>,
}

/// Read-only views assembled from the three collections.
#[derive(Clone)]
pub struct Directory {
    store: RecordStore,
}

impl Directory {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn search_clubs(&self, actor: &Actor, filter: &ClubFilter) -> Result<Vec<Club>> {
        let clubs = self.store.get_all::<Club>().await?;
        Ok(clubs
            .into_iter()
            .filter(|c| c.is_visible_to(actor) && filter.matches(c))
            .collect())
    }

    pub async fn club_detail(&self, actor: &Actor, club_id: &str) -> Result<Club> {
        self.store
            .find::<Club>(club_id)
            .await?
            .filter(|c| c.is_visible_to(actor))
            .ok_or_else(|| AppError::not_found(format!("Club {} not found", club_id)))
    }

    /// Distinct categories of the clubs the actor can see, sorted.
    pub async fn categories(&self, actor: &Actor) -> Result<Vec<String>> {
        let clubs = self.store.get_all::<Club>().await?;
        let set: BTreeSet<String> = clubs
            .into_iter()
            .filter(|c| c.is_visible_to(actor))
            .map(|c| c.category)
            .collect();
        Ok(set.into_iter().collect())
    }

    pub async fn search_users(&self, actor: &Actor, term: Option<&str>) -> Result<Vec<User>> {
        if !actor.is_admin() {
            return Err(AppError::forbidden("Only admins can browse the user directory"));
        }
        let users = self.store.get_all::<User>().await?;
        let term = term.map(str::to_lowercase).unwrap_or_default();
        Ok(users
            .into_iter()
            .filter(|u| term.is_empty() || u.name.to_lowercase().contains(&term) || u.email.to_lowercase().contains(&term))
            .collect())
    }

    pub async fn pending_clubs(&self) -> Result<Vec<Club>> {
        let clubs = self.store.get_all::<Club>().await?;
        Ok(clubs.into_iter().filter(|c| !c.is_approved()).collect())
    }

    /// Names of clubs that can still take another mentor.
    pub async fn available_mentorships(&self) -> Result<Vec<String>> {
        let users = self.store.get_all::<User>().await?;
        let clubs = self.store.get_all::<Club>().await?;
        Ok(clubs
            .into_iter()
            .filter(|c| users.iter().filter(|u| u.mentors(&c.name)).count() < MAX_MENTORS_PER_CLUB)
            .map(|c| c.name)
            .collect())
    }

    pub async fn dashboard(&self, user: &User, now: DateTime<Utc>) -> Result<Dashboard> {
        let clubs = self.store.get_all::<Club>().await?;
        let events = self.store.get_all::<Event>().await?;

        let dashboard = match user.role {
            UserRole::Student => Dashboard::Student(student_dashboard(user, clubs, events, now)),
            UserRole::ClubLead => {
                let users = self.store.get_all::<User>().await?;
                Dashboard::ClubLead(lead_dashboard(user, clubs, events, users))
            }
            UserRole::Admin => {
                let users = self.store.get_all::<User>().await?;
                Dashboard::Admin(admin_dashboard(user, clubs, events, users))
            }
        };
        Ok(dashboard)
    }
}

fn student_dashboard(user: &User, clubs: Vec<Club>, events: Vec<Event>, now: DateTime<Utc>) -> StudentDashboard {
    let hidden: Vec<&str> = clubs.iter().filter(|c| !c.is_approved()).map(|c| c.id.as_str()).collect();
    let events = events.into_iter().filter(|e| !hidden.contains(&e.club_id.as_str())).collect();
    let upcoming = EventWindow::Upcoming.select(events, now);
    let my_events = upcoming.iter().filter(|e| e.is_attending(&user.id)).cloned().collect();
    let upcoming_events = upcoming.into_iter().take(3).collect();

    let (my_clubs, others): (Vec<Club>, Vec<Club>) = clubs.into_iter().partition(|c| user.has_joined(&c.id));
    let suggested_clubs = others.into_iter().filter(Club::is_approved).take(2).collect();

    StudentDashboard {
        upcoming_events,
        my_events,
        my_clubs,
        suggested_clubs,
    }
}

fn lead_dashboard(user: &User, clubs: Vec<Club>, events: Vec<Event>, users: Vec<User>) -> LeadDashboard {
    let club = clubs.into_iter().find(|c| c.is_led_by(&user.id));

    let Some(club) = club else {
        return LeadDashboard {
            club: None,
            pending_users: Vec::new(),
            members: Vec::new(),
            events: Vec::new(),
        };
    };

    let member_ids = club.member_ids();
    let pending_users = users.iter().filter(|u| club.is_pending(&u.id)).cloned().collect();
    let members = users.into_iter().filter(|u| member_ids.contains(&u.id)).collect();
    let events = events.into_iter().filter(|e| e.club_id == club.id).collect();

    LeadDashboard {
        club: Some(club),
        pending_users,
        members,
        events,
    }
}

fn admin_dashboard(user: &User, clubs: Vec<Club>, events: Vec<Event>, users: Vec<User>) -> AdminDashboard {
    let total_clubs = clubs.len();
    let total_students = users.iter().filter(|u| u.role == UserRole::Student).count();
    let mentored_club = user
        .mentored_club
        .as_deref()
        .and_then(|name| clubs.iter().find(|c| c.name == name).cloned());
    let mentored_events = match &mentored_club {
        Some(club) => events.into_iter().filter(|e| e.club_id == club.id).collect(),
        None => Vec::new(),
    };
    let pending_clubs = clubs.into_iter().filter(|c| !c.is_approved()).collect();

    AdminDashboard {
        pending_clubs,
        total_students,
        total_clubs,
        mentored_club,
        mentored_events,
    }
}
