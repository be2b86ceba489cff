use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::RecordStore,
};

/// Fields for a new club. `lead_id` defaults to the proposing actor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClub {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub lead_id: Option<String>,
    pub image: Option<String>,
}

/// Member and requester profiles for the lead's roster view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubRoster {
    pub club: Club,
    pub members: Vec<User>,
    pub pending: Vec<User>,
}

/// Owns club roster transitions and the club lifecycle.
///
/// Every operation re-reads the collection it mutates, so sequential calls
/// always see the latest stored state.
#[derive(Clone)]
pub struct MembershipEngine {
    store: RecordStore,
}

impl MembershipEngine {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn list_clubs(&self) -> Result<Vec<Club>> {
        self.store.get_all::<Club>().await
    }

    pub async fn get_club(&self, club_id: &str) -> Result<Club> {
        self.store
            .find::<Club>(club_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Club {} not found", club_id)))
    }

    /// Club leads propose a club for themselves and it waits for an admin.
    /// Admins may create a club for any lead, which is approved at once.
    pub async fn propose_club(&self, actor: &Actor, new_club: NewClub) -> Result<Club> {
        let (lead_id, status) = match actor.role {
            UserRole::Admin => {
                let lead_id = new_club
                    .lead_id
                    .clone()
                    .ok_or_else(|| AppError::Validation("A lead is required".to_string()))?;
                (lead_id, ClubStatus::Approved)
            }
            UserRole::ClubLead => {
                if new_club.lead_id.as_deref().is_some_and(|id| !actor.is(id)) {
                    return Err(AppError::forbidden("Club leads can only propose clubs they lead"));
                }
                (actor.user_id.clone(), ClubStatus::Pending)
            }
            UserRole::Student => {
                return Err(AppError::forbidden("Only club leads can propose clubs"));
            }
        };

        let club = Club {
            id: format!("c-{}", Uuid::new_v4()),
            description: new_club
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| default_description(&new_club.category)),
            image: new_club.image.unwrap_or_else(|| default_image(&new_club.name)),
            name: new_club.name,
            category: new_club.category,
            members: vec![lead_id.clone()],
            lead_id,
            pending_members: Vec::new(),
            status,
        };

        let mut clubs = self.store.get_all::<Club>().await?;
        clubs.push(club.clone());
        self.store.replace_all(&clubs).await?;

        tracing::info!(club_id = %club.id, lead_id = %club.lead_id, status = club.status.as_str(), "Club proposed: {}", club.name);
        Ok(club)
    }

    pub async fn approve_club_proposal(&self, actor: &Actor, club_id: &str) -> Result<Transition<Club>> {
        require_admin(actor, "Only admins can approve clubs")?;

        let mut clubs = self.store.get_all::<Club>().await?;
        let club = find_mut(&mut clubs, club_id)?;

        if club.is_approved() {
            return Ok(Transition::Unchanged(club.clone()));
        }

        club.status = ClubStatus::Approved;
        let approved = club.clone();
        self.store.replace_all(&clubs).await?;

        tracing::info!(club_id = %club_id, "Club approved by {}", actor.user_id);
        Ok(Transition::Applied(approved))
    }

    /// Removes the club record entirely.
    pub async fn reject_club_proposal(&self, actor: &Actor, club_id: &str) -> Result<Club> {
        require_admin(actor, "Only admins can reject clubs")?;

        let mut clubs = self.store.get_all::<Club>().await?;
        let index = clubs
            .iter()
            .position(|c| c.id == club_id)
            .ok_or_else(|| AppError::not_found(format!("Club {} not found", club_id)))?;

        let removed = clubs.remove(index);
        self.store.replace_all(&clubs).await?;

        tracing::info!(club_id = %club_id, "Club proposal rejected by {}", actor.user_id);
        Ok(removed)
    }

    /// Queues the actor for membership. Unchanged if they already lead,
    /// belong to, or wait on the club.
    pub async fn request_join(&self, actor: &Actor, club_id: &str) -> Result<Transition<Club>> {
        let mut clubs = self.store.get_all::<Club>().await?;
        let club = find_mut(&mut clubs, club_id)?;

        if !club.is_approved() {
            tracing::warn!(club_id = %club_id, user_id = %actor.user_id, "Join request on unapproved club refused");
            return Err(AppError::forbidden("This club is still awaiting approval"));
        }

        if !club.add_request(&actor.user_id) {
            return Ok(Transition::Unchanged(club.clone()));
        }

        let updated = club.clone();
        self.store.replace_all(&clubs).await?;

        tracing::info!(club_id = %club_id, user_id = %actor.user_id, "Join request recorded");
        Ok(Transition::Applied(updated))
    }

    /// Moves a pending requester into the roster and records the club on
    /// the user. Both records are computed first and written together.
    pub async fn approve_member(&self, actor: &Actor, club_id: &str, user_id: &str) -> Result<Transition<Club>> {
        let mut clubs = self.store.get_all::<Club>().await?;
        let club = find_mut(&mut clubs, club_id)?;
        require_manager(actor, club)?;

        if !club.promote(user_id) {
            return Ok(Transition::Unchanged(club.clone()));
        }
        let updated = club.clone();

        let mut users = self.store.get_all::<User>().await?;
        let user_found = match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.join_club(club_id);
                true
            }
            None => false,
        };

        if user_found {
            self.store.replace_all_pair(&clubs, &users).await?;
        } else {
            tracing::warn!(user_id = %user_id, "Approved member has no user record; roster updated only");
            self.store.replace_all(&clubs).await?;
        }

        tracing::info!(club_id = %club_id, user_id = %user_id, "Member approved by {}", actor.user_id);
        Ok(Transition::Applied(updated))
    }

    /// Drops a pending request without touching members or the user.
    pub async fn reject_member(&self, actor: &Actor, club_id: &str, user_id: &str) -> Result<Transition<Club>> {
        let mut clubs = self.store.get_all::<Club>().await?;
        let club = find_mut(&mut clubs, club_id)?;
        require_manager(actor, club)?;

        if !club.dismiss(user_id) {
            return Ok(Transition::Unchanged(club.clone()));
        }
        let updated = club.clone();
        self.store.replace_all(&clubs).await?;

        tracing::info!(club_id = %club_id, user_id = %user_id, "Join request rejected by {}", actor.user_id);
        Ok(Transition::Applied(updated))
    }

    pub async fn update_description(&self, actor: &Actor, club_id: &str, description: String) -> Result<Club> {
        let mut clubs = self.store.get_all::<Club>().await?;
        let club = find_mut(&mut clubs, club_id)?;
        require_manager(actor, club)?;

        club.description = description;
        let updated = club.clone();
        self.store.replace_all(&clubs).await?;

        tracing::debug!(club_id = %club_id, "Club description updated");
        Ok(updated)
    }

    pub async fn roster(&self, actor: &Actor, club_id: &str) -> Result<ClubRoster> {
        let club = self.get_club(club_id).await?;
        require_manager(actor, &club)?;

        let users = self.store.get_all::<User>().await?;
        let member_ids = club.member_ids();
        let members = users.iter().filter(|u| member_ids.contains(&u.id)).cloned().collect();
        let pending = users.iter().filter(|u| club.is_pending(&u.id)).cloned().collect();

        Ok(ClubRoster { club, members, pending })
    }
}

fn find_mut<'a>(clubs: &'a mut [Club], club_id: &str) -> Result<&'a mut Club> {
    clubs
        .iter_mut()
        .find(|c| c.id == club_id)
        .ok_or_else(|| AppError::not_found(format!("Club {} not found", club_id)))
}

fn require_admin(actor: &Actor, reason: &str) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %actor.user_id, "{}", reason);
        Err(AppError::forbidden(reason))
    }
}

fn require_manager(actor: &Actor, club: &Club) -> Result<()> {
    if club.can_be_managed_by(actor) {
        Ok(())
    } else {
        tracing::warn!(user_id = %actor.user_id, club_id = %club.id, "Roster change refused");
        Err(AppError::forbidden("Only the club lead or an admin can manage this club"))
    }
}
