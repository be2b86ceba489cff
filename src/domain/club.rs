use serde::{Deserialize, Serialize};

use super::user::Actor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClubStatus {
    Pending,
    Approved,
}

impl ClubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubStatus::Pending => "PENDING",
            ClubStatus::Approved => "APPROVED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub lead_id: String,
    pub image: String,
    /// Approved member ids.
    #[serde(default)]
    pub members: Vec<String>,
    /// Ids waiting for the lead's decision.
    #[serde(default)]
    pub pending_members: Vec<String>,
    pub status: ClubStatus,
}

/// Where a user stands with respect to one club.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RosterStanding {
    Lead,
    Member,
    Pending,
    Outsider,
}

impl Club {
    pub fn is_approved(&self) -> bool {
        self.status == ClubStatus::Approved
    }

    pub fn is_led_by(&self, user_id: &str) -> bool {
        self.lead_id == user_id
    }

    /// Membership check used everywhere: the lead always counts.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.is_led_by(user_id) || self.members.iter().any(|id| id == user_id)
    }

    pub fn is_pending(&self, user_id: &str) -> bool {
        self.pending_members.iter().any(|id| id == user_id)
    }

    pub fn standing_of(&self, user_id: &str) -> RosterStanding {
        if self.is_led_by(user_id) {
            RosterStanding::Lead
        } else if self.has_member(user_id) {
            RosterStanding::Member
        } else if self.is_pending(user_id) {
            RosterStanding::Pending
        } else {
            RosterStanding::Outsider
        }
    }

    /// Member ids with the lead folded in, lead first if not listed.
    pub fn member_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.members.len() + 1);
        if !self.members.iter().any(|id| id == &self.lead_id) {
            ids.push(self.lead_id.clone());
        }
        ids.extend(self.members.iter().cloned());
        ids
    }

    /// The lead of the club or any admin.
    pub fn can_be_managed_by(&self, actor: &Actor) -> bool {
        actor.is_admin() || self.is_led_by(&actor.user_id)
    }

    /// Pending clubs are only shown to their proposer and to admins.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        self.is_approved() || self.can_be_managed_by(actor)
    }

    /// Queues a join request. False if the user already holds any standing.
    pub fn add_request(&mut self, user_id: &str) -> bool {
        if self.has_member(user_id) || self.is_pending(user_id) {
            return false;
        }
        self.pending_members.push(user_id.to_string());
        true
    }

    /// Moves a pending requester into `members`. False if not pending.
    pub fn promote(&mut self, user_id: &str) -> bool {
        if !self.is_pending(user_id) {
            return false;
        }
        self.pending_members.retain(|id| id != user_id);
        if !self.members.iter().any(|id| id == user_id) {
            self.members.push(user_id.to_string());
        }
        true
    }

    /// Drops a pending request. False if the user was not pending.
    pub fn dismiss(&mut self, user_id: &str) -> bool {
        let before = self.pending_members.len();
        self.pending_members.retain(|id| id != user_id);
        self.pending_members.len() != before
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

pub fn default_description(category: &str) -> String {
    format!("Official club for {} enthusiasts.", category)
}

pub fn default_image(club_name: &str) -> String {
    format!("https://picsum.photos/seed/{}/800/400", club_name.replace(' ', "-"))
}
