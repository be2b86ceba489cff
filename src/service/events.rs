use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::RecordStore,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Club to post under. Defaults to the first club the actor leads.
    pub club_id: Option<String>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
}

/// Owns event creation and attendee registration.
#[derive(Clone)]
pub struct EventRosterEngine {
    store: RecordStore,
}

impl EventRosterEngine {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Events of clubs the actor can see, selected by `window`.
    pub async fn list_events(&self, actor: &Actor, window: EventWindow, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let clubs = self.store.get_all::<Club>().await?;
        let events = self.store.get_all::<Event>().await?;
        let visible = events
            .into_iter()
            .filter(|e| hosted_by_visible_club(&clubs, e, actor))
            .collect();
        Ok(window.select(visible, now))
    }

    /// Events of hidden clubs read as missing.
    pub async fn get_event(&self, actor: &Actor, event_id: &str) -> Result<Event> {
        let clubs = self.store.get_all::<Club>().await?;
        self.store
            .find::<Event>(event_id)
            .await?
            .filter(|e| hosted_by_visible_club(&clubs, e, actor))
            .ok_or_else(|| AppError::not_found(format!("Event {} not found", event_id)))
    }

    /// Only the lead of a club (of any status) may post its events.
    pub async fn create_event(&self, actor: &Actor, new_event: NewEvent) -> Result<Event> {
        let clubs = self.store.get_all::<Club>().await?;

        let club = match new_event.club_id.as_deref() {
            Some(club_id) => clubs.iter().find(|c| c.id == club_id && c.is_led_by(&actor.user_id)),
            None => clubs.iter().find(|c| c.is_led_by(&actor.user_id)),
        };

        let club = match club {
            Some(club) => club,
            None => {
                tracing::warn!(user_id = %actor.user_id, "Event creation refused: actor leads no matching club");
                return Err(AppError::forbidden("You must lead a club to post an event"));
            }
        };

        let event = Event {
            id: format!("e-{}", Uuid::new_v4()),
            club_id: club.id.clone(),
            title: new_event.title,
            description: new_event.description,
            date: combine_date_time(new_event.date, new_event.time),
            location: new_event.location,
            attendees: Vec::new(),
        };

        let mut events = self.store.get_all::<Event>().await?;
        events.push(event.clone());
        self.store.replace_all(&events).await?;

        tracing::info!(event_id = %event.id, club_id = %event.club_id, "Event created: {}", event.title);
        Ok(event)
    }

    pub async fn register_attendance(&self, actor: &Actor, event_id: &str) -> Result<Transition<Event>> {
        let clubs = self.store.get_all::<Club>().await?;
        let mut events = self.store.get_all::<Event>().await?;
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id && hosted_by_visible_club(&clubs, e, actor))
            .ok_or_else(|| AppError::not_found(format!("Event {} not found", event_id)))?;

        if !event.register(&actor.user_id) {
            return Ok(Transition::Unchanged(event.clone()));
        }

        let updated = event.clone();
        self.store.replace_all(&events).await?;

        tracing::info!(event_id = %event_id, user_id = %actor.user_id, "Attendance registered");
        Ok(Transition::Applied(updated))
    }

    /// Attendee profiles, visible to the owning club's lead and admins.
    pub async fn list_attendee_profiles(&self, actor: &Actor, event_id: &str) -> Result<Vec<User>> {
        let event = self.get_event(actor, event_id).await?;

        if !actor.is_admin() {
            let leads_owner = self
                .store
                .find::<Club>(&event.club_id)
                .await?
                .is_some_and(|club| club.is_led_by(&actor.user_id));
            if !leads_owner {
                return Err(AppError::forbidden("Only the club lead can view attendees"));
            }
        }

        let users = self.store.get_all::<User>().await?;
        Ok(users.into_iter().filter(|u| event.is_attending(&u.id)).collect())
    }
}

/// Events whose club record is gone stay listed.
fn hosted_by_visible_club(clubs: &[Club], event: &Event, actor: &Actor) -> bool {
    clubs
        .iter()
        .find(|c| c.id == event.club_id)
        .map_or(true, |c| c.is_visible_to(actor))
}
