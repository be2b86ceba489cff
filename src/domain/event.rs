use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub club_id: String,
    pub title: String,
    pub description: String,
    /// Start of the event, ISO-8601 on the wire.
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl Event {
    pub fn is_attending(&self, user_id: &str) -> bool {
        self.attendees.iter().any(|id| id == user_id)
    }

    /// Adds an attendee; false if already registered.
    pub fn register(&mut self, user_id: &str) -> bool {
        if self.is_attending(user_id) {
            return false;
        }
        self.attendees.push(user_id.to_string());
        true
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date > now
    }
}

/// Combines the separately entered calendar date and clock time.
pub fn combine_date_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    NaiveDateTime::new(date, time).and_utc()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventWindow {
    #[default]
    Upcoming,
    Past,
    All,
}

impl EventWindow {
    /// Filters and orders events relative to the caller's `now`: upcoming
    /// soonest first, past most recent first, all chronologically.
    pub fn select(&self, events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
        let mut selected: Vec<Event> = events
            .into_iter()
            .filter(|e| match self {
                EventWindow::Upcoming => e.is_upcoming(now),
                EventWindow::Past => !e.is_upcoming(now),
                EventWindow::All => true,
            })
            .collect();

        match self {
            EventWindow::Past => selected.sort_by(|a, b| b.date.cmp(&a.date)),
            _ => selected.sort_by(|a, b| a.date.cmp(&b.date)),
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(id: &str, date: DateTime<Utc>) -> Event {
        Event {
            id: id.to_string(),
            club_id: "c1".to_string(),
            title: format!("Event {}", id),
            description: String::new(),
            date,
            location: "Main Auditorium".to_string(),
            attendees: vec![],
        }
    }

    #[test]
    fn combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let time = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        let ts = combine_date_time(date, time);
        assert_eq!(ts.to_rfc3339(), "2026-03-14T18:30:00+00:00");
    }

    #[test]
    fn register_is_idempotent() {
        let mut e = event("e1", Utc::now());
        assert!(e.register("u1"));
        assert!(!e.register("u1"));
        assert_eq!(e.attendees, vec!["u1"]);
    }

    #[test]
    fn windows_partition_and_order() {
        let now = Utc::now();
        let events = vec![
            event("far", now + Duration::days(5)),
            event("old", now - Duration::days(10)),
            event("soon", now + Duration::days(2)),
            event("recent", now - Duration::days(1)),
        ];

        let upcoming: Vec<_> = EventWindow::Upcoming
            .select(events.clone(), now)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(upcoming, vec!["soon", "far"]);

        let past: Vec<_> = EventWindow::Past
            .select(events.clone(), now)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(past, vec!["recent", "old"]);

        assert_eq!(EventWindow::All.select(events, now).len(), 4);
    }
}
