//! Starter data written to an empty store.

use chrono::{DateTime, Duration, Utc};

use crate::domain::*;

/// Password given to every seeded account.
pub const SEED_PASSWORD: &str = "password123";

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            name: "Alice Student".to_string(),
            email: "alice@uni.edu".to_string(),
            role: UserRole::Student,
            avatar: "https://picsum.photos/id/64/100/100".to_string(),
            joined_clubs: vec!["c1".to_string()],
            student_year: Some("2nd Year".to_string()),
            department: Some("Computer Science".to_string()),
            mentored_club: None,
        },
        User {
            id: "u2".to_string(),
            name: "Bob Lead".to_string(),
            email: "bob@uni.edu".to_string(),
            role: UserRole::ClubLead,
            avatar: "https://picsum.photos/id/65/100/100".to_string(),
            joined_clubs: vec!["c1".to_string()],
            student_year: Some("3rd Year".to_string()),
            department: Some("Arts".to_string()),
            mentored_club: None,
        },
        User {
            id: "u3".to_string(),
            name: "Dr. Carol Admin".to_string(),
            email: "carol@uni.edu".to_string(),
            role: UserRole::Admin,
            avatar: "https://picsum.photos/id/66/100/100".to_string(),
            joined_clubs: vec![],
            student_year: None,
            department: None,
            mentored_club: Some("Tech Innovators".to_string()),
        },
        User {
            id: "u4".to_string(),
            name: "David Freshman".to_string(),
            email: "david@uni.edu".to_string(),
            role: UserRole::Student,
            avatar: "https://picsum.photos/id/70/100/100".to_string(),
            joined_clubs: vec![],
            student_year: Some("1st Year".to_string()),
            department: Some("Physics".to_string()),
            mentored_club: None,
        },
    ]
}

fn club(id: &str, name: &str, description: &str, category: &str, lead_id: &str, image: &str) -> Club {
    Club {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        lead_id: lead_id.to_string(),
        image: image.to_string(),
        members: vec![],
        pending_members: vec![],
        status: ClubStatus::Approved,
    }
}

pub fn clubs() -> Vec<Club> {
    let mut tech = club(
        "c1",
        "Tech Innovators",
        "A community for coding enthusiasts and hackathon lovers.",
        "Technology",
        "u2",
        "https://picsum.photos/id/0/800/400",
    );
    tech.members = vec!["u1".to_string(), "u2".to_string()];
    tech.pending_members = vec!["u4".to_string()];

    let mut entrepreneurs = club(
        "c4",
        "Future Entrepreneurs",
        "Networking and startup pitching sessions.",
        "Business",
        "u_temp",
        "https://picsum.photos/id/20/800/400",
    );
    entrepreneurs.members = vec!["u_temp".to_string()];
    entrepreneurs.status = ClubStatus::Pending;

    vec![
        tech,
        club(
            "c2",
            "Uni Photography",
            "Capture the moments that matter. Workshops every week.",
            "Arts",
            "u99",
            "https://picsum.photos/id/250/800/400",
        ),
        club(
            "c3",
            "Rhythm Soul",
            "For those who love to move. Contemporary and classical dance.",
            "Dance",
            "u5",
            "https://picsum.photos/id/158/800/400",
        ),
        entrepreneurs,
    ]
}

pub fn events(now: DateTime<Utc>) -> Vec<Event> {
    vec![
        Event {
            id: "e1".to_string(),
            club_id: "c1".to_string(),
            title: "Semester Hackathon".to_string(),
            description: "24-hour coding challenge. Prizes up to $500.".to_string(),
            date: now + Duration::days(5),
            location: "Main Auditorium".to_string(),
            attendees: vec!["u1".to_string()],
        },
        Event {
            id: "e2".to_string(),
            club_id: "c2".to_string(),
            title: "Campus Photo Walk".to_string(),
            description: "Guided tour around campus to find the best spots.".to_string(),
            date: now + Duration::days(2),
            location: "North Gate".to_string(),
            attendees: vec![],
        },
    ]
}
