use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use rand::seq::SliceRandom;
use sqlx::sqlite::SqlitePoolOptions;
use uniclubs::{
    auth::AuthService,
    config::AuthConfig,
    domain::{avatar_for, User, UserRole},
    repository::{RecordStore, SqliteStore},
    seed,
};
use uuid::Uuid;

const DEPARTMENTS: &[&str] = &["Computer Science", "Physics", "Arts", "Biology", "Economics", "History"];
const YEARS: &[&str] = &["1st Year", "2nd Year", "3rd Year", "4th Year"];

/// Writes the starter dataset into a UniClubs store.
#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the UniClubs store with demo users, clubs and events", long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(long, default_value = "sqlite://uniclubs.db?mode=rwc")]
    database_url: String,

    /// Overwrite collections that already hold data
    #[arg(long)]
    force: bool,

    /// Extra generated student accounts
    #[arg(long, default_value_t = 0)]
    extra_students: usize,
}

fn generated_student() -> User {
    let name: String = Name().fake();
    let mut rng = rand::thread_rng();
    User {
        id: format!("s-{}", Uuid::new_v4()),
        avatar: avatar_for(&name),
        email: SafeEmail().fake::<String>().to_lowercase(),
        name,
        role: UserRole::Student,
        joined_clubs: Vec::new(),
        student_year: YEARS.choose(&mut rng).map(|y| y.to_string()),
        department: DEPARTMENTS.choose(&mut rng).map(|d| d.to_string()),
        mentored_club: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("🌱 Starting store seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await?;

    println!("📋 Running migrations...");
    let sqlite = SqliteStore::new(db_pool);
    sqlite.migrate().await?;
    let store = RecordStore::new(Arc::new(sqlite));

    let mut users = seed::users();
    users.extend((0..cli.extra_students).map(|_| generated_student()));
    let clubs = seed::clubs();
    let events = seed::events(Utc::now());

    if cli.force {
        store.seed(&users, &clubs, &events).await?;
    } else if !store.seed_if_empty(&users, &clubs, &events).await? {
        println!("⚠️  Store already holds data; rerun with --force to overwrite.");
        return Ok(());
    }

    println!("👥 Setting passwords...");
    let auth_service = AuthService::new(store.clone(), AuthConfig::default());
    for user in &users {
        auth_service.set_password(user, seed::SEED_PASSWORD).await?;
    }

    println!("  ✅ {} users, {} clubs, {} events", users.len(), clubs.len(), events.len());
    println!("  🔑 Every account signs in with password '{}'", seed::SEED_PASSWORD);
    for user in users.iter().take(4) {
        println!("     {} ({})", user.email, user.role.as_str());
    }

    println!("🎉 Seeding complete!");
    Ok(())
}
