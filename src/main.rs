use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uniclubs::{
    api,
    assistant::{AssistantGateway, GeminiClient, TextGenerator},
    auth::{AuthService, IdentityChange},
    config::Settings,
    repository::{KeyValueStore, MemoryStore, RecordStore, SqliteStore},
    seed,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uniclubs=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting UniClubs server on {}:{}", settings.server.host, settings.server.port);

    // Initialize the record store
    let backend: Arc<dyn KeyValueStore> = if settings.store.is_memory() {
        tracing::warn!("Using in-memory store; nothing will survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(settings.store.max_connections)
            .connect(&settings.store.url)
            .await?;

        let sqlite = SqliteStore::new(db_pool);
        sqlite.migrate().await?;
        Arc::new(sqlite)
    };
    let store = RecordStore::new(backend);

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(store.clone(), settings.auth.clone()));

    if settings.store.seed_on_start {
        let users = seed::users();
        let seeded = store
            .seed_if_empty(&users, &seed::clubs(), &seed::events(chrono::Utc::now()))
            .await?;
        if seeded {
            for user in &users {
                auth_service.set_password(user, seed::SEED_PASSWORD).await?;
            }
            tracing::info!("Seeded {} users with the demo dataset", users.len());
        }
    }

    // Initialize the assistant backend if configured
    let generator = GeminiClient::new(&settings.assistant)
        .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
    match &generator {
        Some(g) => tracing::info!("Assistant backend {} enabled", g.name()),
        None => tracing::info!("Assistant backend not configured"),
    }
    let assistant = Arc::new(AssistantGateway::new(generator));

    // Log identity changes
    let mut changes = auth_service.subscribe();
    tokio::spawn(async move {
        while let Ok(change) = changes.recv().await {
            match change {
                IdentityChange::SignedIn(user) => tracing::debug!(user_id = %user.id, "Identity: signed in"),
                IdentityChange::SignedUp(user) => tracing::debug!(user_id = %user.id, "Identity: signed up"),
                IdentityChange::SignedOut { user_id } => tracing::debug!(user_id = %user_id, "Identity: signed out"),
            }
        }
    });

    // Periodically drop expired sessions
    let sweeper = auth_service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let removed = sweeper.cleanup_expired_sessions().await;
            if removed > 0 {
                tracing::info!("Removed {} expired sessions", removed);
            }
        }
    });

    // Create service context
    let service_context = Arc::new(ServiceContext::new(store, auth_service, assistant));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
