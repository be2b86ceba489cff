pub mod directory;
pub mod events;
pub mod membership;

use std::sync::Arc;

use crate::{
    assistant::AssistantGateway,
    auth::AuthService,
    repository::RecordStore,
};
use directory::Directory;
use events::EventRosterEngine;
use membership::MembershipEngine;

pub use directory::{ClubFilter, Dashboard, MAX_MENTORS_PER_CLUB};
pub use events::NewEvent;
pub use membership::{ClubRoster, NewClub};

/// Everything a request handler needs, built once around one store handle.
pub struct ServiceContext {
    pub store: RecordStore,
    pub membership: MembershipEngine,
    pub events: EventRosterEngine,
    pub directory: Directory,
    pub auth_service: Arc<AuthService>,
    pub assistant: Arc<AssistantGateway>,
}

impl ServiceContext {
    pub fn new(
        store: RecordStore,
        auth_service: Arc<AuthService>,
        assistant: Arc<AssistantGateway>,
    ) -> Self {
        Self {
            membership: MembershipEngine::new(store.clone()),
            events: EventRosterEngine::new(store.clone()),
            directory: Directory::new(store.clone()),
            store,
            auth_service,
            assistant,
        }
    }
}
