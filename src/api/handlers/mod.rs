pub mod admin;
pub mod assistant;
pub mod auth;
pub mod clubs;
pub mod dashboard;
pub mod events;
pub mod public;
pub mod root;
