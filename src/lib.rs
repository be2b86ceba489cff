pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod seed;
pub mod service;
