//! Natural-language assistant grounded on the current clubs and events.
//!
//! The gateway never fails: an unconfigured or unreachable backend turns
//! into a short explanatory reply.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    domain::{Club, Event},
    error::Result,
};

pub mod gemini;

pub use gemini::GeminiClient;

pub const MISSING_KEY_REPLY: &str = "I can't access my brain right now. (Missing API Key)";
pub const FAILED_REPLY: &str = "Sorry, I encountered an error processing your request.";
pub const DESCRIBE_UNAVAILABLE: &str = "AI services are unavailable. Please configure API Key.";
pub const DESCRIBE_FAILED: &str = "Failed to generate description.";

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, system_instruction: Option<&str>, prompt: &str) -> Result<String>;
}

/// Read-only snapshot handed to the assistant with every question.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantContext {
    pub clubs: Vec<Club>,
    pub events: Vec<Event>,
}

impl AssistantContext {
    pub fn new(clubs: Vec<Club>, events: Vec<Event>) -> Self {
        Self { clubs, events }
    }

    pub fn render_clubs(&self) -> String {
        self.clubs
            .iter()
            .map(|c| {
                format!(
                    "{} (ID: {}, Status: {}): {} [Category: {}]",
                    c.name,
                    c.id,
                    c.status.as_str(),
                    c.description,
                    c.category
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_events(&self) -> String {
        self.events
            .iter()
            .map(|e| {
                format!(
                    "Event: {} by Club {} on {} at {}. {}",
                    e.title,
                    e.club_id,
                    e.date.format("%a %b %d %Y"),
                    e.location,
                    e.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn system_instruction(&self) -> String {
        format!(
            r#"You are "UniBot", a helpful assistant for the UniClubs platform.
Answer user questions based strictly on the following data.

CLUBS DATA:
{}

EVENTS DATA:
{}

If the answer is not in the data, politely say you don't know.
Keep answers concise and friendly."#,
            self.render_clubs(),
            self.render_events()
        )
    }
}

pub struct AssistantGateway {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AssistantGateway {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn answer(&self, query: &str, context: &AssistantContext) -> String {
        let Some(generator) = &self.generator else {
            return MISSING_KEY_REPLY.to_string();
        };

        match generator.generate(Some(&context.system_instruction()), query).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Assistant backend {} failed: {}", generator.name(), e);
                FAILED_REPLY.to_string()
            }
        }
    }

    /// Drafts a short club blurb for the description editor.
    pub async fn describe_club(&self, club_name: &str, category: &str, keywords: &str) -> String {
        let Some(generator) = &self.generator else {
            return DESCRIBE_UNAVAILABLE.to_string();
        };

        let prompt = format!(
            "Write a compelling, short (max 50 words) description for a university club named \"{}\".\n\
             Category: {}.\n\
             Keywords/Vibe: {}.\n\
             Tone: Exciting and inviting for students.",
            club_name, category, keywords
        );

        match generator.generate(None, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Assistant backend {} failed: {}", generator.name(), e);
                DESCRIBE_FAILED.to_string()
            }
        }
    }
}
