//! Commentary for gates, channels and centers.
//!
//! The report asks a `Commentator` for text. Which one it gets is decided
//! once at startup: the chat client when it was requested and a key is
//! present, otherwise the built-in descriptions. A failed call never reaches
//! the report; `commentary_for` swaps in the built-in text instead.

pub mod chat;
pub mod prompts;

pub use chat::ChatCommentator;

use std::fmt;

use tracing::{info, warn};

use crate::config::CommentaryConfig;
use crate::error::Result;
use crate::model::Activation;
use crate::reference::{Center, Channel, Gate};

#[derive(Clone, Copy, Debug)]
pub enum Subject {
    Gate {
        gate: &'static Gate,
        center: Center,
        activation: Activation,
    },
    Channel(&'static Channel),
    Center { center: Center, defined: bool },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Gate { gate, .. } => write!(f, "gate {}", gate.number),
            Subject::Channel(channel) => write!(f, "channel {}", channel.id()),
            Subject::Center { center, .. } => write!(f, "{} center", center),
        }
    }
}

pub trait Commentator {
    fn explain(&self, subject: &Subject) -> Result<String>;
}

/// Built-in text from the reference tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCommentator;

impl StaticCommentator {
    pub fn text(subject: &Subject) -> String {
        match subject {
            Subject::Gate { gate, center, activation } => format!(
                "Gate {} ({}) in the {} center, {}. {}",
                gate.number,
                gate.name,
                center,
                activation.label(),
                gate.description
            ),
            Subject::Channel(channel) => format!(
                "The {} channel ({}) links the {} and {} centers. {}",
                channel.name,
                channel.id(),
                channel.centers[0],
                channel.centers[1],
                channel.description
            ),
            Subject::Center { center, defined } => center.description(*defined).to_string(),
        }
    }
}

impl Commentator for StaticCommentator {
    fn explain(&self, subject: &Subject) -> Result<String> {
        Ok(Self::text(subject))
    }
}

/// Asks `commentator`, falling back to the built-in text on any failure.
pub fn commentary_for(commentator: &dyn Commentator, subject: &Subject) -> String {
    match commentator.explain(subject) {
        Ok(text) => text,
        Err(e) => {
            warn!("Commentary for {} failed, using built-in text: {}", subject, e);
            StaticCommentator::text(subject)
        }
    }
}

/// Picks the commentator for this run.
///
/// The chat client is used only when `requested` is set and the key variable
/// named in the config holds a non-empty value.
pub fn select_commentator(requested: bool, config: &CommentaryConfig) -> Box<dyn Commentator> {
    if !requested {
        return Box::new(StaticCommentator);
    }

    let key = std::env::var(&config.api_key_env).unwrap_or_default();
    if key.trim().is_empty() {
        warn!(
            "Commentary requested but {} is not set. Using built-in descriptions.",
            config.api_key_env
        );
        return Box::new(StaticCommentator);
    }

    match ChatCommentator::new(config, key.trim()) {
        Ok(client) => {
            info!("Using {} at {} for commentary", config.model, config.endpoint);
            Box::new(client)
        }
        Err(e) => {
            warn!("Failed to build commentary client: {}. Using built-in descriptions.", e);
            Box::new(StaticCommentator)
        }
    }
}
