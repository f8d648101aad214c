//! Notification payloads handed to the presentation layer.
//!
//! The engine only produces these; whether and how they are shown is up to
//! the caller.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity,
        }
    }

    pub fn insufficient_energy() -> Self {
        Self::new(
            "Not enough energy!",
            "Wait for your energy to regenerate.",
            Severity::Warning,
        )
    }

    pub fn insufficient_coins() -> Self {
        Self::new(
            "Not enough coins!",
            "Keep collecting to afford this upgrade.",
            Severity::Warning,
        )
    }

    /// `boost_percent` is the total production boost after the reset.
    pub fn prestige(boost_percent: u32) -> Self {
        Self::new(
            "Prestige Reset!",
            format!("You've gained a {boost_percent}% boost to all production."),
            Severity::Info,
        )
    }

    pub fn chapter_unlocked() -> Self {
        Self::new(
            "New story chapter unlocked!",
            "Check the Story tab to read the latest developments.",
            Severity::Info,
        )
    }
}
