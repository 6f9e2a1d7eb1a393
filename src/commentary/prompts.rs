use crate::model::Activation;

use super::Subject;

pub const GATE_SYSTEM: &str = "You are a Human Design analyst. You explain gates, channels and \
centers in plain, practical language and relate them to everyday decisions and relationships.";

pub const CHANNEL_SYSTEM: &str = "You are a Human Design analyst. Give practical insight into how a \
channel shapes daily life, relationships and personal growth.";

pub const CENTER_SYSTEM: &str = "You are a Human Design analyst. Explain what a defined or open \
center means for how a person takes in and expresses energy.";

/// How the activation reads in a prompt.
fn awareness(activation: Activation) -> &'static str {
    match activation {
        Activation::ConsciousOnly => {
            "black (Personality): something I am aware of expressing"
        }
        Activation::UnconsciousOnly => {
            "red (Design): something that operates below my awareness"
        }
        Activation::Both => {
            "both black and red: I am aware of it and it also runs automatically"
        }
    }
}

/// System and user messages for a subject.
pub fn build(subject: &Subject) -> (&'static str, String) {
    match subject {
        Subject::Gate { gate, center, activation } => (
            GATE_SYSTEM,
            format!(
                "My gate {} ({}) sits in the {} center and is {}.\n\
                 Keynote: {}\n\n\
                 Explain what this gate means for me, with practical guidance and its \
                 shadow and gift expressions. Keep it warm and concrete.",
                gate.number,
                gate.name,
                center,
                awareness(*activation),
                gate.description
            ),
        ),
        Subject::Channel(channel) => (
            CHANNEL_SYSTEM,
            format!(
                "My channel {} ({}) connects the {} and {} centers through gates {} and {}.\n\n\
                 Explain what it brings to my life, how to work with its energy, and how it \
                 affects my relationships. Make it personal and practical.",
                channel.id(),
                channel.name,
                channel.centers[0],
                channel.centers[1],
                channel.gates[0],
                channel.gates[1]
            ),
        ),
        Subject::Center { center, defined } => (
            CENTER_SYSTEM,
            format!(
                "My {} center is {}. What does that mean for me day to day?",
                center,
                if *defined { "defined" } else { "undefined (open)" }
            ),
        ),
    }
}
