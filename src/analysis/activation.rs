//! Conscious / unconscious classification of activated gates.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Activation;

/// Classifies every activated gate.
///
/// `design` holds red-column gates, `personality` black-column gates. The
/// result's keys are exactly the union of both sets.
pub fn classify(design: &BTreeSet<u8>, personality: &BTreeSet<u8>) -> BTreeMap<u8, Activation> {
    design
        .union(personality)
        .map(|&gate| {
            let activation = match (design.contains(&gate), personality.contains(&gate)) {
                (true, true) => Activation::Both,
                (false, true) => Activation::ConsciousOnly,
                _ => Activation::UnconsciousOnly,
            };
            (gate, activation)
        })
        .collect()
}

/// Gates with the given activation, ascending.
pub fn gates_with(activations: &BTreeMap<u8, Activation>, wanted: Activation) -> Vec<u8> {
    activations
        .iter()
        .filter(|(_, a)| **a == wanted)
        .map(|(g, _)| *g)
        .collect()
}
