//! The nine energy centers and their gate membership.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    #[serde(rename = "Solar Plexus")]
    SolarPlexus,
    Spleen,
    Sacral,
    Root,
}

impl Center {
    pub const ALL: [Center; 9] = [
        Center::Head,
        Center::Ajna,
        Center::Throat,
        Center::G,
        Center::Heart,
        Center::SolarPlexus,
        Center::Spleen,
        Center::Sacral,
        Center::Root,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Center::Head => "Head",
            Center::Ajna => "Ajna",
            Center::Throat => "Throat",
            Center::G => "G",
            Center::Heart => "Heart",
            Center::SolarPlexus => "Solar Plexus",
            Center::Spleen => "Spleen",
            Center::Sacral => "Sacral",
            Center::Root => "Root",
        }
    }

    /// Member gates, in the order they sit around the center's outline.
    pub fn gates(&self) -> &'static [u8] {
        match self {
            Center::Head => &[64, 61, 63],
            Center::Ajna => &[47, 24, 4, 17, 43, 11],
            Center::Throat => &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16],
            Center::G => &[1, 13, 25, 46, 2, 15, 10, 7],
            Center::Heart => &[21, 40, 26, 51],
            Center::SolarPlexus => &[6, 37, 22, 36, 30, 55, 49],
            Center::Spleen => &[48, 57, 44, 50, 32, 28, 18],
            Center::Sacral => &[5, 14, 29, 59, 9, 3, 42, 27, 34],
            Center::Root => &[53, 60, 52, 19, 39, 41, 58, 38, 54],
        }
    }

    pub fn description(&self, defined: bool) -> &'static str {
        match (self, defined) {
            (Center::Head, true) => "Consistent mental pressure and inspiration; reliable access to questions and ideas.",
            (Center::Head, false) => "Open to mental pressure from others; can become wise about which questions matter.",
            (Center::Ajna, true) => "Consistent way of processing and conceptualising; reliable mental certainty.",
            (Center::Ajna, false) => "Open to many ways of thinking; can be wise about perspectives and opinions.",
            (Center::Throat, true) => "Consistent way of speaking and manifesting; reliable self-expression.",
            (Center::Throat, false) => "Open to expression from others; can be wise about when and how to speak.",
            (Center::G, true) => "Consistent sense of identity, love and direction.",
            (Center::G, false) => "Open to direction from others; can be wise about identity and place.",
            (Center::Heart, true) => "Consistent willpower and drive to make and keep promises.",
            (Center::Heart, false) => "Open to willpower from others; can be wise about self-worth and ego.",
            (Center::SolarPlexus, true) => "Consistent emotional wave; clarity comes over time rather than in the moment.",
            (Center::SolarPlexus, false) => "Open to emotions from others; can be wise about emotional climates.",
            (Center::Spleen, true) => "Consistent intuition and survival instinct; reliable in-the-moment awareness.",
            (Center::Spleen, false) => "Open to intuition from others; can be wise about health and wellbeing.",
            (Center::Sacral, true) => "Consistent life force and work energy; sustainable vitality.",
            (Center::Sacral, false) => "Open to life force from others; can be wise about when enough is enough.",
            (Center::Root, true) => "Consistent adrenal pressure and drive to get things moving.",
            (Center::Root, false) => "Open to pressure from others; can be wise about stress and timing.",
        }
    }

    /// Sort rank used when listing channels, lowest first.
    pub fn hierarchy_rank(&self) -> u8 {
        match self {
            Center::Root => 1,
            Center::Spleen => 2,
            Center::Sacral => 3,
            Center::SolarPlexus => 4,
            Center::G => 5,
            Center::Heart => 6,
            Center::Throat => 7,
            Center::Ajna => 8,
            Center::Head => 9,
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The center a gate belongs to.
pub fn center_of(gate: u8) -> Option<Center> {
    Center::ALL
        .into_iter()
        .find(|center| center.gates().contains(&gate))
}
