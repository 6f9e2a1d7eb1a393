//! The 36 channels. Each joins two gates sitting in two different centers.

use std::collections::BTreeSet;

use super::centers::Center;

#[derive(Debug, PartialEq, Eq)]
pub struct Channel {
    pub gates: [u8; 2],
    pub centers: [Center; 2],
    pub name: &'static str,
    pub description: &'static str,
}

impl Channel {
    /// Identifier in `low-high` gate order, e.g. `"10-20"`.
    pub fn id(&self) -> String {
        let (a, b) = (self.gates[0].min(self.gates[1]), self.gates[0].max(self.gates[1]));
        format!("{}-{}", a, b)
    }

    /// Defined when both gates are activated; gate order is irrelevant.
    pub fn is_defined(&self, activated: &BTreeSet<u8>) -> bool {
        self.gates.iter().all(|g| activated.contains(g))
    }
}

const fn ch(
    a: u8,
    b: u8,
    ca: Center,
    cb: Center,
    name: &'static str,
    description: &'static str,
) -> Channel {
    Channel {
        gates: [a, b],
        centers: [ca, cb],
        name,
        description,
    }
}

use Center::*;

pub static CHANNELS: [Channel; 36] = [
    ch(1, 8, G, Throat, "Inspiration", "Creative role model; contributing a unique direction to others."),
    ch(2, 14, G, Sacral, "The Beat", "Keeper of the keys; resources directed by a sense of higher direction."),
    ch(3, 60, Sacral, Root, "Mutation", "Energy that pulses between stillness and sudden change."),
    ch(4, 63, Ajna, Head, "Logic", "Mental ease mixed with doubt; testing patterns for the future."),
    ch(5, 15, Sacral, G, "Rhythm", "Being in the flow; natural timing that others attune to."),
    ch(6, 59, SolarPlexus, Sacral, "Mating", "Intimacy and bonding, driven by the emotional wave."),
    ch(7, 31, G, Throat, "The Alpha", "Leadership for good or ill, recognised and invited by others."),
    ch(9, 52, Sacral, Root, "Concentration", "Determined focus; the ability to stay with one thing."),
    ch(10, 20, G, Throat, "Awakening", "Commitment to higher principles expressed in the now."),
    ch(10, 34, G, Sacral, "Exploration", "Following one's own convictions with sustainable power."),
    ch(10, 57, G, Spleen, "Perfected Form", "Survival through intuitive, correct behaviour."),
    ch(11, 56, Ajna, Throat, "Curiosity", "The seeker; stimulating others with ideas and stories."),
    ch(12, 22, Throat, SolarPlexus, "Openness", "Social being whose expression depends on mood and timing."),
    ch(13, 33, G, Throat, "The Prodigal", "Witness and keeper of secrets; sharing lessons from experience."),
    ch(16, 48, Throat, Spleen, "The Wavelength", "Talent deepened through repetition and practice."),
    ch(17, 62, Ajna, Throat, "Acceptance", "Organising detail into opinions that can be shared."),
    ch(18, 58, Spleen, Root, "Judgment", "Drive to correct and perfect patterns for the collective."),
    ch(19, 49, Root, SolarPlexus, "Synthesis", "Sensitivity to needs and the principles of belonging."),
    ch(20, 34, Throat, Sacral, "Charisma", "Busy-ness; thoughts becoming deeds in the moment."),
    ch(20, 57, Throat, Spleen, "The Brainwave", "Penetrating awareness spoken in the now."),
    ch(21, 45, Heart, Throat, "Money", "The material world; management and control of resources."),
    ch(23, 43, Throat, Ajna, "Structuring", "Individual insight put into words; genius to freak."),
    ch(24, 61, Ajna, Head, "Awareness", "The thinker; mulling over mysteries until knowing arrives."),
    ch(25, 51, G, Heart, "Initiation", "Need to be first; competitive courage and spirit."),
    ch(26, 44, Heart, Spleen, "Surrender", "Transmitting lessons from the past; the salesperson."),
    ch(27, 50, Sacral, Spleen, "Preservation", "Custodianship; caring for and nurturing others."),
    ch(28, 38, Spleen, Root, "Struggle", "Stubbornness in finding what makes life worth living."),
    ch(29, 46, Sacral, G, "Discovery", "Succeeding where others fail by committing to experience."),
    ch(30, 41, SolarPlexus, Root, "Recognition", "Focused energy of desire and new experience."),
    ch(32, 54, Spleen, Root, "Transformation", "Driven ambition tempered by instinct for what endures."),
    ch(34, 57, Sacral, Spleen, "Power", "Survival through instinctive, empowered response."),
    ch(35, 36, Throat, SolarPlexus, "Transitoriness", "Jack of all trades; learning through emotional experience."),
    ch(37, 40, SolarPlexus, Heart, "Community", "Bargains and agreements that hold a community together."),
    ch(39, 55, Root, SolarPlexus, "Emoting", "Moodiness as the fuel of spirit and creativity."),
    ch(42, 53, Sacral, Root, "Maturation", "Balanced development through completing cycles."),
    ch(47, 64, Ajna, Head, "Abstraction", "Mental activity mixed with clarity; making sense of the past."),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::centers::center_of;

    #[test]
    fn test_thirty_six_unique_channels() {
        let ids: BTreeSet<String> = CHANNELS.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), 36);
    }

    #[test]
    fn test_channel_centers_match_gate_membership() {
        for channel in CHANNELS.iter() {
            let derived = [center_of(channel.gates[0]), center_of(channel.gates[1])];
            assert_eq!(
                derived,
                [Some(channel.centers[0]), Some(channel.centers[1])],
                "channel {}",
                channel.id()
            );
            assert_ne!(channel.centers[0], channel.centers[1]);
        }
    }

    #[test]
    fn test_is_defined_ignores_gate_order() {
        let channel = CHANNELS.iter().find(|c| c.id() == "10-20").unwrap();
        let forward = BTreeSet::from([10, 20]);
        let reversed = BTreeSet::from([20, 10]);
        assert!(channel.is_defined(&forward));
        assert!(channel.is_defined(&reversed));

        let swapped = Channel {
            gates: [20, 10],
            centers: [Center::Throat, Center::G],
            name: channel.name,
            description: channel.description,
        };
        assert!(swapped.is_defined(&forward));
        assert_eq!(swapped.id(), "10-20");

        assert!(!channel.is_defined(&BTreeSet::from([10])));
    }
}
