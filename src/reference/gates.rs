//! Gate names and keynote descriptions.

#[derive(Debug, PartialEq, Eq)]
pub struct Gate {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
}

const fn g(number: u8, name: &'static str, description: &'static str) -> Gate {
    Gate {
        number,
        name,
        description,
    }
}

/// Indexed by `number - 1`.
pub static GATES: [Gate; 64] = [
    g(1, "Self-Expression", "Creative energy seeking an individual voice and direction."),
    g(2, "Direction of the Self", "Receptive sense of where life and resources should go."),
    g(3, "Ordering", "Bringing order out of the confusion of new beginnings."),
    g(4, "Formulization", "Mental answers and formulas, right or wrong, that ease doubt."),
    g(5, "Fixed Rhythms", "Natural timing and routine; knowing when to act and when to wait."),
    g(6, "Friction", "Emotional boundaries that regulate intimacy and conflict."),
    g(7, "The Role of the Self", "Leadership through guiding the direction of others."),
    g(8, "Contribution", "Making a distinct contribution by being oneself in public."),
    g(9, "Focus", "The power to concentrate on detail."),
    g(10, "Behavior of the Self", "Love of self expressed through authentic behaviour."),
    g(11, "Ideas", "A stream of concepts and images to be shared, not necessarily acted on."),
    g(12, "Caution", "Careful, mood-dependent articulation of the new."),
    g(13, "The Listener", "Holding the stories and secrets of others."),
    g(14, "Power Skills", "Energy to accumulate and direct resources."),
    g(15, "Extremes", "Embracing the full spectrum of human rhythms."),
    g(16, "Skills", "Enthusiasm for perfecting a talent through repetition."),
    g(17, "Opinions", "Organising information into a point of view."),
    g(18, "Correction", "Instinct to spot what is wrong and improve it."),
    g(19, "Wanting", "Sensitivity to basic needs for food, shelter and belonging."),
    g(20, "The Now", "Awareness and expression in the present moment."),
    g(21, "The Hunter", "Control over one's material environment."),
    g(22, "Openness", "Grace and emotional openness when the mood is right."),
    g(23, "Assimilation", "Translating individual insight into simple words."),
    g(24, "Rationalization", "Returning to a thought again and again until it resolves."),
    g(25, "The Spirit of the Self", "Universal love and innocence."),
    g(26, "The Egoist", "Persuasion and the art of the deal."),
    g(27, "Caring", "Nourishing and protecting others."),
    g(28, "The Game Player", "Searching for purpose through struggle and risk."),
    g(29, "Perseverance", "Saying yes and seeing the experience through."),
    g(30, "Recognition of Feelings", "Desire and the intensity of new experience."),
    g(31, "Leading", "Influence granted through being elected by others."),
    g(32, "Continuity", "Instinct for what will endure and what will fail."),
    g(33, "Privacy", "Retreat in order to reflect and later share."),
    g(34, "Power", "Pure independent sacral power to be busy."),
    g(35, "Change", "Hunger for progress and new experience."),
    g(36, "Crisis", "Emotional inexperience that turns into depth."),
    g(37, "Friendship", "Bonds of family and community maintained by touch and agreement."),
    g(38, "The Fighter", "Struggle against opposition to find meaning."),
    g(39, "Provocation", "Provoking spirit in others, and in oneself."),
    g(40, "Aloneness", "Work in exchange for time alone to recover."),
    g(41, "Contraction", "The seed of fantasy and desire for new experience."),
    g(42, "Growth", "Finishing cycles and bringing things to maturity."),
    g(43, "Insight", "Inner knowing that breaks through suddenly."),
    g(44, "Alertness", "Instinctive memory of patterns from the past."),
    g(45, "The Gatherer", "The ruler who distributes resources to the tribe."),
    g(46, "Determination of the Self", "Love of the body and being in the right place by chance."),
    g(47, "Realization", "Making sense of past experience."),
    g(48, "Depth", "Depth of knowledge and the fear of inadequacy."),
    g(49, "Principles", "Acceptance or rejection based on principles."),
    g(50, "Values", "Guardianship of the values and laws of the tribe."),
    g(51, "Shock", "Initiation through shock; the courage to leap."),
    g(52, "Stillness", "Focused inaction; the mountain."),
    g(53, "Beginnings", "Pressure to start new cycles."),
    g(54, "Ambition", "Drive for material and spiritual advancement."),
    g(55, "Spirit", "Abundance that depends on mood and emotional spirit."),
    g(56, "Stimulation", "The storyteller who stimulates through ideas."),
    g(57, "Intuitive Clarity", "Acute in-the-moment intuition."),
    g(58, "Vitality", "Joy of life and the drive to improve it."),
    g(59, "Sexuality", "Breaking down barriers to create intimacy."),
    g(60, "Acceptance", "Accepting limitation as the ground for mutation."),
    g(61, "Mystery", "Pressure to know the unknowable."),
    g(62, "Details", "Naming and organising the details."),
    g(63, "Doubt", "Logical doubt that tests patterns."),
    g(64, "Confusion", "Mental pressure to make sense of images from the past."),
];

pub fn gate(number: u8) -> Option<&'static Gate> {
    if number == 0 {
        return None;
    }
    GATES.get(number as usize - 1)
}
