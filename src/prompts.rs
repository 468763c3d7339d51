// Canned reflection prompts, organized by importance level and phrased as
// statements rather than questions.

use rand::seq::IndexedRandom;

use crate::classify::Importance;

type PromptPair = [&'static str; 2];

const TRIVIAL: [PromptPair; 2] = [
    [
        "Consider your gut feeling about this choice.",
        "Think about how this might affect the rest of your day.",
    ],
    [
        "Imagine what a satisfying outcome would look like.",
        "Consider if you're missing any information to decide.",
    ],
];

const ROUTINE: [PromptPair; 2] = [
    [
        "Reflect on how this aligns with your short-term goals.",
        "Consider the trade-offs you're making with this choice.",
    ],
    [
        "Think about what you've learned from similar past decisions.",
        "Consider how this might affect your weekly routine.",
    ],
];

const COMPLEX: [PromptPair; 2] = [
    [
        "Consider which values are most important in this decision.",
        "Think about the worst possible outcome of each option.",
    ],
    [
        "Imagine how this decision might look different in 6 months.",
        "Consider what someone you respect would advise here.",
    ],
];

const LIFE_ALTERING: [PromptPair; 2] = [
    [
        "Reflect on how this aligns with your core values and vision.",
        "Consider what fears might be influencing your thinking.",
    ],
    [
        "Think about how this might affect your key relationships.",
        "Imagine what would make you proud looking back on this choice.",
    ],
];

pub fn prompt_sets_for(importance: Importance) -> &'static [PromptPair; 2] {
    match importance {
        Importance::Trivial => &TRIVIAL,
        Importance::Routine => &ROUTINE,
        Importance::Complex => &COMPLEX,
        Importance::LifeAltering => &LIFE_ALTERING,
    }
}

/// Pick one of the prompt pairs for the given importance level at random.
pub fn pick_reflection_prompts(importance: Importance) -> PromptPair {
    let sets = prompt_sets_for(importance);
    let mut rng = rand::rng();
    sets.choose(&mut rng).copied().unwrap_or(sets[0])
}
