//! Flavor text shown in speech bubbles and the wave summary

/// Chop-time quips (speech bubbles)
pub const CHOP_QUOTES: &[&str] = &[
    "This tree owes me money.",
    "Cardio? No. Lumber therapy.",
    "Bark is worse than its bite. Barely.",
    "Every chop is a tiny life decision.",
    "I was promised a desk job.",
    "Timber! Or at least, soon.",
    "My shoulders have filed a complaint.",
    "Photosynthesize THIS.",
    "One day I'll buy a chainsaw. Not today.",
    "Splinters are just wood hugs.",
    "The forest will remember this.",
    "Wood you please fall over?",
];

/// Messages for the every-tenth-wave summary overlay
pub const SUMMARY_QUOTES: &[&str] = &[
    "Ten trees down. The forest is drafting a restraining order.",
    "Another boss felled. Your chiropractor sends regards.",
    "Progress! Also blisters.",
    "The lumber economy thanks you for your service.",
    "Somewhere, a squirrel is furious.",
    "You are now legally a lumberjack. Probably.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_non_empty() {
        assert!(!CHOP_QUOTES.is_empty());
        assert!(!SUMMARY_QUOTES.is_empty());
        assert!(CHOP_QUOTES.iter().all(|q| !q.trim().is_empty()));
    }
}
