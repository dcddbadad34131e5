//! Offline template hints: a random template wrapped around the opening
//! words of the definition. No model, no network.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::normalize::normalize_definition;

pub const TEMPLATES: &[&str] = &[
    "Something related to {core}.",
    "Often associated with {core}.",
    "You might think of {core} when you hear it.",
    "Found in places connected to {core}.",
    "A thing you'd encounter when dealing with {core}.",
    "Sometimes seen as {core}.",
    "Used when {core}.",
    "Commonly involved in {core}.",
    "It can be linked to {core}.",
    "A hint: think about {core}.",
];

const CORE_MIN_WORDS: usize = 8;
const CORE_MAX_WORDS: usize = 12;

/// Fill a random template with the first 8-12 words of the definition.
pub fn procedural_hint<R: Rng>(definition: &str, rng: &mut R) -> String {
    let definition = normalize_definition(definition);
    if definition.is_empty() {
        return String::new();
    }

    let take = rng.gen_range(CORE_MIN_WORDS..=CORE_MAX_WORDS);
    let core = definition.split_whitespace().take(take).collect::<Vec<_>>().join(" ");
    let template = TEMPLATES.choose(rng).copied().unwrap_or("{core}.");
    capitalize(template.replace("{core}", &core).trim())
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn blank_definition_gives_empty_hint() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(procedural_hint("", &mut rng), "");
        assert_eq!(procedural_hint("  \n ", &mut rng), "");
    }

    #[test]
    fn uses_a_template_around_the_leading_words() {
        let mut rng = StdRng::seed_from_u64(42);
        let definition = "A Large slow moving mass of ice formed from compacted snow over many \
                          centuries in cold regions";
        let hint = procedural_hint(definition, &mut rng);

        assert!(hint.contains("a large slow moving mass of ice formed"));
        assert!(!hint.contains("regions"));
        let first = hint.chars().next().unwrap();
        assert!(first.is_uppercase());
        assert!(TEMPLATES.iter().any(|t| {
            let (head, _) = t.split_once("{core}").unwrap();
            hint.to_lowercase().starts_with(&head.to_lowercase())
        }));
    }

    #[test]
    fn same_seed_same_hint() {
        let definition = "Frozen water that floats on lakes and rivers in winter time here";
        let a = procedural_hint(definition, &mut StdRng::seed_from_u64(3));
        let b = procedural_hint(definition, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
