//! Heuristic extraction of character-description sentences.
//!
//! Given free-form narrative text, [`extract_descriptions`] keeps the
//! sentences that plausibly describe a character's physical appearance, as
//! seed material for portrait prompts. This is a keyword heuristic, not NLP:
//! a sentence qualifies only if it pairs a copula/possession verb with a
//! physical-trait word. That rejects action sentences ("She ran toward the
//! house") while accepting description sentences ("She was tall, with dark
//! hair"), at the cost of missing descriptions phrased without a listed
//! verb ("Dark hair framed her face").

/// Copula/possession markers; a description needs at least one.
const COPULA_MARKERS: [&str; 3] = [" is ", " was ", " had "];

/// Physical-trait markers; a description needs at least one.
const TRAIT_MARKERS: [&str; 8] = [
    " hair",
    " eyes",
    " tall",
    " short",
    " wearing",
    " face",
    " looked",
    " appearance",
];

/// Extract character-description sentences from narrative text.
///
/// The text is split into sentence-like units on runs of `.`, `!`, or `?`.
/// Units that are empty after trimming are dropped; the rest are kept, in
/// original order, when their lowercased form contains both a copula marker
/// and a trait marker. Matching units are returned as the original trimmed
/// sentence text, duplicates included.
///
/// Pure and total: empty or whitespace-only input yields an empty vec.
///
/// # Examples
///
/// ```
/// use mindmeld_core::extract_descriptions;
///
/// let story = "She was tall, with dark hair. He ran quickly.";
/// assert_eq!(
///     extract_descriptions(story),
///     vec!["She was tall, with dark hair"],
/// );
/// ```
pub fn extract_descriptions(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty() && is_description(sentence))
        .map(str::to_owned)
        .collect()
}

fn is_description(sentence: &str) -> bool {
    let normalized = sentence.to_lowercase();
    COPULA_MARKERS.iter().any(|m| normalized.contains(m))
        && TRAIT_MARKERS.iter().any(|m| normalized.contains(m))
}
