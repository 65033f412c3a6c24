//! Concept representation cache.
//!
//! A concept is shown as `#<id>: ` followed by its best source-language terms.

/// Maximum number of terms listed in a representation.
pub const REPR_TERMS: usize = 4;

/// Maximum length, in characters, of the term list.
pub const REPR_MAX_CHARS: usize = 200;

/// Sort rank of an administrative status, by TBX representation.
///
/// Lower ranks sort first. Unknown statuses rank like no status at all.
#[must_use]
pub fn status_rank(status_representation: Option<&str>) -> u8 {
    match status_representation {
        Some("preferredTerm-admn-sts") => 0,
        Some("admittedTerm-admn-sts") => 2,
        Some("supersededTerm-admn-sts") => 3,
        Some("deprecatedTerm-admn-sts") => 4,
        _ => 1,
    }
}

/// A source-language term as seen by the cache builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedTerm<'a> {
    pub text: &'a str,
    pub status_representation: Option<&'a str>,
}

/// Build the representation string for a concept.
#[must_use]
pub fn concept_repr(concept_id: i64, terms: &[RankedTerm<'_>]) -> String {
    let mut sorted: Vec<_> = terms.to_vec();
    sorted.sort_by(|a, b| {
        status_rank(a.status_representation)
            .cmp(&status_rank(b.status_representation))
            .then_with(|| a.text.cmp(b.text))
    });
    let listed = sorted
        .iter()
        .take(REPR_TERMS)
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(", ");
    let listed: String = listed.chars().take(REPR_MAX_CHARS).collect();
    format!("#{concept_id}: {listed}")
}
