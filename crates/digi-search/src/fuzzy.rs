//! Approximate substring matching and entry scoring.
//!
//! Scores follow the usual fuzzy-search convention: `0.0` is a perfect
//! match, `1.0` is a complete mismatch. A field score is the number of edit
//! errors of the best alignment of the pattern anywhere in the field,
//! divided by the pattern length. Where in the field the match occurs does
//! not matter.

#[cfg(test)]
use crate::catalog::CatalogEntry;

/// Default match threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Floor for non-exact field scores, so a substring hit never ties a full
/// equality.
const MIN_FIELD_SCORE: f64 = 0.001;

/// Fuzzy matcher over an entry's title and description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    /// Create a matcher; `threshold` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    #[cfg(test)]
    fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score `text` against a pattern. Matching ignores case.
    ///
    /// Returns `None` when the best alignment exceeds the threshold or the
    /// text is blank.
    #[cfg(test)]
    fn field_score(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern = Pattern::new(pattern);
        self.score_field(&pattern, text)
    }

    /// Combined score of an entry, or `None` if neither field matches.
    ///
    /// Each matching field contributes `score^(0.5 * norm)`, where `norm`
    /// is `1/sqrt(tokens)` of that field. Short fields therefore weigh more
    /// than long ones. Contributions are multiplied.
    #[cfg(test)]
    fn score_entry(&self, pattern: &str, entry: &CatalogEntry) -> Option<f64> {
        let pattern = Pattern::new(pattern);
        self.score_fields(&pattern, [entry.title.as_str(), entry.description.as_str()])
    }

    pub(crate) fn score_fields<'a>(
        &self,
        pattern: &Pattern,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Option<f64> {
        // Both keys carry equal weight, normalised to sum to one
        const KEY_WEIGHT: f64 = 0.5;

        let mut total = 1.0;
        let mut matched = false;
        for text in fields {
            let Some(score) = self.score_field(pattern, text) else {
                continue;
            };
            matched = true;
            let score = if score <= 0.0 { f64::EPSILON } else { score };
            total *= score.powf(KEY_WEIGHT * field_norm(text));
        }
        matched.then_some(total)
    }

    fn score_field(&self, pattern: &Pattern, text: &str) -> Option<f64> {
        if pattern.chars.is_empty() || text.trim().is_empty() {
            return None;
        }

        let text_lower = text.to_lowercase();
        if text_lower == pattern.lower {
            return Some(0.0);
        }

        let text_chars: Vec<char> = text_lower.chars().collect();
        let errors = substring_distance(&pattern.chars, &text_chars);
        #[allow(clippy::cast_precision_loss)]
        let score = errors as f64 / pattern.chars.len() as f64;

        (score <= self.threshold).then_some(score.max(MIN_FIELD_SCORE))
    }
}

/// A lowercased query, prepared once per search.
pub(crate) struct Pattern {
    lower: String,
    chars: Vec<char>,
}

impl Pattern {
    pub(crate) fn new(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let chars = lower.chars().collect();
        Self { lower, chars }
    }
}

/// Minimum edit distance between `pattern` and any substring of `text`.
///
/// Insertions, deletions and substitutions each cost one. Leading and
/// trailing text is free.
pub(crate) fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    // Row i holds the cost of matching pattern[..i] ending at each text position
    let mut prev = vec![0usize; text.len() + 1];
    let mut cur = vec![0usize; text.len() + 1];

    for (i, &p) in pattern.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &t) in text.iter().enumerate() {
            let substitute = prev[j] + usize::from(p != t);
            cur[j + 1] = substitute.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}

/// Field-length norm, rounded to three decimals.
fn field_norm(text: &str) -> f64 {
    let tokens = text.split(' ').filter(|t| !t.is_empty()).count().max(1);
    #[allow(clippy::cast_precision_loss)]
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
