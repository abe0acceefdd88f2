//! GitHub-style heading slugs.

use std::collections::HashMap;

/// Convert heading text to an anchor slug.
///
/// Lowercases the text, drops every character that is not a letter, digit,
/// `-`, `_` or space, then turns each space into `-`. Consecutive spaces are
/// not collapsed, so `"a  b"` becomes `"a--b"`. Non-ASCII letters survive.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Issues unique slugs within one document.
///
/// The first occurrence of a slug is returned as is; repeats get `-1`, `-2`
/// and so on. A suffixed slug also counts as taken, so a later heading that
/// literally slugs to `faq-1` is moved on to the next free suffix.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `text`, disambiguating against earlier calls.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();

        while self.occurrences.contains_key(&candidate) {
            let count = self.occurrences.entry(base.clone()).or_default();
            *count += 1;
            candidate = format!("{base}-{count}");
        }

        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}
