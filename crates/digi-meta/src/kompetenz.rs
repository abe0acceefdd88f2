//! Competency areas used to tag documents and catalog entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three competency areas of the curriculum.
///
/// Serialized as its single-letter symbol (`"T"`, `"G"`, `"I"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kompetenz {
    /// Technological perspective.
    T,
    /// Societal perspective.
    G,
    /// Interaction perspective.
    I,
}

impl Kompetenz {
    /// Single-letter symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::T => "T",
            Self::G => "G",
            Self::I => "I",
        }
    }

    /// Human-readable description of the competency area.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::T => {
                "Strukturen und Funktionen digitaler informatischer und medialer Systeme und Werkzeuge"
            }
            Self::G => "Gesellschaftliche Wechselwirkungen durch den Einsatz digitaler Technologien",
            Self::I => "Interaktion in Form von Nutzung, Handlung und Subjektivierung",
        }
    }
}

impl fmt::Display for Kompetenz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_symbol() {
        let json = serde_json::to_string(&Kompetenz::G).unwrap();
        assert_eq!(json, "\"G\"");

        let parsed: Kompetenz = serde_json::from_str("\"I\"").unwrap();
        assert_eq!(parsed, Kompetenz::I);
    }

    #[test]
    fn test_serde_rejects_unknown_symbol() {
        for symbol in ["\"X\"", "\"t\""] {
            let result: Result<Kompetenz, _> = serde_json::from_str(symbol);
            assert!(result.is_err(), "{symbol}");
        }
    }

    #[test]
    fn test_display_matches_symbol() {
        for k in [Kompetenz::T, Kompetenz::G, Kompetenz::I] {
            assert_eq!(k.to_string(), k.symbol());
            assert!(!k.description().is_empty());
        }
    }
}
