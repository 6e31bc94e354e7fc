//! Ordinal tier bands bucketing the continuous 0–10 score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named score band.
///
/// Variants are declared in ascending order so `Ord` follows the score
/// scale. `Unrated` covers labels the client does not recognise and scores
/// outside 0–10; it sorts below every named band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    Unrated,
    Sub3,
    Sub5,
    Normie,
    Htn,
    Chadlite,
    Chad,
    Adam,
}

impl Tier {
    /// Every tier, lowest first.
    pub const ALL: [Tier; 8] = [
        Tier::Unrated,
        Tier::Sub3,
        Tier::Sub5,
        Tier::Normie,
        Tier::Htn,
        Tier::Chadlite,
        Tier::Chad,
        Tier::Adam,
    ];

    /// Exact label used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Unrated => "Unrated",
            Tier::Sub3 => "Sub 3",
            Tier::Sub5 => "Sub 5",
            Tier::Normie => "Normie",
            Tier::Htn => "HTN",
            Tier::Chadlite => "Chadlite",
            Tier::Chad => "Chad",
            Tier::Adam => "Adam",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::Unrated => "Score outside the known bands",
            Tier::Sub3 => "Severe facial underdevelopment, multiple failos",
            Tier::Sub5 => "Below average, notable failos present",
            Tier::Normie => "Average appearance, unremarkable features",
            Tier::Htn => "High-tier Normie, some attractive features",
            Tier::Chadlite => "Attractive, mostly positive features",
            Tier::Chad => "Very attractive, minimal failos",
            Tier::Adam => "Near-perfect facial harmony and aesthetics",
        }
    }

    /// Parse a wire label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Tier {
        let wanted = label.trim();
        Tier::ALL
            .into_iter()
            .skip(1)
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Tier::Unrated)
    }

    /// Bucket a score into its band.
    ///
    /// Bands are half-open on the upper bound except `Adam`, which closes
    /// at 10.0.
    pub fn from_score(score: f64) -> Tier {
        if !(0.0..=10.0).contains(&score) {
            return Tier::Unrated;
        }
        match score {
            s if s < 3.0 => Tier::Sub3,
            s if s < 5.0 => Tier::Sub5,
            s if s < 6.0 => Tier::Normie,
            s if s < 7.0 => Tier::Htn,
            s if s < 8.0 => Tier::Chadlite,
            s if s < 9.0 => Tier::Chad,
            _ => Tier::Adam,
        }
    }
}

impl From<String> for Tier {
    fn from(label: String) -> Self {
        Tier::from_label(&label)
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.label().to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_band_edges() {
        assert_eq!(Tier::from_score(0.0), Tier::Sub3);
        assert_eq!(Tier::from_score(2.99), Tier::Sub3);
        assert_eq!(Tier::from_score(3.0), Tier::Sub5);
        assert_eq!(Tier::from_score(5.0), Tier::Normie);
        assert_eq!(Tier::from_score(6.95), Tier::Htn);
        assert_eq!(Tier::from_score(7.5), Tier::Chadlite);
        assert_eq!(Tier::from_score(8.0), Tier::Chad);
        assert_eq!(Tier::from_score(9.0), Tier::Adam);
        assert_eq!(Tier::from_score(10.0), Tier::Adam);
    }

    #[test]
    fn test_from_score_out_of_range() {
        assert_eq!(Tier::from_score(-0.1), Tier::Unrated);
        assert_eq!(Tier::from_score(10.01), Tier::Unrated);
        assert_eq!(Tier::from_score(f64::NAN), Tier::Unrated);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::Sub3 < Tier::Sub5);
        assert!(Tier::Htn < Tier::Chadlite);
        assert!(Tier::Chad < Tier::Adam);
        assert!(Tier::Unrated < Tier::Sub3);
        let mut sorted = Tier::ALL;
        sorted.sort();
        assert_eq!(sorted, Tier::ALL);
    }

    #[test]
    fn test_label_round_trip_through_serde() {
        for tier in Tier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.label()));
            let back: Tier = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tier);
        }
    }

    #[test]
    fn test_unknown_label_is_unrated() {
        let tier: Tier = serde_json::from_str("\"Gigachad\"").unwrap();
        assert_eq!(tier, Tier::Unrated);
    }

    #[test]
    fn test_label_match_is_lenient() {
        assert_eq!(Tier::from_label(" chadlite "), Tier::Chadlite);
        assert_eq!(Tier::from_label("sub 5"), Tier::Sub5);
        assert_eq!(Tier::from_label("htn"), Tier::Htn);
    }
}
