//! Hit-die value object and parsing
//!
//! Supports die formulas like "d10" or "1d10". Rolls take an injected RNG so
//! callers control randomness (seeded in tests, thread RNG in production).

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when parsing a die formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty die formula")]
    Empty,
    /// Invalid format - expected dY or 1dY
    #[error("Invalid die format: {0}")]
    InvalidFormat(String),
    /// Not a hit-die size (d6, d8, d10, d12)
    #[error("Invalid hit die size: d{0}")]
    InvalidDieSize(u8),
}

/// A class hit die (d6, d8, d10, or d12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDie(u8);

impl HitDie {
    pub const D6: HitDie = HitDie(6);
    pub const D8: HitDie = HitDie(8);
    pub const D10: HitDie = HitDie(10);
    pub const D12: HitDie = HitDie(12);

    /// Create a hit die, validating the size.
    pub fn new(sides: u8) -> Result<Self, DiceParseError> {
        match sides {
            6 | 8 | 10 | 12 => Ok(Self(sides)),
            _ => Err(DiceParseError::InvalidDieSize(sides)),
        }
    }

    /// Parse a formula like "d10" or "1d10".
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let sides_str = input
            .strip_prefix("1d")
            .or_else(|| input.strip_prefix('d'))
            .ok_or_else(|| DiceParseError::InvalidFormat(input.clone()))?;

        let sides: u8 = sides_str
            .parse()
            .map_err(|_| DiceParseError::InvalidFormat(input.clone()))?;

        Self::new(sides)
    }

    /// Number of sides.
    pub fn sides(&self) -> u8 {
        self.0
    }

    /// Maximum face value (level-1 hit points use this, not a roll).
    pub fn max(&self) -> u8 {
        self.0
    }

    /// Roll this die once with the given RNG.
    pub fn roll(&self, rng: &mut impl Rng) -> u8 {
        rng.gen_range(1..=self.0)
    }
}

impl fmt::Display for HitDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(HitDie::parse("d10").unwrap(), HitDie::D10);
        assert_eq!(HitDie::parse("d6").unwrap(), HitDie::D6);
    }

    #[test]
    fn test_parse_with_count() {
        assert_eq!(HitDie::parse("1d12").unwrap(), HitDie::D12);
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(HitDie::parse("  D8  ").unwrap(), HitDie::D8);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(HitDie::parse(""), Err(DiceParseError::Empty)));
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(matches!(
            HitDie::parse("10"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            HitDie::parse("2d10"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_die_size() {
        assert!(matches!(
            HitDie::new(7),
            Err(DiceParseError::InvalidDieSize(7))
        ));
        assert!(matches!(
            HitDie::parse("d20"),
            Err(DiceParseError::InvalidDieSize(20))
        ));
    }

    #[test]
    fn test_roll_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let die = HitDie::D10;
        for _ in 0..100 {
            let roll = die.roll(&mut rng);
            assert!((1..=10).contains(&roll));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(HitDie::D8.to_string(), "d8");
        assert_eq!(HitDie::D12.to_string(), "d12");
    }
}
