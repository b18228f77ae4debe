//! Per-pet stat block and its range invariant.

use serde::{Deserialize, Deserializer, Serialize};

pub const STAT_MIN: f64 = 0.0;
pub const STAT_MAX: f64 = 100.0;

/// Clamp a stat into `[0, 100]`.
pub fn clamp_stat(v: f64) -> f64 {
    v.clamp(STAT_MIN, STAT_MAX)
}

/// The five numeric stats plus the sleep toggle.
/// Every numeric field lies in `[0, 100]` at rest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PetStats {
    pub hunger:      f64,
    pub happiness:   f64,
    pub cleanliness: f64,
    pub energy:      f64,
    pub health:      f64,
    pub sleeping:    bool,
}

impl Default for PetStats {
    /// Stats of a freshly acquired pet.
    fn default() -> Self {
        Self {
            hunger:      78.0,
            happiness:   72.0,
            cleanliness: 70.0,
            energy:      75.0,
            health:      90.0,
            sleeping:    false,
        }
    }
}

impl PetStats {
    pub fn in_range(&self) -> bool {
        self.numeric().iter().all(|v| v.is_finite() && (STAT_MIN..=STAT_MAX).contains(v))
    }

    pub fn numeric(&self) -> [f64; 5] {
        [self.hunger, self.happiness, self.cleanliness, self.energy, self.health]
    }

    /// Force every field back into range. Non-finite values are replaced
    /// by the fresh-pet value for that field. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let fresh = PetStats::default();
        let before = *self;
        let fix = |v: f64, fallback: f64| if v.is_finite() { clamp_stat(v) } else { fallback };
        self.hunger = fix(self.hunger, fresh.hunger);
        self.happiness = fix(self.happiness, fresh.happiness);
        self.cleanliness = fix(self.cleanliness, fresh.cleanliness);
        self.energy = fix(self.energy, fresh.energy);
        self.health = fix(self.health, fresh.health);
        // NaN != NaN, so compare bit patterns.
        before.numeric().iter().zip(self.numeric().iter()).any(|(a, b)| a.to_bits() != b.to_bits())
    }
}

/// Accept any JSON for a pet's stats; anything that is not a stats object
/// becomes fresh stats instead of failing the whole save.
pub(crate) fn lenient_stats<'de, D>(deserializer: D) -> Result<PetStats, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value::<PetStats>(value) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            log::warn!("Replacing malformed pet stats: {e}");
            Ok(PetStats::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_and_replaces_non_finite() {
        let mut stats = PetStats {
            hunger: 140.0,
            happiness: -3.0,
            cleanliness: f64::NAN,
            energy: 50.0,
            health: f64::INFINITY,
            sleeping: true,
        };
        assert!(stats.sanitize());
        assert_eq!(stats.hunger, 100.0);
        assert_eq!(stats.happiness, 0.0);
        assert_eq!(stats.cleanliness, 70.0);
        assert_eq!(stats.health, 90.0);
        assert!(stats.sleeping);
        assert!(stats.in_range());
        assert!(!stats.sanitize());
    }

    #[test]
    fn partial_stats_fill_from_fresh_values() {
        let stats: PetStats = serde_json::from_str(r#"{ "hunger": 12 }"#).unwrap();
        assert_eq!(stats.hunger, 12.0);
        assert_eq!(stats.energy, 75.0);
        assert!(!stats.sleeping);
    }
}
