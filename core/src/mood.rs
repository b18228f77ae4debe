//! Mood classification. Mood is derived, never stored: it is recomputed
//! from the stats whenever it is needed.

use crate::stats::PetStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mood {
    Critical,
    Sleeping,
    Hungry,
    Dirty,
    Tired,
    Sick,
    Happy,
    Okay,
}

impl Mood {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Sleeping => "Sleeping",
            Self::Hungry   => "Hungry",
            Self::Dirty    => "Dirty",
            Self::Tired    => "Tired",
            Self::Sick     => "Sick",
            Self::Happy    => "Happy",
            Self::Okay     => "Okay",
        }
    }

    /// Display color as `#RRGGBB`.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#DC2626",
            Self::Sleeping => "#8B5CF6",
            Self::Hungry   => "#F97316",
            Self::Dirty    => "#A16207",
            Self::Tired    => "#BE185D",
            Self::Sick     => "#EAB308",
            Self::Happy    => "#22C55E",
            Self::Okay     => "#0EA5E9",
        }
    }

    /// Moods under which passive income accrues.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Happy | Self::Okay)
    }
}

/// Classify stats. Checks run in priority order; the first match wins.
pub fn mood_from_stats(s: &PetStats) -> Mood {
    if s.health <= 0.0 {
        return Mood::Critical;
    }
    if s.sleeping {
        return Mood::Sleeping;
    }
    if s.hunger < 20.0 {
        return Mood::Hungry;
    }
    if s.cleanliness < 20.0 {
        return Mood::Dirty;
    }
    if s.energy < 20.0 {
        return Mood::Tired;
    }
    if s.health < 45.0 {
        return Mood::Sick;
    }
    if s.happiness > 75.0
        && s.hunger > 45.0
        && s.cleanliness > 45.0
        && s.energy > 45.0
        && s.health > 70.0
    {
        return Mood::Happy;
    }
    Mood::Okay
}
