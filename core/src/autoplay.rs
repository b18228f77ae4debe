//! A seeded synthetic player for headless runs and soak tests.

use crate::{
    command::ActionKind,
    mood::{mood_from_stats, Mood},
    rng::{PlayerRng, RngStream},
    state::SimulationState,
};

pub struct AutoPlayer {
    rng: PlayerRng,
    /// Probability of reacting on any given tick.
    attentiveness: f64,
}

impl AutoPlayer {
    pub fn new(seed: u64, attentiveness: f64) -> Self {
        Self {
            rng: PlayerRng::new(seed, RngStream::AutoPlayer),
            attentiveness: attentiveness.clamp(0.0, 1.0),
        }
    }

    /// Pick a care action for the active pet, or nothing this tick.
    pub fn choose(&mut self, state: &SimulationState) -> Option<ActionKind> {
        let pet = state.active_pet()?;
        if !self.rng.chance(self.attentiveness) {
            return None;
        }
        match mood_from_stats(&pet.stats) {
            Mood::Critical | Mood::Hungry | Mood::Sick => Some(ActionKind::Feed),
            Mood::Dirty => Some(ActionKind::Clean),
            Mood::Tired => Some(ActionKind::Sleep),
            // Occasionally wake early.
            Mood::Sleeping => self.rng.chance(0.05).then_some(ActionKind::Sleep),
            Mood::Okay | Mood::Happy => {
                let s = &pet.stats;
                if s.happiness < 60.0 && s.energy > 30.0 {
                    Some(ActionKind::Play)
                } else if s.cleanliness < 50.0 {
                    Some(ActionKind::Clean)
                } else if s.hunger < 50.0 {
                    Some(ActionKind::Feed)
                } else {
                    None
                }
            }
        }
    }

    /// Any action, uniformly.
    pub fn random_action(&mut self) -> ActionKind {
        ActionKind::ALL[self.rng.next_u64_below(ActionKind::ALL.len() as u64) as usize]
    }

    /// Gap until the next input, in `[0, max_ms)`.
    pub fn next_gap_ms(&mut self, max_ms: u64) -> i64 {
        self.rng.next_u64_below(max_ms.max(1)) as i64
    }
}
