//! Stat decay, sleep recovery, auto-wake and health.
//!
//! Every pet in the roster decays, not just the active one.

use crate::{
    config::{DecayConfig, HealthConfig, SimConfig},
    event::SimEvent,
    state::SimulationState,
    stats::{clamp_stat, PetStats},
    subsystem::SimSubsystem,
};

/// Advance one pet's stats by `dt_secs`. Pure: same input, same output.
///
/// Each stat is clamped right after its own delta, and every later rule
/// in the same call (happiness penalties, auto-wake, health) reads the
/// clamped values.
pub fn tick_stats(
    stats: &PetStats,
    dt_secs: f64,
    decay: &DecayConfig,
    health: &HealthConfig,
) -> PetStats {
    let mut s = *stats;
    let minutes = dt_secs.max(0.0) / 60.0;

    if s.sleeping {
        s.energy = clamp_stat(s.energy + decay.sleep_energy_gain_per_min * minutes);
        s.hunger = clamp_stat(s.hunger - decay.sleep_hunger_per_min * minutes);
        s.cleanliness = clamp_stat(s.cleanliness - decay.sleep_cleanliness_per_min * minutes);
        s.happiness = clamp_stat(s.happiness + decay.sleep_happiness_gain_per_min * minutes);
        if s.energy >= decay.auto_wake_energy {
            s.sleeping = false;
        }
    } else {
        s.hunger = clamp_stat(s.hunger - decay.awake_hunger_per_min * minutes);
        s.cleanliness = clamp_stat(s.cleanliness - decay.awake_cleanliness_per_min * minutes);
        s.energy = clamp_stat(s.energy - decay.awake_energy_per_min * minutes);

        let mut rate = decay.awake_happiness_per_min;
        if s.hunger < decay.hungry_penalty_below {
            rate += decay.hungry_penalty_per_min;
        }
        if s.cleanliness < decay.dirty_penalty_below {
            rate += decay.dirty_penalty_per_min;
        }
        if s.energy < decay.tired_penalty_below {
            rate += decay.tired_penalty_per_min;
        }
        s.happiness = clamp_stat(s.happiness - rate * minutes);
    }

    let bad = [
        s.hunger < health.critical_hunger_below,
        s.cleanliness < health.critical_cleanliness_below,
        s.energy < health.critical_energy_below,
        s.happiness < health.critical_happiness_below,
    ]
    .into_iter()
    .filter(|b| *b)
    .count();

    if bad > 0 {
        let drain = health.drain_base_per_min + bad as f64 * health.drain_per_critical_per_min;
        s.health = clamp_stat(s.health - drain * minutes);
    } else {
        let good = [s.hunger, s.cleanliness, s.energy, s.happiness]
            .into_iter()
            .filter(|v| *v > health.good_stat_above)
            .count();
        if good >= health.good_stats_required as usize {
            s.health = clamp_stat(s.health + health.regen_per_min * minutes);
        }
    }

    s
}

pub struct CareSubsystem;

impl SimSubsystem for CareSubsystem {
    fn name(&self) -> &'static str { "care" }

    fn update(
        &self,
        state: &mut SimulationState,
        dt_secs: f64,
        config: &SimConfig,
        _events_in: &[SimEvent],
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for pet in &mut state.pets {
            let before = pet.stats;
            pet.stats = tick_stats(&before, dt_secs, &config.decay, &config.health);

            if before.sleeping && !pet.stats.sleeping {
                log::debug!("pet {} woke up (energy {:.1})", pet.id, pet.stats.energy);
                events.push(SimEvent::PetWoke { pet_id: pet.id.clone() });
            }
            if before.health > 0.0 && pet.stats.health <= 0.0 {
                log::warn!("pet {} health depleted", pet.id);
                events.push(SimEvent::HealthDepleted { pet_id: pet.id.clone() });
            }
        }
        events
    }
}
