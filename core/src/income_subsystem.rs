//! Passive coin income while the active pet is content.

use crate::{
    config::SimConfig,
    event::SimEvent,
    mood::mood_from_stats,
    state::SimulationState,
    subsystem::SimSubsystem,
    wallet::Wallet,
};

pub struct IncomeSubsystem;

impl SimSubsystem for IncomeSubsystem {
    fn name(&self) -> &'static str { "income" }

    /// Runs after care, so it sees this advance's stats.
    fn update(
        &self,
        state: &mut SimulationState,
        dt_secs: f64,
        config: &SimConfig,
        _events_in: &[SimEvent],
    ) -> Vec<SimEvent> {
        let Some(pet) = state.active_pet() else {
            return vec![];
        };
        if !mood_from_stats(&pet.stats).is_content() || pet.stats.health <= 0.0 {
            return vec![];
        }

        let carried = if state.coin_progress.is_finite() { state.coin_progress } else { 0.0 };
        let progress = carried + config.economy.coins_per_good_second.max(0.0) * dt_secs;
        let whole = progress.floor();
        state.coin_progress = progress - whole;
        if whole < 1.0 {
            return vec![];
        }

        let amount = whole as u64;
        let balance = state.credit(amount);
        log::debug!("passive income +{amount} (balance {balance})");
        vec![SimEvent::CoinsAccrued { amount, balance }]
    }
}
