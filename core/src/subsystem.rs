//! Subsystem trait for the time-advance pipeline.
//!
//! RULE: every stage of `advance` implements SimSubsystem.
//! The engine calls update() on each stage in a fixed order,
//! documented in engine.rs. Stages are stateless; everything they
//! read or write lives in the SimulationState passed in.

use crate::{config::SimConfig, event::SimEvent, state::SimulationState};

pub trait SimSubsystem {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per advance with the clamped elapsed time.
    ///
    /// - `dt_secs`:   simulated seconds, already clamped to `[0, max_dt_secs]`
    /// - `events_in`: events emitted by earlier stages in this advance
    ///
    /// Returns new events. Must be total: no input makes it fail.
    fn update(
        &self,
        state: &mut SimulationState,
        dt_secs: f64,
        config: &SimConfig,
        events_in: &[SimEvent],
    ) -> Vec<SimEvent>;
}
