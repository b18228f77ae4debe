//! The simulation engine.
//!
//! EXECUTION ORDER of one advance (fixed, never reordered):
//!   1. Care subsystem    (decay, sleep recovery, auto-wake, health)
//!   2. Income subsystem  (passive coins, reads the post-care mood)
//!
//! RULES:
//!   - `advance` and `apply_action` are pure: they take a state and
//!     return a new one. Nothing here reads the clock or global state.
//!   - Elapsed time per advance is clamped to `max_dt_secs`.
//!   - `PetEngine` is the host-side owner of the single live state; it
//!     adds persistence, coin notifications and command dispatch.

use crate::{
    actions::{apply_action_mut, ActionOutcome},
    care_subsystem::CareSubsystem,
    catalog::{OwnedFish, SpeciesCatalog},
    clock::elapsed_secs,
    command::{ActionKind, PlayerCommand},
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    income_subsystem::IncomeSubsystem,
    mood::{mood_from_stats, Mood},
    roster,
    state::{Pet, SimulationState},
    store::SaveStore,
    subsystem::SimSubsystem,
    types::Timestamp,
    wallet::{self, Wallet},
};

/// What one advance did.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceReport {
    pub elapsed_secs: f64,
    pub coin_delta:   u64,
    pub events:       Vec<SimEvent>,
}

/// What one action did.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub outcome:    ActionOutcome,
    pub coin_delta: u64,
    pub events:     Vec<SimEvent>,
}

/// Advance `state` to `now` in place.
pub fn advance_mut(state: &mut SimulationState, now: Timestamp, config: &SimConfig) -> AdvanceReport {
    let dt = elapsed_secs(state.last_ts, now, config.max_dt_secs);
    state.last_ts = now;

    let mut events = Vec::new();
    if dt <= 0.0 {
        return AdvanceReport { elapsed_secs: 0.0, coin_delta: 0, events };
    }

    let pipeline: [&dyn SimSubsystem; 2] = [&CareSubsystem, &IncomeSubsystem];
    for subsystem in pipeline {
        let new_events = subsystem.update(state, dt, config, &events);
        if !new_events.is_empty() {
            log::trace!("{} emitted {} events", subsystem.name(), new_events.len());
        }
        events.extend(new_events);
    }

    let coin_delta: u64 = events
        .iter()
        .map(|e| match e {
            SimEvent::CoinsAccrued { amount, .. } => *amount,
            _ => 0,
        })
        .sum();
    AdvanceReport { elapsed_secs: dt, coin_delta, events }
}

/// Pure form of `advance_mut`: returns the advanced copy.
pub fn advance(
    state: &SimulationState,
    now: Timestamp,
    config: &SimConfig,
) -> (SimulationState, AdvanceReport) {
    let mut next = state.clone();
    let report = advance_mut(&mut next, now, config);
    (next, report)
}

/// Apply a care action in place.
pub fn apply_action_in(
    state: &mut SimulationState,
    kind: ActionKind,
    now: Timestamp,
    config: &SimConfig,
) -> ActionReport {
    let outcome = apply_action_mut(state, kind, now, config);
    let event = outcome.to_event(state.active_pet_id.as_deref());
    ActionReport { outcome, coin_delta: outcome.coins_awarded(), events: vec![event] }
}

/// Pure form of `apply_action_in`: returns the updated copy.
pub fn apply_action(
    state: &SimulationState,
    kind: ActionKind,
    now: Timestamp,
    config: &SimConfig,
) -> (SimulationState, ActionReport) {
    let mut next = state.clone();
    let report = apply_action_in(&mut next, kind, now, config);
    (next, report)
}

/// Called with the new balance whenever it changes.
pub type CoinObserver = Box<dyn FnMut(u64)>;

/// Host-side owner of the live simulation state.
pub struct PetEngine {
    state:         SimulationState,
    config:        SimConfig,
    catalog:       SpeciesCatalog,
    owned:         OwnedFish,
    store:         Option<Box<dyn SaveStore>>,
    coin_observer: Option<CoinObserver>,
    /// Time of the first mutation not yet saved.
    dirty_since:   Option<Timestamp>,
}

impl PetEngine {
    /// Wrap an existing state. The state is repaired first.
    pub fn new(
        mut state: SimulationState,
        config: SimConfig,
        catalog: SpeciesCatalog,
        owned: OwnedFish,
        now: Timestamp,
    ) -> Self {
        state.repair(&owned, &catalog, now);
        Self {
            state,
            config,
            catalog,
            owned,
            store: None,
            coin_observer: None,
            dirty_since: None,
        }
    }

    /// A fresh default state, no persistence.
    pub fn fresh(config: SimConfig, catalog: SpeciesCatalog, owned: OwnedFish, now: Timestamp) -> Self {
        let state = SimulationState::new_default(&owned, &catalog, &config.economy, now);
        Self::new(state, config, catalog, owned, now)
    }

    /// Engine with default tuning pinned to UTC days and the builtin catalog.
    pub fn build_test(now: Timestamp) -> Self {
        Self::fresh(SimConfig::default_test(), SpeciesCatalog::builtin(), OwnedFish::new(), now)
    }

    /// Resume from `store`, or start fresh when it holds no usable save.
    /// A resumed state is repaired and then caught up to `now`.
    pub fn load_or_init(
        config: SimConfig,
        catalog: SpeciesCatalog,
        owned: OwnedFish,
        store: Box<dyn SaveStore>,
        now: Timestamp,
    ) -> SimResult<(Self, Vec<SimEvent>)> {
        let mut events = Vec::new();
        let state = match store.load_state()? {
            Some(mut state) => {
                for issue in state.repair(&owned, &catalog, now) {
                    events.push(SimEvent::StateRepaired { issue });
                }
                let report = advance_mut(&mut state, now, &config);
                log::info!(
                    "Resumed save: {} pets, {} coins, caught up {:.1}s",
                    state.pets.len(),
                    state.coins,
                    report.elapsed_secs
                );
                events.push(SimEvent::CatchUpApplied { elapsed_secs: report.elapsed_secs });
                events.extend(report.events);
                state
            }
            None => {
                let state = SimulationState::new_default(&owned, &catalog, &config.economy, now);
                log::info!("No usable save; starting fresh with {} coins", state.coins);
                events.push(SimEvent::StateInitialized {
                    pet_id: state.active_pet_id.clone().unwrap_or_default(),
                    coins:  state.coins,
                });
                state
            }
        };

        let mut engine = Self::new(state, config, catalog, owned, now);
        engine.store = Some(store);
        engine.record(now, &events)?;
        engine.dirty_since = Some(now);
        Ok((engine, events))
    }

    pub fn with_store(mut self, store: Box<dyn SaveStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Hand back the store, e.g. to reopen the session later.
    pub fn into_store(self) -> Option<Box<dyn SaveStore>> {
        self.store
    }

    /// Register the callback that mirrors the balance into an external wallet.
    pub fn on_coins_change(&mut self, observer: impl FnMut(u64) + 'static) {
        self.coin_observer = Some(Box::new(observer));
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn owned(&self) -> &OwnedFish {
        &self.owned
    }

    pub fn coins(&self) -> u64 {
        self.state.balance()
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.state.active_pet()
    }

    pub fn mood(&self) -> Option<Mood> {
        self.active_pet().map(|p| mood_from_stats(&p.stats))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    // ── Time ───────────────────────────────────────────────────

    /// Periodic tick, nominally once per second.
    pub fn tick(&mut self, now: Timestamp) -> SimResult<AdvanceReport> {
        let before = self.state.balance();
        let report = advance_mut(&mut self.state, now, &self.config);
        if report.elapsed_secs > 0.0 {
            self.touch(now);
        }
        self.record(now, &report.events)?;
        self.notify_coins(before);
        Ok(report)
    }

    // ── Player input ───────────────────────────────────────────

    pub fn act(&mut self, kind: ActionKind, now: Timestamp) -> SimResult<ActionReport> {
        let before = self.state.balance();
        let report = apply_action_in(&mut self.state, kind, now, &self.config);
        if report.outcome.is_accepted() {
            self.touch(now);
        } else if report.outcome.is_limit_reached() {
            log::info!("feed limit reached for today");
        }
        self.record(now, &report.events)?;
        self.notify_coins(before);
        Ok(report)
    }

    /// Dispatch any player command.
    pub fn submit(&mut self, command: PlayerCommand, now: Timestamp) -> SimResult<Vec<SimEvent>> {
        let before = self.state.balance();
        let events = match command {
            PlayerCommand::Act { kind } => {
                return self.act(kind, now).map(|r| r.events);
            }
            PlayerCommand::AddPet { fish_id } => {
                vec![roster::add_pet(&mut self.state, &fish_id, &self.owned, &self.catalog)?]
            }
            PlayerCommand::SelectPet { pet_id } => {
                vec![roster::set_active_pet(&mut self.state, &pet_id)?]
            }
            PlayerCommand::RemovePet { pet_id } => roster::remove_pet(&mut self.state, &pet_id)?,
            PlayerCommand::RenamePet { pet_id, nickname } => {
                vec![roster::rename_pet(&mut self.state, &pet_id, &nickname, &self.catalog)?]
            }
            PlayerCommand::BuyInfo { fish_id } => {
                vec![wallet::buy_info(&mut self.state, &fish_id, &self.catalog, &self.config.economy)?]
            }
            PlayerCommand::BuySpecies { fish_id } => {
                vec![wallet::buy_species(&mut self.state, &mut self.owned, &fish_id, &self.catalog)?]
            }
            PlayerCommand::CatchReward { fish_id } => {
                vec![wallet::catch_reward(&mut self.state, &fish_id, &self.catalog)?]
            }
            PlayerCommand::SyncCoins { coins } => {
                self.state.coins = coins;
                vec![SimEvent::CoinsSynced { balance: coins }]
            }
        };
        self.touch(now);
        self.record(now, &events)?;
        self.notify_coins(before);
        Ok(events)
    }

    /// Replace the owned-species set (the store feature changed it) and
    /// drop pets whose species is no longer owned.
    pub fn set_owned(&mut self, owned: OwnedFish, now: Timestamp) -> SimResult<Vec<SimEvent>> {
        self.owned = owned;
        let mut events: Vec<SimEvent> = roster::reconcile_owned(&mut self.state, &self.owned, &self.catalog)
            .into_iter()
            .map(|pet_id| SimEvent::StateRepaired {
                issue: format!("pet {pet_id} removed: species no longer owned"),
            })
            .collect();
        if let Some(issue) = roster::ensure_active(&mut self.state, &self.owned, &self.catalog) {
            events.push(SimEvent::StateRepaired { issue });
        }
        if !events.is_empty() {
            self.touch(now);
            self.record(now, &events)?;
        }
        Ok(events)
    }

    // ── Persistence ────────────────────────────────────────────

    /// Save if a mutation is pending and the debounce window has passed.
    /// Returns whether a save happened.
    pub fn flush_if_due(&mut self, now: Timestamp) -> SimResult<bool> {
        match self.dirty_since {
            Some(since) if now.saturating_sub(since) >= self.config.save_debounce_ms => {
                self.flush(now)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Save immediately. Without a store this only clears the dirty flag.
    pub fn flush(&mut self, now: Timestamp) -> SimResult<()> {
        if let Some(store) = &self.store {
            store.save_state(&self.state, now)?;
            log::debug!("state saved ({} coins)", self.state.coins);
        }
        self.dirty_since = None;
        Ok(())
    }

    fn touch(&mut self, now: Timestamp) {
        self.dirty_since.get_or_insert(now);
    }

    fn record(&self, now: Timestamp, events: &[SimEvent]) -> SimResult<()> {
        for event in events {
            log::debug!("event {}: {:?}", event.type_name(), event);
            if let Some(store) = &self.store {
                store.append_event(now, event)?;
            }
        }
        Ok(())
    }

    fn notify_coins(&mut self, before: u64) {
        let after = self.state.balance();
        if after != before {
            if let Some(observer) = self.coin_observer.as_mut() {
                observer(after);
            }
        }
    }
}
