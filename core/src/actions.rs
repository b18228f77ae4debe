//! Care actions: feed, play, clean, sleep.
//!
//! Checks run before any mutation, in this order: active pet, global
//! cooldown, then (feed only) asleep and the daily quota. A rejected
//! action leaves the state untouched.

use crate::{
    clock::day_key,
    command::ActionKind,
    config::SimConfig,
    event::{RejectReason, SimEvent},
    state::SimulationState,
    stats::clamp_stat,
    types::Timestamp,
    wallet::Wallet,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied {
        kind:          ActionKind,
        /// False when the pet slept through play or clean.
        effective:     bool,
        coins_awarded: u64,
    },
    Rejected {
        kind:   ActionKind,
        reason: RejectReason,
    },
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// The one rejection the player should be told about.
    pub fn is_limit_reached(&self) -> bool {
        matches!(
            self,
            Self::Rejected { reason: RejectReason::DailyLimitReached { .. }, .. }
        )
    }

    pub fn coins_awarded(&self) -> u64 {
        match self {
            Self::Applied { coins_awarded, .. } => *coins_awarded,
            Self::Rejected { .. } => 0,
        }
    }

    pub fn to_event(&self, pet_id: Option<&str>) -> SimEvent {
        match *self {
            Self::Applied { kind, effective, coins_awarded } => SimEvent::ActionApplied {
                pet_id: pet_id.unwrap_or_default().to_string(),
                kind,
                effective,
                coins_awarded,
            },
            Self::Rejected { kind, reason } => SimEvent::ActionRejected { kind, reason },
        }
    }
}

/// Apply `kind` to the active pet in place.
pub fn apply_action_mut(
    state: &mut SimulationState,
    kind: ActionKind,
    now: Timestamp,
    config: &SimConfig,
) -> ActionOutcome {
    let reject = |reason| ActionOutcome::Rejected { kind, reason };
    let actions = &config.actions;

    let Some(idx) = state.active_index() else {
        return reject(RejectReason::NoActivePet);
    };

    if let Some(last) = state.last_action_at {
        let since = now.saturating_sub(last);
        if since < actions.cooldown_ms {
            return reject(RejectReason::Cooldown { remaining_ms: actions.cooldown_ms - since });
        }
    }

    let sleeping = state.pets[idx].stats.sleeping;
    let today = day_key(now, actions.utc_offset_minutes);
    // The quota outranks sleep.
    if kind == ActionKind::Feed {
        if state.feed_quota.used_on(today) >= actions.max_feeds_per_day {
            return reject(RejectReason::DailyLimitReached { limit: actions.max_feeds_per_day });
        }
        if sleeping {
            return reject(RejectReason::Asleep);
        }
    }

    // Accepted from here on.
    let s = &mut state.pets[idx].stats;
    let effective = match kind {
        ActionKind::Feed => {
            s.hunger = clamp_stat(s.hunger + actions.feed_hunger);
            s.happiness = clamp_stat(s.happiness + actions.feed_happiness);
            s.health = clamp_stat(s.health + actions.feed_health);
            true
        }
        ActionKind::Play if !sleeping => {
            s.happiness = clamp_stat(s.happiness + actions.play_happiness);
            s.energy = clamp_stat(s.energy - actions.play_energy_cost);
            s.hunger = clamp_stat(s.hunger - actions.play_hunger_cost);
            true
        }
        ActionKind::Clean if !sleeping => {
            s.cleanliness = clamp_stat(s.cleanliness + actions.clean_cleanliness);
            s.happiness = clamp_stat(s.happiness + actions.clean_happiness);
            true
        }
        ActionKind::Play | ActionKind::Clean => false,
        ActionKind::Sleep => {
            s.sleeping = !s.sleeping;
            true
        }
    };

    if kind == ActionKind::Feed {
        state.feed_quota.record(today);
    }
    state.last_action_at = Some(now);

    let pays = kind.pays_bonus() && (effective || config.economy.pay_coins_while_sleeping);
    let coins_awarded = if pays { config.economy.action_coin_bonus } else { 0 };
    if coins_awarded > 0 {
        state.credit(coins_awarded);
    }

    log::debug!(
        "action {} accepted (effective={effective}, +{coins_awarded} coins)",
        kind.name()
    );
    ActionOutcome::Applied { kind, effective, coins_awarded }
}
