//! Everything the engine reports back to the host.
//!
//! Events are informational: the state returned alongside them is
//! authoritative. Hosts use them for toasts, logs and analytics.

use crate::{
    command::ActionKind,
    types::{FishId, PetId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Lifecycle ──────────────────────────────────
    StateInitialized {
        pet_id: PetId,
        coins:  u64,
    },
    StateRepaired {
        issue: String,
    },
    CatchUpApplied {
        elapsed_secs: f64,
    },

    // ── Care ───────────────────────────────────────
    PetWoke {
        pet_id: PetId,
    },
    HealthDepleted {
        pet_id: PetId,
    },

    // ── Actions ────────────────────────────────────
    ActionApplied {
        pet_id:        PetId,
        kind:          ActionKind,
        /// False when the pet was asleep and the stats did not change.
        effective:     bool,
        coins_awarded: u64,
    },
    ActionRejected {
        kind:   ActionKind,
        reason: RejectReason,
    },

    // ── Roster ─────────────────────────────────────
    PetAdded {
        pet_id:  PetId,
        fish_id: FishId,
    },
    PetRemoved {
        pet_id:  PetId,
        fish_id: FishId,
    },
    ActivePetChanged {
        pet_id: PetId,
    },
    PetRenamed {
        pet_id:   PetId,
        nickname: String,
    },

    // ── Economy ────────────────────────────────────
    CoinsAccrued {
        amount:  u64,
        balance: u64,
    },
    InfoUnlocked {
        fish_id: FishId,
        cost:    u64,
        balance: u64,
    },
    SpeciesPurchased {
        fish_id: FishId,
        cost:    u64,
        balance: u64,
    },
    CatchRewarded {
        fish_id: FishId,
        amount:  u64,
        balance: u64,
    },
    CoinsSynced {
        balance: u64,
    },
}

impl SimEvent {
    /// Stable name used for the `event_type` column in the event log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::StateInitialized { .. } => "state_initialized",
            Self::StateRepaired { .. }    => "state_repaired",
            Self::CatchUpApplied { .. }   => "catch_up_applied",
            Self::PetWoke { .. }          => "pet_woke",
            Self::HealthDepleted { .. }   => "health_depleted",
            Self::ActionApplied { .. }    => "action_applied",
            Self::ActionRejected { .. }   => "action_rejected",
            Self::PetAdded { .. }         => "pet_added",
            Self::PetRemoved { .. }       => "pet_removed",
            Self::ActivePetChanged { .. } => "active_pet_changed",
            Self::PetRenamed { .. }       => "pet_renamed",
            Self::CoinsAccrued { .. }     => "coins_accrued",
            Self::InfoUnlocked { .. }     => "info_unlocked",
            Self::SpeciesPurchased { .. } => "species_purchased",
            Self::CatchRewarded { .. }    => "catch_rewarded",
            Self::CoinsSynced { .. }      => "coins_synced",
        }
    }
}

/// Why an action was refused. Only `DailyLimitReached` is meant to be
/// surfaced to the player; the others are silent no-ops.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Cooldown { remaining_ms: i64 },
    Asleep,
    DailyLimitReached { limit: u32 },
    NoActivePet,
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub ts:         Timestamp,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
