use crate::types::{FishId, PetId};
use serde::{Deserialize, Serialize};

/// The four care buttons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Feed,
    Play,
    Clean,
    Sleep,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [Self::Feed, Self::Play, Self::Clean, Self::Sleep];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Feed  => "feed",
            Self::Play  => "play",
            Self::Clean => "clean",
            Self::Sleep => "sleep",
        }
    }

    /// Whether an accepted action of this kind pays the action bonus.
    pub fn pays_bonus(&self) -> bool {
        !matches!(self, Self::Sleep)
    }
}

/// All player-issued commands the host can forward to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Care ──────────────────────────────────────
    Act { kind: ActionKind },

    // ── Roster ────────────────────────────────────
    AddPet    { fish_id: FishId },
    SelectPet { pet_id: PetId },
    RemovePet { pet_id: PetId },
    RenamePet { pet_id: PetId, nickname: String },

    // ── Economy ───────────────────────────────────
    BuyInfo     { fish_id: FishId },
    BuySpecies  { fish_id: FishId },
    /// Reward from the arcade mini-game for landing a fish.
    CatchReward { fish_id: FishId },
    /// Overwrite the balance with an externally held value.
    SyncCoins   { coins: u64 },
}
