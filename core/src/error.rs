use crate::types::{FishId, PetId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pet '{pet_id}' not found")]
    PetNotFound { pet_id: PetId },

    #[error("Species '{fish_id}' is not in the catalog")]
    UnknownSpecies { fish_id: FishId },

    #[error("Species '{fish_id}' is not owned")]
    SpeciesNotOwned { fish_id: FishId },

    #[error("Species '{fish_id}' is already owned")]
    SpeciesAlreadyOwned { fish_id: FishId },

    #[error("Species '{fish_id}' is already in the roster")]
    SpeciesAlreadyPet { fish_id: FishId },

    #[error("Roster is full ({max} pets)")]
    RosterFull { max: usize },

    #[error("Cannot remove the last pet")]
    LastPet,

    #[error("Info for '{fish_id}' is already unlocked")]
    InfoAlreadyUnlocked { fish_id: FishId },

    #[error("Insufficient coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
