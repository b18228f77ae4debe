//! The persisted root aggregate.
//!
//! `SimulationState` is exactly what the host saves and restores. Loading
//! never trusts the blob: missing or malformed fields take defaults,
//! unreadable pets are dropped, and `repair` restores every invariant
//! before the state is simulated again.

use crate::{
    catalog::{OwnedFish, Species, SpeciesCatalog},
    config::EconomyConfig,
    roster,
    stats::{lenient_stats, PetStats},
    types::{FishId, PetId, Timestamp, MAX_PETS},
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet};

pub const SAVE_VERSION: u32 = 1;

/// Storage key of the save blob.
pub const SAVE_SLOT: &str = "icehook_tamagotchi_v1";

const FALLBACK_FISH_ID: &str = "perch";
const FALLBACK_FISH_NAME: &str = "Perch";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default)]
    pub id:       PetId,
    #[serde(default)]
    pub fish_id:  FishId,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats:    PetStats,
}

impl Pet {
    /// A new pet of `species` with fresh stats and a random id.
    pub fn hatch(species: &Species) -> Self {
        Self::with_fish(species.id.clone(), species.name.clone())
    }

    fn with_fish(fish_id: FishId, nickname: String) -> Self {
        Self {
            id: new_pet_id(),
            fish_id,
            nickname,
            stats: PetStats::default(),
        }
    }
}

pub(crate) fn new_pet_id() -> PetId {
    uuid::Uuid::new_v4().to_string()
}

/// Feeds accepted on one calendar day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedQuota {
    pub day:   Option<NaiveDate>,
    pub count: u32,
}

impl FeedQuota {
    /// Feeds already used on `today`; a quota from another day counts as zero.
    pub fn used_on(&self, today: NaiveDate) -> u32 {
        if self.day == Some(today) { self.count } else { 0 }
    }

    pub fn record(&mut self, today: NaiveDate) {
        self.count = self.used_on(today) + 1;
        self.day = Some(today);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationState {
    #[serde(deserialize_with = "or_default")]
    pub version:        u32,
    #[serde(deserialize_with = "lenient_coins")]
    pub coins:          u64,
    /// Fractional passive income not yet credited, in `[0, 1)`.
    #[serde(deserialize_with = "or_default")]
    pub coin_progress:  f64,
    #[serde(deserialize_with = "lenient_pets")]
    pub pets:           Vec<Pet>,
    #[serde(deserialize_with = "or_default")]
    pub active_pet_id:  Option<PetId>,
    #[serde(deserialize_with = "or_default")]
    pub unlocked_info:  BTreeSet<FishId>,
    /// When the state was last advanced.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_ts:        Timestamp,
    #[serde(deserialize_with = "or_default")]
    pub feed_quota:     FeedQuota,
    /// When the last action was accepted, for the global cooldown.
    #[serde(deserialize_with = "lenient_opt_timestamp")]
    pub last_action_at: Option<Timestamp>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            version:        SAVE_VERSION,
            coins:          EconomyConfig::default().starting_coins,
            coin_progress:  0.0,
            pets:           Vec::new(),
            active_pet_id:  None,
            unlocked_info:  BTreeSet::new(),
            last_ts:        0,
            feed_quota:     FeedQuota::default(),
            last_action_at: None,
        }
    }
}

/// Coins may arrive as a negative or fractional number from older saves.
fn lenient_coins<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|v| v.is_finite())
        .map(|v| v.floor().max(0.0) as u64)
        .unwrap_or(0))
}

/// A field of the wrong shape (or `null`) takes its default; `repair`
/// decides what the default means.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed save field: {e}");
        T::default()
    }))
}

fn timestamp_from(value: &serde_json::Value) -> Option<Timestamp> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v.floor() as Timestamp))
}

/// Integer or float milliseconds; anything else reads as 0 (unset).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(timestamp_from(&value).unwrap_or(0))
}

fn lenient_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(timestamp_from(&value))
}

/// Unreadable pets are dropped one by one; the rest of the roster survives.
fn lenient_pets<'de, D>(deserializer: D) -> Result<Vec<Pet>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Pet>(item) {
            Ok(pet) => Some(pet),
            Err(e) => {
                log::warn!("Dropping unreadable pet: {e}");
                None
            }
        })
        .collect())
}

impl SimulationState {
    /// A brand-new save: one pet of the first owned species (or the first
    /// catalog species when nothing is owned yet).
    pub fn new_default(
        owned: &OwnedFish,
        catalog: &SpeciesCatalog,
        economy: &EconomyConfig,
        now: Timestamp,
    ) -> Self {
        let pet = default_pet(owned, catalog);
        Self {
            coins: economy.starting_coins,
            active_pet_id: Some(pet.id.clone()),
            pets: vec![pet],
            last_ts: now,
            ..Self::default()
        }
    }

    /// Parse a save blob. Anything unreadable counts as no save at all.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(raw) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Discarding unreadable save: {e}");
                None
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn active_index(&self) -> Option<usize> {
        let id = self.active_pet_id.as_deref()?;
        self.pets.iter().position(|p| p.id == id)
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.active_index().map(|i| &self.pets[i])
    }

    pub fn active_pet_mut(&mut self) -> Option<&mut Pet> {
        let idx = self.active_index()?;
        self.pets.get_mut(idx)
    }

    pub fn pet(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == pet_id)
    }

    pub fn pet_mut(&mut self, pet_id: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == pet_id)
    }

    pub fn has_species(&self, fish_id: &str) -> bool {
        self.pets.iter().any(|p| p.fish_id == fish_id)
    }

    /// Restore every invariant on a state of unknown provenance.
    /// Returns a description of each fix applied.
    pub fn repair(
        &mut self,
        owned: &OwnedFish,
        catalog: &SpeciesCatalog,
        now: Timestamp,
    ) -> Vec<String> {
        let mut issues = Vec::new();

        if self.version != SAVE_VERSION {
            issues.push(format!("save version {} migrated to {SAVE_VERSION}", self.version));
            self.version = SAVE_VERSION;
        }

        if !self.coin_progress.is_finite() || !(0.0..1.0).contains(&self.coin_progress) {
            issues.push(format!("coin progress {} reset", self.coin_progress));
            self.coin_progress = 0.0;
        }

        if self.last_ts <= 0 || self.last_ts > now {
            issues.push(format!("last timestamp {} reset to now", self.last_ts));
            self.last_ts = now;
        }

        if self.last_action_at.is_some_and(|t| t > now) {
            issues.push("future action timestamp cleared".into());
            self.last_action_at = None;
        }

        let before = self.pets.len();
        self.pets.retain(|p| !p.fish_id.is_empty());
        if self.pets.len() != before {
            issues.push(format!("{} pets without a species dropped", before - self.pets.len()));
        }

        let mut species = HashSet::new();
        let before = self.pets.len();
        self.pets.retain(|p| species.insert(p.fish_id.clone()));
        if self.pets.len() != before {
            issues.push(format!("{} pets of a repeated species dropped", before - self.pets.len()));
        }

        let mut seen = HashSet::new();
        for pet in &mut self.pets {
            if pet.id.is_empty() || !seen.insert(pet.id.clone()) {
                let old = std::mem::replace(&mut pet.id, new_pet_id());
                issues.push(format!("pet id '{old}' reassigned to {}", pet.id));
                seen.insert(pet.id.clone());
            }
            if pet.stats.sanitize() {
                issues.push(format!("stats of pet {} clamped", pet.id));
            }
            if pet.nickname.trim().is_empty() {
                pet.nickname = catalog.display_name(&pet.fish_id);
            }
        }

        if self.pets.len() > MAX_PETS {
            issues.push(format!("roster truncated from {} to {MAX_PETS}", self.pets.len()));
            self.pets.truncate(MAX_PETS);
        }

        for pet_id in roster::reconcile_owned(self, owned, catalog) {
            issues.push(format!("pet {pet_id} removed: species no longer owned"));
        }
        if let Some(issue) = roster::ensure_active(self, owned, catalog) {
            issues.push(issue);
        }

        for issue in &issues {
            log::warn!("Save repaired: {issue}");
        }
        issues
    }
}

/// Default pet: first owned species, else first catalog species, else perch.
pub(crate) fn default_pet(owned: &OwnedFish, catalog: &SpeciesCatalog) -> Pet {
    match owned.first_owned(catalog).or_else(|| catalog.first()) {
        Some(species) => Pet::hatch(species),
        None => Pet::with_fish(FALLBACK_FISH_ID.into(), FALLBACK_FISH_NAME.into()),
    }
}
