//! Fish species catalog, the owned-species set, and info pricing.

use crate::{config::EconomyConfig, types::FishId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Species {
    pub id:         FishId,
    pub name:       String,
    /// Asset key the host resolves to an image.
    #[serde(default)]
    pub image:      String,
    #[serde(default = "default_base_price")]
    pub base_price: u64,
    /// Free-text label such as "Medium-Hard".
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub habitat:    Option<String>,
    #[serde(default)]
    pub fun_fact:   Option<String>,
}

fn default_base_price() -> u64 {
    6
}

impl Species {
    fn builtin(id: &str, name: &str, base_price: u64, difficulty: &str) -> Self {
        Self {
            id:         id.into(),
            name:       name.into(),
            image:      format!("{name}.png"),
            base_price,
            difficulty: difficulty.into(),
            habitat:    None,
            fun_fact:   None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    species: Vec<Species>,
}

/// Read-only, ordered species list. Order matters: the "first owned
/// species" used for default pets is the first match in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// The ten species shipped with the game.
    pub fn builtin() -> Self {
        Self::new(vec![
            Species::builtin("perch",     "Perch",     4,  "Easy"),
            Species::builtin("pike",      "Pike",      12, "Medium"),
            Species::builtin("trout",     "Trout",     10, "Medium-Hard"),
            Species::builtin("zander",    "Zander",    11, "Hard"),
            Species::builtin("whitefish", "Whitefish", 5,  "Medium"),
            Species::builtin("burbot",    "Burbot",    18, "Hard"),
            Species::builtin("roach",     "Roach",     3,  "Easy"),
            Species::builtin("carp",      "Carp",      14, "Medium-Hard"),
            Species::builtin("salmon",    "Salmon",    20, "Very Hard"),
            Species::builtin("grayling",  "Grayling",  8,  "Medium"),
        ])
    }

    /// Read `{data_dir}/species/catalog.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/species/catalog.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        if file.species.is_empty() {
            anyhow::bail!("{path} lists no species");
        }
        Ok(Self::new(file.species))
    }

    pub fn get(&self, fish_id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.id == fish_id)
    }

    pub fn first(&self) -> Option<&Species> {
        self.species.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Display name for a species id, falling back to the id itself.
    pub fn display_name(&self, fish_id: &str) -> String {
        self.get(fish_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| fish_id.to_string())
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Species the player has unlocked in the store.
///
/// An empty set means no store is wired up: roster checks against
/// ownership are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedFish(BTreeSet<FishId>);

impl OwnedFish {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, fish_id: &str) -> bool {
        self.0.contains(fish_id)
    }

    /// Returns false if the species was already owned.
    pub fn insert(&mut self, fish_id: impl Into<FishId>) -> bool {
        self.0.insert(fish_id.into())
    }

    pub fn remove(&mut self, fish_id: &str) -> bool {
        self.0.remove(fish_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ownership test used by roster rules: everything counts as owned
    /// while the set is empty.
    pub fn permits(&self, fish_id: &str) -> bool {
        self.is_empty() || self.contains(fish_id)
    }

    /// First species in catalog order that is owned.
    pub fn first_owned<'a>(&self, catalog: &'a SpeciesCatalog) -> Option<&'a Species> {
        catalog.iter().find(|s| self.contains(&s.id))
    }
}

impl<S: Into<FishId>> FromIterator<S> for OwnedFish {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Difficulty weight used by info pricing. More specific labels are
/// checked first: "medium-hard" also contains "medium" and "hard".
pub fn difficulty_factor(difficulty: &str) -> f64 {
    let d = difficulty.to_lowercase();
    if d.contains("very hard") {
        1.4
    } else if d.contains("medium-hard") {
        0.9
    } else if d.contains("hard") {
        1.1
    } else if d.contains("medium") {
        0.7
    } else {
        0.4
    }
}

/// Coin cost of unlocking a species' info entry.
pub fn info_price(species: &Species, economy: &EconomyConfig) -> u64 {
    let raw = species.base_price as f64 * economy.info_price_multiplier
        + difficulty_factor(&species.difficulty) * economy.info_difficulty_weight;
    (raw.round().max(0.0) as u64).max(economy.min_info_price)
}
