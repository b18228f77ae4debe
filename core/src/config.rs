//! Tunable simulation parameters.
//!
//! `SimConfig::default()` carries the shipped balance values. A data
//! directory may override any subset of them through `tuning.json`;
//! missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Per-minute stat rates while the pet is awake or asleep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecayConfig {
    pub awake_hunger_per_min:      f64,
    pub awake_cleanliness_per_min: f64,
    pub awake_energy_per_min:      f64,
    pub awake_happiness_per_min:   f64,

    pub sleep_hunger_per_min:      f64,
    pub sleep_cleanliness_per_min: f64,
    pub sleep_energy_gain_per_min: f64,
    pub sleep_happiness_gain_per_min: f64,

    /// Extra happiness loss while awake and hunger is below the threshold.
    pub hungry_penalty_below:      f64,
    pub hungry_penalty_per_min:    f64,
    pub dirty_penalty_below:       f64,
    pub dirty_penalty_per_min:     f64,
    pub tired_penalty_below:       f64,
    pub tired_penalty_per_min:     f64,

    /// A sleeping pet wakes once energy reaches this value.
    pub auto_wake_energy:          f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            awake_hunger_per_min:         5.0,
            awake_cleanliness_per_min:    3.2,
            awake_energy_per_min:         4.0,
            awake_happiness_per_min:      1.8,
            sleep_hunger_per_min:         4.5,
            sleep_cleanliness_per_min:    2.0,
            sleep_energy_gain_per_min:    6.5,
            sleep_happiness_gain_per_min: 1.2,
            hungry_penalty_below:         35.0,
            hungry_penalty_per_min:       2.0,
            dirty_penalty_below:          35.0,
            dirty_penalty_per_min:        1.7,
            tired_penalty_below:          25.0,
            tired_penalty_per_min:        1.3,
            auto_wake_energy:             96.0,
        }
    }
}

/// Health drain when stats are critical, regeneration when most are healthy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    pub critical_hunger_below:      f64,
    pub critical_cleanliness_below: f64,
    pub critical_energy_below:      f64,
    pub critical_happiness_below:   f64,
    pub drain_base_per_min:         f64,
    pub drain_per_critical_per_min: f64,

    pub good_stat_above:            f64,
    pub good_stats_required:        u32,
    pub regen_per_min:              f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            critical_hunger_below:      15.0,
            critical_cleanliness_below: 15.0,
            critical_energy_below:      12.0,
            critical_happiness_below:   10.0,
            drain_base_per_min:         6.0,
            drain_per_critical_per_min: 4.0,
            good_stat_above:            55.0,
            good_stats_required:        3,
            regen_per_min:              2.4,
        }
    }
}

/// Deltas applied by the care actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionConfig {
    pub cooldown_ms:         i64,
    pub max_feeds_per_day:   u32,

    pub feed_hunger:         f64,
    pub feed_happiness:      f64,
    pub feed_health:         f64,

    pub play_happiness:      f64,
    pub play_energy_cost:    f64,
    pub play_hunger_cost:    f64,

    pub clean_cleanliness:   f64,
    pub clean_happiness:     f64,

    /// Day boundary for the feed quota. `None` = system local time.
    pub utc_offset_minutes:  Option<i32>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            cooldown_ms:        900,
            max_feeds_per_day:  10,
            feed_hunger:        26.0,
            feed_happiness:     5.0,
            feed_health:        2.0,
            play_happiness:     20.0,
            play_energy_cost:   10.0,
            play_hunger_cost:   6.0,
            clean_cleanliness:  30.0,
            clean_happiness:    4.0,
            utc_offset_minutes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_coins:           u64,
    /// Passive income per simulated second while the active pet is content.
    pub coins_per_good_second:    f64,
    pub action_coin_bonus:        u64,
    /// Play and clean on a sleeping pet still pay the action bonus.
    pub pay_coins_while_sleeping: bool,
    pub min_info_price:           u64,
    pub info_price_multiplier:    f64,
    pub info_difficulty_weight:   f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins:           18,
            coins_per_good_second:    0.04,
            action_coin_bonus:        1,
            pay_coins_while_sleeping: true,
            min_info_price:           10,
            info_price_multiplier:    8.0,
            info_difficulty_weight:   10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Upper bound on the elapsed time a single advance may simulate.
    pub max_dt_secs:      f64,
    /// Host-side debounce between a mutation and the save that follows it.
    pub save_debounce_ms: i64,
    pub decay:            DecayConfig,
    pub health:           HealthConfig,
    pub actions:          ActionConfig,
    pub economy:          EconomyConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_dt_secs:      20.0,
            save_debounce_ms: 650,
            decay:            DecayConfig::default(),
            health:           HealthConfig::default(),
            actions:          ActionConfig::default(),
            economy:          EconomyConfig::default(),
        }
    }
}

impl SimConfig {
    /// Read `{data_dir}/tuning.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/tuning.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!("Loaded tuning from {path}");
        Ok(config)
    }

    /// Defaults with the feed-quota day pinned to UTC, so tests do not
    /// depend on the machine's time zone.
    pub fn default_test() -> Self {
        let mut config = Self::default();
        config.actions.utc_offset_minutes = Some(0);
        config
    }
}
