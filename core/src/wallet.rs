//! The coin balance shared by every feature that pays or charges coins.
//!
//! Care actions, passive income, the info shop, the species store and
//! the arcade reward all move coins through this one interface, so
//! there is a single source of truth for the balance.

use crate::{
    catalog::{info_price, OwnedFish, SpeciesCatalog},
    config::EconomyConfig,
    error::{SimError, SimResult},
    event::SimEvent,
    state::SimulationState,
};

pub trait Wallet {
    fn balance(&self) -> u64;

    /// Add coins; returns the new balance.
    fn credit(&mut self, amount: u64) -> u64;

    /// Remove coins; fails without side effects when the balance is short.
    fn debit(&mut self, amount: u64) -> SimResult<u64>;
}

impl Wallet for SimulationState {
    fn balance(&self) -> u64 {
        self.coins
    }

    fn credit(&mut self, amount: u64) -> u64 {
        self.coins = self.coins.saturating_add(amount);
        self.coins
    }

    fn debit(&mut self, amount: u64) -> SimResult<u64> {
        if self.coins < amount {
            return Err(SimError::InsufficientCoins {
                needed:    amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(self.coins)
    }
}

/// Unlock a species' info entry.
pub fn buy_info(
    state: &mut SimulationState,
    fish_id: &str,
    catalog: &SpeciesCatalog,
    economy: &EconomyConfig,
) -> SimResult<SimEvent> {
    let species = catalog
        .get(fish_id)
        .ok_or_else(|| SimError::UnknownSpecies { fish_id: fish_id.into() })?;
    if state.unlocked_info.contains(fish_id) {
        return Err(SimError::InfoAlreadyUnlocked { fish_id: fish_id.into() });
    }
    let cost = info_price(species, economy);
    let balance = state.debit(cost)?;
    state.unlocked_info.insert(fish_id.into());
    Ok(SimEvent::InfoUnlocked { fish_id: fish_id.into(), cost, balance })
}

/// Buy a species in the store at its base price.
pub fn buy_species(
    wallet: &mut impl Wallet,
    owned: &mut OwnedFish,
    fish_id: &str,
    catalog: &SpeciesCatalog,
) -> SimResult<SimEvent> {
    let species = catalog
        .get(fish_id)
        .ok_or_else(|| SimError::UnknownSpecies { fish_id: fish_id.into() })?;
    if owned.contains(fish_id) {
        return Err(SimError::SpeciesAlreadyOwned { fish_id: fish_id.into() });
    }
    let balance = wallet.debit(species.base_price)?;
    owned.insert(fish_id);
    Ok(SimEvent::SpeciesPurchased { fish_id: fish_id.into(), cost: species.base_price, balance })
}

/// Credit the arcade mini-game's catch: the species' base price.
pub fn catch_reward(
    wallet: &mut impl Wallet,
    fish_id: &str,
    catalog: &SpeciesCatalog,
) -> SimResult<SimEvent> {
    let species = catalog
        .get(fish_id)
        .ok_or_else(|| SimError::UnknownSpecies { fish_id: fish_id.into() })?;
    let balance = wallet.credit(species.base_price);
    Ok(SimEvent::CatchRewarded { fish_id: fish_id.into(), amount: species.base_price, balance })
}
