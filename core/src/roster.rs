//! Roster management: which pets exist and which one is active.
//!
//! RULE: whenever `pets` is non-empty, `active_pet_id` names one of them.

use crate::{
    catalog::{OwnedFish, SpeciesCatalog},
    error::{SimError, SimResult},
    event::SimEvent,
    state::{default_pet, Pet, SimulationState},
    types::{PetId, MAX_PETS},
};

pub const MAX_NICKNAME_CHARS: usize = 24;

/// Add a pet of `fish_id` and make it active.
pub fn add_pet(
    state: &mut SimulationState,
    fish_id: &str,
    owned: &OwnedFish,
    catalog: &SpeciesCatalog,
) -> SimResult<SimEvent> {
    let species = catalog
        .get(fish_id)
        .ok_or_else(|| SimError::UnknownSpecies { fish_id: fish_id.into() })?;
    if !owned.permits(fish_id) {
        return Err(SimError::SpeciesNotOwned { fish_id: fish_id.into() });
    }
    if state.has_species(fish_id) {
        return Err(SimError::SpeciesAlreadyPet { fish_id: fish_id.into() });
    }
    if state.pets.len() >= MAX_PETS {
        return Err(SimError::RosterFull { max: MAX_PETS });
    }

    let pet = Pet::hatch(species);
    let pet_id = pet.id.clone();
    state.pets.push(pet);
    state.active_pet_id = Some(pet_id.clone());
    Ok(SimEvent::PetAdded { pet_id, fish_id: fish_id.into() })
}

pub fn set_active_pet(state: &mut SimulationState, pet_id: &str) -> SimResult<SimEvent> {
    if state.pet(pet_id).is_none() {
        return Err(SimError::PetNotFound { pet_id: pet_id.into() });
    }
    state.active_pet_id = Some(pet_id.into());
    Ok(SimEvent::ActivePetChanged { pet_id: pet_id.into() })
}

/// Remove a pet. The last pet cannot be removed; removing the active
/// pet hands the active slot to the first remaining one.
pub fn remove_pet(state: &mut SimulationState, pet_id: &str) -> SimResult<Vec<SimEvent>> {
    let idx = state
        .pets
        .iter()
        .position(|p| p.id == pet_id)
        .ok_or_else(|| SimError::PetNotFound { pet_id: pet_id.into() })?;
    if state.pets.len() == 1 {
        return Err(SimError::LastPet);
    }

    let removed = state.pets.remove(idx);
    let mut events = vec![SimEvent::PetRemoved {
        pet_id:  removed.id.clone(),
        fish_id: removed.fish_id,
    }];
    if state.active_pet_id.as_deref() == Some(pet_id) {
        let next = state.pets[0].id.clone();
        state.active_pet_id = Some(next.clone());
        events.push(SimEvent::ActivePetChanged { pet_id: next });
    }
    Ok(events)
}

/// Set a nickname. Blank input restores the species name.
pub fn rename_pet(
    state: &mut SimulationState,
    pet_id: &str,
    nickname: &str,
    catalog: &SpeciesCatalog,
) -> SimResult<SimEvent> {
    let pet = state
        .pet_mut(pet_id)
        .ok_or_else(|| SimError::PetNotFound { pet_id: pet_id.into() })?;
    let trimmed = nickname.trim();
    pet.nickname = if trimmed.is_empty() {
        catalog.display_name(&pet.fish_id)
    } else {
        trimmed.chars().take(MAX_NICKNAME_CHARS).collect()
    };
    Ok(SimEvent::PetRenamed {
        pet_id:   pet.id.clone(),
        nickname: pet.nickname.clone(),
    })
}

/// Drop pets whose species is no longer owned. When that empties the
/// roster, a default pet of the first owned species takes its place.
/// No-op while the owned set is empty. Returns the removed pet ids.
pub fn reconcile_owned(
    state: &mut SimulationState,
    owned: &OwnedFish,
    catalog: &SpeciesCatalog,
) -> Vec<PetId> {
    if owned.is_empty() {
        return Vec::new();
    }

    let mut removed = Vec::new();
    state.pets.retain(|p| {
        let keep = owned.contains(&p.fish_id);
        if !keep {
            removed.push(p.id.clone());
        }
        keep
    });

    if state.pets.is_empty() {
        if let Some(species) = owned.first_owned(catalog) {
            let pet = Pet::hatch(species);
            state.active_pet_id = Some(pet.id.clone());
            state.pets.push(pet);
        }
    }
    if !removed.is_empty() {
        ensure_active(state, owned, catalog);
    }
    removed
}

/// Guarantee a non-empty roster with a valid active id.
/// Returns a description of the fix, if one was needed.
pub fn ensure_active(
    state: &mut SimulationState,
    owned: &OwnedFish,
    catalog: &SpeciesCatalog,
) -> Option<String> {
    if state.pets.is_empty() {
        let pet = default_pet(owned, catalog);
        let note = format!("empty roster given default pet {}", pet.fish_id);
        state.active_pet_id = Some(pet.id.clone());
        state.pets.push(pet);
        return Some(note);
    }
    if state.active_index().is_none() {
        let first = state.pets[0].id.clone();
        let note = format!("active pet {:?} replaced by {first}", state.active_pet_id);
        state.active_pet_id = Some(first);
        return Some(note);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SimulationState, OwnedFish, SpeciesCatalog) {
        let catalog = SpeciesCatalog::builtin();
        let owned: OwnedFish = ["pike", "trout", "carp", "salmon"].into_iter().collect();
        let state = SimulationState::new_default(&owned, &catalog, &Default::default(), 1_000);
        (state, owned, catalog)
    }

    #[test]
    fn added_pet_becomes_active() {
        let (mut state, owned, catalog) = setup();
        let event = add_pet(&mut state, "trout", &owned, &catalog).unwrap();
        let SimEvent::PetAdded { pet_id, .. } = event else { panic!("expected PetAdded") };
        assert_eq!(state.active_pet_id.as_deref(), Some(pet_id.as_str()));
        assert_eq!(state.active_pet().unwrap().nickname, "Trout");
    }

    #[test]
    fn add_pet_rules() {
        let (mut state, owned, catalog) = setup();
        assert!(matches!(
            add_pet(&mut state, "kraken", &owned, &catalog),
            Err(SimError::UnknownSpecies { .. })
        ));
        assert!(matches!(
            add_pet(&mut state, "perch", &owned, &catalog),
            Err(SimError::SpeciesNotOwned { .. })
        ));
        assert!(matches!(
            add_pet(&mut state, "pike", &owned, &catalog),
            Err(SimError::SpeciesAlreadyPet { .. })
        ));
        add_pet(&mut state, "trout", &owned, &catalog).unwrap();
        add_pet(&mut state, "carp", &owned, &catalog).unwrap();
        assert!(matches!(
            add_pet(&mut state, "salmon", &owned, &catalog),
            Err(SimError::RosterFull { max: 3 })
        ));
    }

    #[test]
    fn removing_active_pet_moves_active_slot() {
        let (mut state, owned, catalog) = setup();
        let first = state.pets[0].id.clone();
        add_pet(&mut state, "trout", &owned, &catalog).unwrap();
        let trout = state.active_pet_id.clone().unwrap();

        let events = remove_pet(&mut state, &trout).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(state.active_pet_id.as_deref(), Some(first.as_str()));
        assert!(matches!(remove_pet(&mut state, &first), Err(SimError::LastPet)));
    }

    #[test]
    fn blank_rename_restores_species_name() {
        let (mut state, _, catalog) = setup();
        let id = state.pets[0].id.clone();
        rename_pet(&mut state, &id, "  Sir Chomps  ", &catalog).unwrap();
        assert_eq!(state.pets[0].nickname, "Sir Chomps");
        rename_pet(&mut state, &id, "   ", &catalog).unwrap();
        assert_eq!(state.pets[0].nickname, "Pike");
        rename_pet(&mut state, &id, &"x".repeat(40), &catalog).unwrap();
        assert_eq!(state.pets[0].nickname.chars().count(), MAX_NICKNAME_CHARS);
    }

    #[test]
    fn losing_ownership_substitutes_first_owned_species() {
        let (mut state, _, catalog) = setup();
        let old = state.pets[0].id.clone();
        let owned: OwnedFish = ["carp"].into_iter().collect();

        let removed = reconcile_owned(&mut state, &owned, &catalog);
        assert_eq!(removed, vec![old]);
        assert_eq!(state.pets.len(), 1);
        assert_eq!(state.active_pet().unwrap().fish_id, "carp");
    }

    #[test]
    fn empty_owned_set_skips_reconciliation() {
        let (mut state, _, catalog) = setup();
        assert!(reconcile_owned(&mut state, &OwnedFish::new(), &catalog).is_empty());
        assert_eq!(state.pets.len(), 1);
    }
}
