//! Coins, shops and roster commands through the engine.

use std::{cell::RefCell, rc::Rc};

use icehook_core::{
    catalog::{OwnedFish, SpeciesCatalog},
    command::{ActionKind, PlayerCommand},
    config::SimConfig,
    engine::PetEngine,
    error::SimError,
    event::SimEvent,
    types::MAX_PETS,
};

const T0: i64 = 1_709_280_000_000; // 2024-03-01T08:00:00Z

fn add(engine: &mut PetEngine, fish_id: &str) -> Result<Vec<SimEvent>, SimError> {
    engine.submit(PlayerCommand::AddPet { fish_id: fish_id.into() }, T0)
}

// ── Passive income ─────────────────────────────────────────────

#[test]
fn content_pet_earns_fractional_income() {
    let mut engine = PetEngine::build_test(T0);
    let start = engine.coins();

    // 0.04 coins/s × 20 s = 0.8: nothing credited yet.
    let report = engine.tick(T0 + 20_000).unwrap();
    assert_eq!(report.coin_delta, 0);
    assert!((engine.state().coin_progress - 0.8).abs() < 1e-9);

    // Carry reaches 1.6: one coin, 0.6 kept.
    let report = engine.tick(T0 + 40_000).unwrap();
    assert_eq!(report.coin_delta, 1);
    assert_eq!(engine.coins(), start + 1);
    assert!((engine.state().coin_progress - 0.6).abs() < 1e-9);
}

#[test]
fn no_income_while_the_pet_sleeps() {
    // Low energy: 200 s of sleep only reaches ~61.7, short of auto-wake.
    let mut state = PetEngine::build_test(T0).state().clone();
    state.pets[0].stats.energy = 40.0;
    let mut engine = PetEngine::new(
        state,
        SimConfig::default_test(),
        SpeciesCatalog::builtin(),
        OwnedFish::new(),
        T0,
    );
    engine.act(ActionKind::Sleep, T0).unwrap();
    let start = engine.coins();

    for i in 1..=10 {
        engine.tick(T0 + i * 20_000).unwrap();
    }
    assert!(engine.active_pet().unwrap().stats.sleeping);
    assert_eq!(engine.coins(), start);
    assert_eq!(engine.state().coin_progress, 0.0);
}

#[test]
fn coin_observer_sees_every_change() {
    let mut engine = PetEngine::build_test(T0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_coins_change(move |coins| sink.borrow_mut().push(coins));

    engine.act(ActionKind::Feed, T0).unwrap();
    engine.act(ActionKind::Sleep, T0 + 1_000).unwrap(); // unpaid
    engine.submit(PlayerCommand::CatchReward { fish_id: "salmon".into() }, T0 + 2_000).unwrap();

    assert_eq!(*seen.borrow(), vec![19, 39]);
}

// ── Shops ──────────────────────────────────────────────────────

#[test]
fn info_purchase_needs_enough_coins() {
    let mut engine = PetEngine::build_test(T0);
    let err = engine
        .submit(PlayerCommand::BuyInfo { fish_id: "perch".into() }, T0)
        .unwrap_err();
    assert!(matches!(err, SimError::InsufficientCoins { needed: 36, available: 18 }));
    assert!(engine.state().unlocked_info.is_empty());
    assert_eq!(engine.coins(), 18);
}

#[test]
fn info_can_be_bought_once() {
    let mut engine = PetEngine::build_test(T0);
    engine.submit(PlayerCommand::CatchReward { fish_id: "salmon".into() }, T0).unwrap();

    let events = engine.submit(PlayerCommand::BuyInfo { fish_id: "perch".into() }, T0).unwrap();
    assert_eq!(
        events,
        vec![SimEvent::InfoUnlocked { fish_id: "perch".into(), cost: 36, balance: 2 }]
    );
    assert!(engine.state().unlocked_info.contains("perch"));

    let err = engine
        .submit(PlayerCommand::BuyInfo { fish_id: "perch".into() }, T0)
        .unwrap_err();
    assert!(matches!(err, SimError::InfoAlreadyUnlocked { .. }));
}

#[test]
fn species_purchase_adds_to_the_owned_set() {
    let mut engine = PetEngine::build_test(T0);
    engine.submit(PlayerCommand::SyncCoins { coins: 100 }, T0).unwrap();

    engine.submit(PlayerCommand::BuySpecies { fish_id: "pike".into() }, T0).unwrap();
    assert!(engine.owned().contains("pike"));
    assert_eq!(engine.coins(), 88);

    let err = engine
        .submit(PlayerCommand::BuySpecies { fish_id: "pike".into() }, T0)
        .unwrap_err();
    assert!(matches!(err, SimError::SpeciesAlreadyOwned { .. }));
}

#[test]
fn unknown_species_is_rejected_everywhere() {
    let mut engine = PetEngine::build_test(T0);
    for command in [
        PlayerCommand::AddPet { fish_id: "kraken".into() },
        PlayerCommand::BuyInfo { fish_id: "kraken".into() },
        PlayerCommand::BuySpecies { fish_id: "kraken".into() },
        PlayerCommand::CatchReward { fish_id: "kraken".into() },
    ] {
        let err = engine.submit(command, T0).unwrap_err();
        assert!(matches!(err, SimError::UnknownSpecies { .. }));
    }
    assert_eq!(engine.coins(), 18);
}

// ── Roster ─────────────────────────────────────────────────────

#[test]
fn roster_holds_at_most_three_distinct_species() {
    let mut engine = PetEngine::build_test(T0);
    assert!(matches!(add(&mut engine, "perch").unwrap_err(), SimError::SpeciesAlreadyPet { .. }));

    add(&mut engine, "pike").unwrap();
    add(&mut engine, "trout").unwrap();
    assert_eq!(engine.state().pets.len(), MAX_PETS);
    assert_eq!(engine.active_pet().unwrap().fish_id, "trout");

    assert!(matches!(add(&mut engine, "carp").unwrap_err(), SimError::RosterFull { max: 3 }));
}

#[test]
fn new_pets_respect_the_owned_set() {
    let owned: OwnedFish = ["perch", "pike"].into_iter().collect();
    let mut engine = PetEngine::fresh(SimConfig::default_test(), SpeciesCatalog::builtin(), owned, T0);

    assert!(matches!(add(&mut engine, "salmon").unwrap_err(), SimError::SpeciesNotOwned { .. }));
    add(&mut engine, "pike").unwrap();
}

#[test]
fn removing_the_active_pet_moves_the_selection() {
    let mut engine = PetEngine::build_test(T0);
    let first = engine.active_pet().unwrap().id.clone();
    add(&mut engine, "pike").unwrap();
    let pike = engine.active_pet().unwrap().id.clone();

    let events = engine.submit(PlayerCommand::RemovePet { pet_id: pike }, T0).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(engine.active_pet().unwrap().id, first);

    let err = engine.submit(PlayerCommand::RemovePet { pet_id: first }, T0).unwrap_err();
    assert!(matches!(err, SimError::LastPet));
}

#[test]
fn selecting_switches_which_pet_actions_hit() {
    let mut engine = PetEngine::build_test(T0);
    let perch = engine.active_pet().unwrap().id.clone();
    add(&mut engine, "pike").unwrap();

    engine.submit(PlayerCommand::SelectPet { pet_id: perch.clone() }, T0).unwrap();
    engine.act(ActionKind::Play, T0).unwrap();
    assert_eq!(engine.state().pet(&perch).unwrap().stats.happiness, 92.0);

    let err = engine
        .submit(PlayerCommand::SelectPet { pet_id: "nobody".into() }, T0)
        .unwrap_err();
    assert!(matches!(err, SimError::PetNotFound { .. }));
    assert_eq!(engine.active_pet().unwrap().id, perch);
}

#[test]
fn nicknames_are_trimmed_and_capped() {
    let mut engine = PetEngine::build_test(T0);
    let id = engine.active_pet().unwrap().id.clone();

    let rename = |nickname: &str| PlayerCommand::RenamePet { pet_id: id.clone(), nickname: nickname.into() };
    engine.submit(rename("  Bubbles  "), T0).unwrap();
    assert_eq!(engine.active_pet().unwrap().nickname, "Bubbles");

    engine.submit(rename(&"x".repeat(40)), T0).unwrap();
    assert_eq!(engine.active_pet().unwrap().nickname.chars().count(), 24);

    engine.submit(rename("   "), T0).unwrap();
    assert_eq!(engine.active_pet().unwrap().nickname, "Perch");
}

#[test]
fn losing_a_species_drops_its_pets() {
    let owned: OwnedFish = ["perch", "pike"].into_iter().collect();
    let mut engine = PetEngine::fresh(SimConfig::default_test(), SpeciesCatalog::builtin(), owned, T0);
    add(&mut engine, "pike").unwrap();

    let events = engine.set_owned(["perch"].into_iter().collect(), T0).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(engine.state().pets.len(), 1);
    assert_eq!(engine.active_pet().unwrap().fish_id, "perch");

    // Nothing of the roster owned any more: a default pet replaces it.
    engine.set_owned(["salmon"].into_iter().collect(), T0).unwrap();
    assert_eq!(engine.state().pets.len(), 1);
    assert_eq!(engine.active_pet().unwrap().fish_id, "salmon");
}
