//! Care action tests: effects, cooldown, daily feed cap, sleeping pets.

use icehook_core::{
    actions::ActionOutcome,
    clock::day_key,
    command::ActionKind,
    config::SimConfig,
    engine::{apply_action, PetEngine},
    event::{RejectReason, SimEvent},
    state::FeedQuota,
    stats::PetStats,
};

const T0: i64 = 1_709_280_000_000; // 2024-03-01T08:00:00Z
const DAY_MS: i64 = 86_400_000;

fn engine_with(stats: PetStats) -> PetEngine {
    let mut state = PetEngine::build_test(T0).state().clone();
    state.pets[0].stats = stats;
    PetEngine::new(
        state,
        SimConfig::default_test(),
        Default::default(),
        Default::default(),
        T0,
    )
}

#[test]
fn feed_applies_its_effects_and_pays_a_coin() {
    let mut engine = engine_with(PetStats { hunger: 40.0, happiness: 50.0, health: 60.0, ..PetStats::default() });
    let coins_before = engine.coins();

    let report = engine.act(ActionKind::Feed, T0).unwrap();
    assert!(report.outcome.is_accepted());
    assert_eq!(report.coin_delta, 1);

    let stats = engine.active_pet().unwrap().stats;
    assert_eq!(stats.hunger, 66.0);
    assert_eq!(stats.happiness, 55.0);
    assert_eq!(stats.health, 62.0);
    assert_eq!(engine.coins(), coins_before + 1);
    assert_eq!(engine.state().feed_quota.count, 1);
}

#[test]
fn immediate_second_feed_is_refused() {
    let mut engine = engine_with(PetStats { hunger: 50.0, happiness: 50.0, health: 50.0, ..PetStats::default() });

    assert!(engine.act(ActionKind::Feed, T0).unwrap().outcome.is_accepted());
    let after_first = engine.state().clone();
    assert_eq!(after_first.pets[0].stats.hunger, 76.0);
    assert_eq!(after_first.pets[0].stats.happiness, 55.0);
    assert_eq!(after_first.pets[0].stats.health, 52.0);
    assert_eq!(after_first.coins, 19);

    assert!(!engine.act(ActionKind::Feed, T0).unwrap().outcome.is_accepted());
    assert_eq!(engine.state(), &after_first);
}

#[test]
fn effects_are_clamped_at_the_top() {
    let mut engine = engine_with(PetStats { hunger: 95.0, ..PetStats::default() });
    engine.act(ActionKind::Feed, T0).unwrap();
    assert_eq!(engine.active_pet().unwrap().stats.hunger, 100.0);
}

#[test]
fn play_trades_energy_and_hunger_for_happiness() {
    let mut engine = engine_with(PetStats::default());
    engine.act(ActionKind::Play, T0).unwrap();
    let stats = engine.active_pet().unwrap().stats;
    assert_eq!(stats.happiness, 92.0);
    assert_eq!(stats.energy, 65.0);
    assert_eq!(stats.hunger, 72.0);
}

#[test]
fn actions_inside_the_cooldown_are_rejected() {
    let mut engine = engine_with(PetStats::default());
    assert!(engine.act(ActionKind::Clean, T0).unwrap().outcome.is_accepted());

    let report = engine.act(ActionKind::Play, T0 + 500).unwrap();
    assert_eq!(
        report.outcome,
        ActionOutcome::Rejected {
            kind:   ActionKind::Play,
            reason: RejectReason::Cooldown { remaining_ms: 400 },
        }
    );
    assert_eq!(report.coin_delta, 0);

    // The rejected attempt does not restart the cooldown.
    assert!(engine.act(ActionKind::Play, T0 + 900).unwrap().outcome.is_accepted());
}

#[test]
fn rejected_action_leaves_state_untouched() {
    let engine = engine_with(PetStats::default());
    let (after_first, _) = apply_action(engine.state(), ActionKind::Feed, T0, engine.config());
    let (after_second, report) = apply_action(&after_first, ActionKind::Feed, T0 + 100, engine.config());

    assert!(!report.outcome.is_accepted());
    assert_eq!(after_second, after_first);
    assert!(matches!(report.events[0], SimEvent::ActionRejected { .. }));
}

#[test]
fn eleventh_feed_of_the_day_is_rejected() {
    let mut engine = engine_with(PetStats::default());
    for i in 0..10 {
        let report = engine.act(ActionKind::Feed, T0 + i * 1_000).unwrap();
        assert!(report.outcome.is_accepted(), "feed {} rejected", i + 1);
    }

    let coins = engine.coins();
    let report = engine.act(ActionKind::Feed, T0 + 10_000).unwrap();
    assert!(report.outcome.is_limit_reached());
    assert_eq!(
        report.outcome,
        ActionOutcome::Rejected {
            kind:   ActionKind::Feed,
            reason: RejectReason::DailyLimitReached { limit: 10 },
        }
    );
    assert_eq!(engine.coins(), coins);
    assert_eq!(engine.state().feed_quota.count, 10);

    // Other actions are not capped.
    assert!(engine.act(ActionKind::Clean, T0 + 11_000).unwrap().outcome.is_accepted());
}

#[test]
fn feed_quota_resets_on_the_next_day() {
    let mut engine = engine_with(PetStats::default());
    for i in 0..10 {
        engine.act(ActionKind::Feed, T0 + i * 1_000).unwrap();
    }
    assert!(!engine.act(ActionKind::Feed, T0 + 20_000).unwrap().outcome.is_accepted());

    let report = engine.act(ActionKind::Feed, T0 + DAY_MS).unwrap();
    assert!(report.outcome.is_accepted());
    assert_eq!(engine.state().feed_quota.count, 1);
}

#[test]
fn day_boundary_follows_the_configured_offset() {
    // 23:59:59 and 00:00:01 UTC fall on different days at offset 0.
    let midnight = T0 - 8 * 3_600_000 + DAY_MS;
    let mut engine = engine_with(PetStats::default());
    for i in 0..10 {
        engine.act(ActionKind::Feed, midnight - 60_000 + i * 1_000).unwrap();
    }
    assert!(!engine.act(ActionKind::Feed, midnight - 1_000).unwrap().outcome.is_accepted());
    assert!(engine.act(ActionKind::Feed, midnight + 1_000).unwrap().outcome.is_accepted());
}

#[test]
fn sleep_toggles_and_pays_nothing() {
    let mut engine = engine_with(PetStats::default());
    let coins = engine.coins();

    let report = engine.act(ActionKind::Sleep, T0).unwrap();
    assert!(report.outcome.is_accepted());
    assert_eq!(report.coin_delta, 0);
    assert!(engine.active_pet().unwrap().stats.sleeping);

    engine.act(ActionKind::Sleep, T0 + 1_000).unwrap();
    assert!(!engine.active_pet().unwrap().stats.sleeping);
    assert_eq!(engine.coins(), coins);
}

#[test]
fn sleeping_pet_cannot_be_fed() {
    let mut engine = engine_with(PetStats { sleeping: true, ..PetStats::default() });
    let report = engine.act(ActionKind::Feed, T0).unwrap();
    assert_eq!(
        report.outcome,
        ActionOutcome::Rejected { kind: ActionKind::Feed, reason: RejectReason::Asleep }
    );
    assert_eq!(engine.state().feed_quota.count, 0);
}

#[test]
fn exhausted_quota_is_reported_before_sleep() {
    let mut state = PetEngine::build_test(T0).state().clone();
    state.pets[0].stats.sleeping = true;
    state.feed_quota = FeedQuota { day: Some(day_key(T0, Some(0))), count: 10 };

    let (_, report) = apply_action(&state, ActionKind::Feed, T0, &SimConfig::default_test());
    assert!(report.outcome.is_limit_reached());
}

#[test]
fn play_and_clean_on_a_sleeping_pet_change_no_stats() {
    let asleep = PetStats { sleeping: true, ..PetStats::default() };
    let mut engine = engine_with(asleep);

    let report = engine.act(ActionKind::Play, T0).unwrap();
    assert_eq!(
        report.outcome,
        ActionOutcome::Applied { kind: ActionKind::Play, effective: false, coins_awarded: 1 }
    );
    engine.act(ActionKind::Clean, T0 + 1_000).unwrap();
    assert_eq!(engine.active_pet().unwrap().stats, asleep);
}

#[test]
fn ineffective_actions_can_be_made_unpaid() {
    let mut config = SimConfig::default_test();
    config.economy.pay_coins_while_sleeping = false;
    let mut state = PetEngine::build_test(T0).state().clone();
    state.pets[0].stats.sleeping = true;

    let (next, report) = apply_action(&state, ActionKind::Clean, T0, &config);
    assert!(report.outcome.is_accepted());
    assert_eq!(report.coin_delta, 0);
    assert_eq!(next.coins, state.coins);
}

#[test]
fn action_without_active_pet_is_rejected() {
    let mut state = PetEngine::build_test(T0).state().clone();
    state.pets.clear();
    state.active_pet_id = None;

    let (_, report) = apply_action(&state, ActionKind::Play, T0, &SimConfig::default_test());
    assert_eq!(
        report.outcome,
        ActionOutcome::Rejected { kind: ActionKind::Play, reason: RejectReason::NoActivePet }
    );
}
