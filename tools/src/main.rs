//! sim-runner: headless runner for the IceHook pet simulation.
//!
//! Usage:
//!   sim-runner --seed 12345 --seconds 3600 --db pet.db
//!   sim-runner --seed 12345 --ipc-mode
//!
//! Time is driven by a manual clock starting at the wall-clock time of
//! launch, so a run with the same seed and flags replays identically.

use anyhow::Result;
use icehook_core::{
    autoplay::AutoPlayer,
    catalog::{OwnedFish, SpeciesCatalog},
    clock::{day_key, Clock, ManualClock, SystemClock},
    command::PlayerCommand,
    config::SimConfig,
    engine::PetEngine,
    mood::mood_from_stats,
    stats::PetStats,
    store::SimStore,
    types::Timestamp,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        seconds: u64,
    },
    Command {
        command: PlayerCommand,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct PetView {
    id:         String,
    fish_id:    String,
    nickname:   String,
    mood:       &'static str,
    mood_color: &'static str,
    stats:      PetStats,
}

#[derive(serde::Serialize)]
struct UiState {
    now:           Timestamp,
    coins:         u64,
    active_pet_id: Option<String>,
    pets:          Vec<PetView>,
    feeds_today:   u32,
    feeds_left:    u32,
    unlocked_info: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 3_600u64);
    let attentiveness = parse_arg(&args, "--attentiveness", 0.3f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !ipc_mode {
        println!("IceHook pet care - sim-runner");
        println!("  seed:      {seed}");
        println!("  seconds:   {seconds}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = SimConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; using default tuning");
        SimConfig::default()
    });
    let catalog = SpeciesCatalog::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; using builtin species");
        SpeciesCatalog::builtin()
    });

    let store = Rc::new(SimStore::open(db)?);
    store.migrate()?;

    let clock = ManualClock::new(SystemClock.now_ms());
    let (mut engine, events) = PetEngine::load_or_init(
        config,
        catalog,
        OwnedFish::new(),
        Box::new(Rc::clone(&store)),
        clock.now_ms(),
    )?;
    log::info!("session opened with {} startup events", events.len());

    if ipc_mode {
        run_ipc_loop(&mut engine, &clock)?;
    } else {
        run_batch(&mut engine, &clock, seed, seconds, attentiveness)?;
        print_summary(&engine, &store, &clock, seconds)?;
    }

    engine.flush(clock.now_ms())?;
    Ok(())
}

fn run_batch(
    engine: &mut PetEngine,
    clock: &ManualClock,
    seed: u64,
    seconds: u64,
    attentiveness: f64,
) -> Result<()> {
    let mut player = AutoPlayer::new(seed, attentiveness);
    for _ in 0..seconds {
        let now = clock.advance_ms(1_000);
        engine.tick(now)?;
        if let Some(kind) = player.choose(engine.state()) {
            engine.act(kind, now)?;
        }
        engine.flush_if_due(now)?;
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut PetEngine, clock: &ManualClock) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { seconds } => {
                for _ in 0..seconds {
                    let now = clock.advance_ms(1_000);
                    engine.tick(now)?;
                    engine.flush_if_due(now)?;
                }
                let state = build_ui_state(engine, clock.now_ms());
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::GetState => {
                let state = build_ui_state(engine, clock.now_ms());
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::Command { command } => {
                let now = clock.now_ms();
                match engine.submit(command, now) {
                    Ok(events) => {
                        let reply = serde_json::json!({
                            "events": events,
                            "state":  build_ui_state(engine, now),
                        });
                        writeln!(stdout, "{}", reply)?;
                    }
                    Err(e) => {
                        log::info!("command refused: {e}");
                        writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    }
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &PetEngine, now: Timestamp) -> UiState {
    let state = engine.state();
    let pets = state
        .pets
        .iter()
        .map(|p| {
            let mood = mood_from_stats(&p.stats);
            PetView {
                id:         p.id.clone(),
                fish_id:    p.fish_id.clone(),
                nickname:   p.nickname.clone(),
                mood:       mood.label(),
                mood_color: mood.color(),
                stats:      p.stats,
            }
        })
        .collect();

    let actions = &engine.config().actions;
    let feeds_today = state.feed_quota.used_on(day_key(now, actions.utc_offset_minutes));
    UiState {
        now,
        coins: state.coins,
        active_pet_id: state.active_pet_id.clone(),
        pets,
        feeds_today,
        feeds_left: actions.max_feeds_per_day.saturating_sub(feeds_today),
        unlocked_info: state.unlocked_info.iter().cloned().collect(),
    }
}

fn print_summary(engine: &PetEngine, store: &SimStore, clock: &ManualClock, seconds: u64) -> Result<()> {
    let applied = store.event_count("action_applied")?;
    let rejected = store.event_count("action_rejected")?;
    let payouts = store.event_count("coins_accrued")?;
    let wakes = store.event_count("pet_woke")?;

    println!("=== RUN SUMMARY ===");
    println!("  seconds run:     {seconds}");
    println!("  coins:           {}", engine.coins());
    println!("  actions applied: {applied}");
    println!("  actions refused: {rejected}");
    println!("  income payouts:  {payouts}");
    println!("  wake-ups:        {wakes}");

    println!();
    println!("=== PETS ===");
    for pet in &engine.state().pets {
        let s = &pet.stats;
        let marker = if engine.state().active_pet_id.as_deref() == Some(pet.id.as_str()) { "*" } else { " " };
        println!(
            " {marker} {:<12} {:<9} | Hun {:>5.1} | Hap {:>5.1} | Cln {:>5.1} | Nrg {:>5.1} | HP {:>5.1}",
            pet.nickname,
            mood_from_stats(s).label(),
            s.hunger,
            s.happiness,
            s.cleanliness,
            s.energy,
            s.health,
        );
    }

    let actions = &engine.config().actions;
    let today = day_key(clock.now_ms(), actions.utc_offset_minutes);
    println!();
    println!(
        "  feeds today:     {}/{}",
        engine.state().feed_quota.used_on(today),
        actions.max_feeds_per_day
    );
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
