//! IceHook pet care: the simulation core behind the pet-fish mini-game.
//!
//! Pets decay through elapsed time, mood is derived from their stats,
//! and the player keeps them alive with rate-limited care actions that
//! also feed a small coin economy. The host (UI, storage, store and
//! arcade features) drives everything through `engine`.

pub mod actions;
pub mod autoplay;
pub mod care_subsystem;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod income_subsystem;
pub mod mood;
pub mod rng;
pub mod roster;
pub mod state;
pub mod stats;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod wallet;
