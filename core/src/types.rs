//! Shared primitive types used across the entire simulation.

/// Wall-clock time in milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// A stable, unique identifier for a pet.
pub type PetId = String;

/// A species identifier in the fish catalog (e.g. `"pike"`).
pub type FishId = String;

/// Hard cap on the number of pets in one roster.
pub const MAX_PETS: usize = 3;
