//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine sees persistence only through the SaveStore trait.

use crate::{
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    state::{SimulationState, SAVE_SLOT, SAVE_VERSION},
    types::Timestamp,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::rc::Rc;

/// Where the host keeps the state blob between sessions.
pub trait SaveStore {
    /// The saved state, or `None` when nothing usable is stored.
    /// An unreadable blob counts as nothing stored.
    fn load_state(&self) -> SimResult<Option<SimulationState>>;

    fn save_state(&self, state: &SimulationState, now: Timestamp) -> SimResult<()>;

    fn append_event(&self, _ts: Timestamp, _event: &SimEvent) -> SimResult<()> {
        Ok(())
    }
}

pub struct SimStore {
    conn: Connection,
    slot: String,
}

impl SimStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn, slot: SAVE_SLOT.to_string() })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, slot: SAVE_SLOT.to_string() })
    }

    /// Use a different save slot key.
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_save_slot.sql"))?;
        Ok(())
    }

    // ── Save slot ──────────────────────────────────────────────

    pub fn write_slot(&self, slot: &str, state_json: &str, saved_at: Timestamp) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot, version, state_json, saved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slot) DO UPDATE SET
                version = excluded.version,
                state_json = excluded.state_json,
                saved_at = excluded.saved_at",
            params![slot, SAVE_VERSION as i64, state_json, saved_at],
        )?;
        Ok(())
    }

    pub fn read_slot(&self, slot: &str) -> SimResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT state_json FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(json)
    }

    pub fn clear_slot(&self, slot: &str) -> SimResult<()> {
        self.conn
            .execute("DELETE FROM save_slot WHERE slot = ?1", params![slot])?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn events_since(&self, ts: Timestamp) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, ts, event_type, payload
             FROM event_log WHERE ts >= ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![ts], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    ts:         row.get(1)?,
                    event_type: row.get(2)?,
                    payload:    row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
            params![event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SaveStore for SimStore {
    fn load_state(&self) -> SimResult<Option<SimulationState>> {
        Ok(self
            .read_slot(&self.slot)?
            .and_then(|raw| SimulationState::from_json(&raw)))
    }

    fn save_state(&self, state: &SimulationState, now: Timestamp) -> SimResult<()> {
        let json = state.to_json()?;
        self.write_slot(&self.slot, &json, now)
    }

    fn append_event(&self, ts: Timestamp, event: &SimEvent) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (ts, event_type, payload) VALUES (?1, ?2, ?3)",
            params![ts, event.type_name(), serde_json::to_string(event)?],
        )?;
        Ok(())
    }
}

/// A shared handle, so the host can keep querying the log it hands the engine.
impl<S: SaveStore + ?Sized> SaveStore for Rc<S> {
    fn load_state(&self) -> SimResult<Option<SimulationState>> {
        (**self).load_state()
    }

    fn save_state(&self, state: &SimulationState, now: Timestamp) -> SimResult<()> {
        (**self).save_state(state, now)
    }

    fn append_event(&self, ts: Timestamp, event: &SimEvent) -> SimResult<()> {
        (**self).append_event(ts, event)
    }
}
