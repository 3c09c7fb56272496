//! CSV roster persistence for `AgentRestState`.
//!
//! # CSV format
//!
//! One row per agent.  Agents absent from the file keep the default state.
//!
//! ```csv
//! agent_id,mode,last_completion_tick
//! 0,calendar_1_7,1815000
//! 1,exhaustion_1d,-1
//! 2,manual,-1
//! ```
//!
//! **`mode`** is a [`ScheduleMode`] key.  Keys this build does not know load
//! as `manual`, so saves written by other versions stay readable.
//!
//! **`last_completion_tick`** is a 64-bit absolute tick; `-1` means the agent
//! has never completed a deep rest.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AgentRestState, ScheduleError, ScheduleMode, ScheduleResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Serialize)]
struct RestStateRecord {
    agent_id:             u32,
    mode:                 String,
    last_completion_tick: i64,
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Load per-agent `AgentRestState`s from a CSV file.
///
/// Returns a `Vec` of length `agent_count`, indexed by `AgentId`.
pub fn load_states_csv(path: &Path, agent_count: usize) -> ScheduleResult<Vec<AgentRestState>> {
    let file = std::fs::File::open(path)?;
    load_states_reader(file, agent_count)
}

/// Like [`load_states_csv`] but accepts any `Read` source.
pub fn load_states_reader<R: Read>(
    reader: R,
    agent_count: usize,
) -> ScheduleResult<Vec<AgentRestState>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut states = vec![AgentRestState::default(); agent_count];
    let mut loaded = 0usize;

    for (row_no, result) in csv_reader.deserialize::<RestStateRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(format!("row {}: {e}", row_no + 1)))?;

        let Some(slot) = states.get_mut(row.agent_id as usize) else {
            warn!(
                agent_id = row.agent_id,
                agent_count, "deep-rest state for unknown agent, skipping"
            );
            continue;
        };

        let mode = ScheduleMode::from_key_or_manual(&row.mode);
        *slot = AgentRestState::restore(mode, row.last_completion_tick);
        loaded += 1;
    }

    debug!(loaded, agent_count, "loaded deep-rest states");
    Ok(states)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write every agent's state to a CSV file, one row per agent.
pub fn write_states_csv(path: &Path, states: &[AgentRestState]) -> ScheduleResult<()> {
    let file = std::fs::File::create(path)?;
    write_states_writer(file, states)
}

/// Like [`write_states_csv`] but accepts any `Write` sink.
pub fn write_states_writer<W: Write>(writer: W, states: &[AgentRestState]) -> ScheduleResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, state) in states.iter().enumerate() {
        let agent_id = u32::try_from(i)
            .map_err(|_| ScheduleError::Parse(format!("agent index {i} exceeds u32")))?;
        csv_writer.serialize(RestStateRecord {
            agent_id,
            mode: state.mode().key().to_string(),
            last_completion_tick: state.last_completion_tick().0,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
