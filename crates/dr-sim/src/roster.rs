//! `RestRoster` — every agent's [`AgentRestState`], owned by the host.
//!
//! There is no process-wide registry.  The simulation root owns one roster
//! and lends it out by reference; saving and loading go through the CSV
//! format in [`dr_schedule::loader`].

use std::path::Path;

use dr_core::{AgentId, DrError, DrResult};
use dr_schedule::{load_states_csv, write_states_csv, AgentRestState, ScheduleMode, ScheduleResult};

/// Per-agent rest state, indexed by `AgentId`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestRoster {
    states: Vec<AgentRestState>,
}

impl RestRoster {
    /// `count` agents, all `Manual` with no rest history.
    pub fn new(count: usize) -> Self {
        Self { states: vec![AgentRestState::default(); count] }
    }

    pub fn from_states(states: Vec<AgentRestState>) -> Self {
        Self { states }
    }

    /// Every agent starts in `mode`.
    pub fn with_mode(count: usize, mode: ScheduleMode) -> Self {
        Self { states: vec![AgentRestState::new(mode); count] }
    }

    pub fn load_csv(path: &Path, count: usize) -> ScheduleResult<Self> {
        Ok(Self { states: load_states_csv(path, count)? })
    }

    pub fn save_csv(&self, path: &Path) -> ScheduleResult<()> {
        write_states_csv(path, &self.states)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, agent: AgentId) -> DrResult<&AgentRestState> {
        self.states.get(agent.index()).ok_or(DrError::AgentNotFound(agent))
    }

    pub fn get_mut(&mut self, agent: AgentId) -> DrResult<&mut AgentRestState> {
        self.states.get_mut(agent.index()).ok_or(DrError::AgentNotFound(agent))
    }

    /// Select `mode` for `agent`.  Rest history is kept.
    pub fn set_mode(&mut self, agent: AgentId, mode: ScheduleMode) -> DrResult<()> {
        self.get_mut(agent)?.set_mode(mode);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentRestState)> + '_ {
        self.states.iter().enumerate().map(|(i, s)| (AgentId(i as u32), s))
    }

    pub fn as_slice(&self) -> &[AgentRestState] {
        &self.states
    }

    pub fn into_states(self) -> Vec<AgentRestState> {
        self.states
    }
}
