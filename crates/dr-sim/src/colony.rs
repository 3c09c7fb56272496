//! `Colony` — structure-of-arrays store for the reference host's agents.
//!
//! Every field is a `Vec` indexed by [`AgentId::index`].  The evaluation
//! phase reads the colony through [`AgentView`]s, which borrow it immutably,
//! so many views can be handed to worker threads at once.

use dr_core::{AgentId, DrError, DrResult};
use dr_schedule::RestAgent;

use crate::DeepRestNeed;

/// Per-agent host data the scheduler reads.
#[derive(Clone, Debug)]
pub struct Colony {
    /// Number of agents.  Every `Vec` below has this length.
    pub count: usize,

    /// Current longitude in degrees.
    pub longitude: Vec<f64>,

    /// Deep-rest need, or `None` for agents that never tire.
    pub need: Vec<Option<DeepRestNeed>>,

    /// Whether autonomous deep rest applies to the agent right now.
    pub eligible: Vec<bool>,

    /// Ticks for a need to go from zero to exhausted.  Set from the
    /// evaluator config when the simulation is built.
    pub full_cycle_ticks: i64,
}

impl Colony {
    /// Iterate over every valid `AgentId` in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// `Ok(())` if `agent` indexes into this colony.
    pub fn check(&self, agent: AgentId) -> DrResult<()> {
        if agent.index() < self.count {
            Ok(())
        } else {
            Err(DrError::AgentNotFound(agent))
        }
    }

    /// Current exhaustion level, `None` for agents without a need.
    #[inline]
    pub fn exhaustion_level(&self, agent: AgentId) -> Option<f64> {
        self.need[agent.index()].map(|n| n.level(self.full_cycle_ticks))
    }

    /// Borrow one agent as a [`RestAgent`].
    #[inline]
    pub fn view(&self, agent: AgentId) -> AgentView<'_> {
        AgentView { colony: self, agent }
    }
}

/// Read-only [`RestAgent`] view of one colony member.
#[derive(Copy, Clone, Debug)]
pub struct AgentView<'a> {
    colony: &'a Colony,
    agent:  AgentId,
}

impl AgentView<'_> {
    pub fn agent(&self) -> AgentId {
        self.agent
    }
}

impl RestAgent for AgentView<'_> {
    #[inline]
    fn exhaustion_level(&self) -> Option<f64> {
        self.colony.exhaustion_level(self.agent)
    }

    #[inline]
    fn longitude(&self) -> f64 {
        self.colony.longitude[self.agent.index()]
    }

    #[inline]
    fn has_active_eligibility(&self) -> bool {
        self.colony.eligible[self.agent.index()]
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`Colony`].
///
/// ```rust
/// use dr_sim::ColonyBuilder;
///
/// let colony = ColonyBuilder::new(3)
///     .longitudes(vec![-120.0, 0.0, 135.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(colony.count, 3);
/// assert!(colony.eligible.iter().all(|&e| e));
/// ```
pub struct ColonyBuilder {
    count:      usize,
    longitudes: Option<Vec<f64>>,
    fatigue:    Option<Vec<i64>>,
    no_need:    Vec<AgentId>,
    eligible:   Option<Vec<bool>>,
}

impl ColonyBuilder {
    /// Builder for `count` agents at longitude 0, all eligible, all with a
    /// fresh need.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            longitudes: None,
            fatigue:    None,
            no_need:    Vec::new(),
            eligible:   None,
        }
    }

    /// Starting longitude for each agent (length `count`).
    pub fn longitudes(mut self, longitudes: Vec<f64>) -> Self {
        self.longitudes = Some(longitudes);
        self
    }

    /// Starting fatigue in ticks for each agent (length `count`).
    pub fn fatigue(mut self, fatigue_ticks: Vec<i64>) -> Self {
        self.fatigue = Some(fatigue_ticks);
        self
    }

    /// Starting eligibility for each agent (length `count`).
    pub fn eligibility(mut self, eligible: Vec<bool>) -> Self {
        self.eligible = Some(eligible);
        self
    }

    /// Give `agents` no deep-rest need at all.
    pub fn without_need(mut self, agents: impl IntoIterator<Item = AgentId>) -> Self {
        self.no_need.extend(agents);
        self
    }

    pub fn build(self) -> DrResult<Colony> {
        let count = self.count;
        if u32::try_from(count).is_err() {
            return Err(DrError::TooManyAgents(count));
        }

        let longitude = fill(self.longitudes, count, 0.0, "longitudes")?;
        let fatigue = fill(self.fatigue, count, 0, "fatigue")?;
        let eligible = fill(self.eligible, count, true, "eligibility")?;

        let mut need: Vec<Option<DeepRestNeed>> =
            fatigue.into_iter().map(|f| Some(DeepRestNeed::with_fatigue(f))).collect();
        for agent in self.no_need {
            let slot = need.get_mut(agent.index()).ok_or(DrError::AgentNotFound(agent))?;
            *slot = None;
        }

        Ok(Colony {
            count,
            longitude,
            need,
            eligible,
            full_cycle_ticks: dr_schedule::FULL_CYCLE_TICKS,
        })
    }
}

fn fill<T: Clone>(
    values:  Option<Vec<T>>,
    count:   usize,
    default: T,
    what:    &'static str,
) -> DrResult<Vec<T>> {
    match values {
        Some(v) if v.len() != count => Err(DrError::LengthMismatch {
            what,
            expected: count,
            got: v.len(),
        }),
        Some(v) => Ok(v),
        None => Ok(vec![default; count]),
    }
}
