//! The `RestAgent` trait — what the scheduler needs to know about an agent.

/// Host-side view of one agent.
///
/// The host decides what "eligible" and "exhausted" mean; the scheduler only
/// reads the answers.  Implementations must be cheap and side-effect free:
/// they are called for every eligible agent on every evaluation tick.
///
/// # Thread safety
///
/// Hosts may evaluate agents in parallel, so views handed to the evaluator
/// from several threads must be `Sync`.  The trait itself does not require it.
pub trait RestAgent {
    /// Fraction of the way to full exhaustion, `0.0` (fully rested) to `1.0`
    /// (exhausted).
    ///
    /// `None` when the agent has no deep-rest need at all.  That is a normal
    /// configuration, not an error: such an agent is simply never "about to
    /// be exhausted".
    fn exhaustion_level(&self) -> Option<f64>;

    /// Longitude of the agent's current location, in degrees.
    fn longitude(&self) -> f64;

    /// `true` while the agent has whatever capability makes autonomous deep
    /// rest apply to it.  Ineligible agents are never evaluated.
    fn has_active_eligibility(&self) -> bool;
}

/// A plain-data [`RestAgent`], for hosts that already hold the three values
/// and for tests.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSample {
    pub exhaustion_level: Option<f64>,
    pub longitude:        f64,
    pub eligible:         bool,
}

impl AgentSample {
    /// An eligible agent at `longitude` with the given level.
    pub fn new(exhaustion_level: Option<f64>, longitude: f64) -> Self {
        Self { exhaustion_level, longitude, eligible: true }
    }
}

impl RestAgent for AgentSample {
    #[inline]
    fn exhaustion_level(&self) -> Option<f64> {
        self.exhaustion_level
    }

    #[inline]
    fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    fn has_active_eligibility(&self) -> bool {
        self.eligible
    }
}
