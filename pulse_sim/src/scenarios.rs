//! Engagement scenarios for DST.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// ENG-001: Default settings over a settled feed
    SteadyState,

    /// ENG-002: Every post brand new; nothing may be liked for 10 s
    CoolDown,

    /// ENG-003: All actors deactivated
    Dormant,

    /// ENG-004: Speed 5x, 25 draws every 400 ms
    Frenzy,

    /// ENG-005: Few verified authors, prioritization on
    VerifiedBias,

    /// ENG-006: Viewer owns everything; inbox must stay bounded
    InboxPressure,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::SteadyState,
            ScenarioId::CoolDown,
            ScenarioId::Dormant,
            ScenarioId::Frenzy,
            ScenarioId::VerifiedBias,
            ScenarioId::InboxPressure,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::SteadyState => "steady_state",
            ScenarioId::CoolDown => "cool_down",
            ScenarioId::Dormant => "dormant",
            ScenarioId::Frenzy => "frenzy",
            ScenarioId::VerifiedBias => "verified_bias",
            ScenarioId::InboxPressure => "inbox_pressure",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::SteadyState => "Speed 1x over a settled feed: likes only ever grow",
            ScenarioId::CoolDown => "All posts created at t=0: zero likes before t=10s, likes after",
            ScenarioId::Dormant => "All actors inactive: no draws, no likes, no notifications",
            ScenarioId::Frenzy => "Speed 5x: 25 draws per tick at a 400ms cadence",
            ScenarioId::VerifiedBias => "10% verified authors: most likes still land on them",
            ScenarioId::InboxPressure => "Viewer owns every post: inbox capped at 100, newest first",
        }
    }

    /// Whether `--speed` may override this scenario's speed.
    pub fn accepts_speed_override(&self) -> bool {
        !matches!(self, ScenarioId::Frenzy)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steady_state" | "steadystate" | "eng-001" => Ok(ScenarioId::SteadyState),
            "cool_down" | "cooldown" | "eng-002" => Ok(ScenarioId::CoolDown),
            "dormant" | "eng-003" => Ok(ScenarioId::Dormant),
            "frenzy" | "eng-004" => Ok(ScenarioId::Frenzy),
            "verified_bias" | "verifiedbias" | "eng-005" => Ok(ScenarioId::VerifiedBias),
            "inbox_pressure" | "inboxpressure" | "eng-006" => Ok(ScenarioId::InboxPressure),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
