//! Agent profiles
//!
//! An [`AgentProfile`] is the identity of a pipeline participant. It carries
//! no behaviour of its own: the [`TaskEngine`](crate::TaskEngine) reads the
//! profile to decide how to reason on the agent's behalf.

use serde::{Deserialize, Serialize};

/// Default number of engine-level retries for transient failures
pub const DEFAULT_MAX_RETRY_LIMIT: u32 = 2;

/// Identity for a pipeline participant
///
/// Profiles are immutable once built. Tasks share them through `Arc`.
///
/// # Example
///
/// ```
/// use crew_core::AgentProfile;
///
/// let researcher = AgentProfile::builder("Market Research Specialist")
///     .goal("Find comprehensive market data")
///     .backstory("You are an expert market researcher.")
///     .verbose(true)
///     .build();
///
/// assert_eq!(researcher.role(), "Market Research Specialist");
/// assert!(!researcher.allow_delegation());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    role: String,
    goal: String,
    backstory: String,
    verbose: bool,
    allow_delegation: bool,
    llm: Option<String>,
    max_retry_limit: u32,
}

impl AgentProfile {
    /// Start building a profile for the given role
    pub fn builder(role: impl Into<String>) -> AgentProfileBuilder {
        AgentProfileBuilder::new(role)
    }

    /// Role name, also used as the agent's display name
    pub fn role(&self) -> &str {
        &self.role
    }

    /// What the agent is trying to achieve
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Behavioural background handed to the model
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// Whether this agent's progress is reported at `info` level
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether this agent may hand sub-work to other agents
    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }

    /// Per-agent model override
    pub fn llm(&self) -> Option<&str> {
        self.llm.as_deref()
    }

    /// Retry budget for transient engine failures
    pub fn max_retry_limit(&self) -> u32 {
        self.max_retry_limit
    }
}

/// Builder for [`AgentProfile`]
#[derive(Debug, Clone)]
pub struct AgentProfileBuilder {
    role: String,
    goal: String,
    backstory: String,
    verbose: bool,
    allow_delegation: bool,
    llm: Option<String>,
    max_retry_limit: u32,
}

impl AgentProfileBuilder {
    /// Create a new builder
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            verbose: false,
            allow_delegation: false,
            llm: None,
            max_retry_limit: DEFAULT_MAX_RETRY_LIMIT,
        }
    }

    /// Set the goal
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Set the backstory
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Set verbosity
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Allow or forbid delegation
    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Use a specific model for this agent
    pub fn llm(mut self, model: impl Into<String>) -> Self {
        self.llm = Some(model.into());
        self
    }

    /// Set the retry budget
    pub fn max_retry_limit(mut self, limit: u32) -> Self {
        self.max_retry_limit = limit;
        self
    }

    /// Build the profile
    pub fn build(self) -> AgentProfile {
        AgentProfile {
            role: self.role,
            goal: self.goal,
            backstory: self.backstory,
            verbose: self.verbose,
            allow_delegation: self.allow_delegation,
            llm: self.llm,
            max_retry_limit: self.max_retry_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let profile = AgentProfile::builder("Analyst").build();
        assert_eq!(profile.role(), "Analyst");
        assert_eq!(profile.goal(), "");
        assert!(!profile.verbose());
        assert!(!profile.allow_delegation());
        assert_eq!(profile.llm(), None);
        assert_eq!(profile.max_retry_limit(), DEFAULT_MAX_RETRY_LIMIT);
    }

    #[test]
    fn test_builder_chain() {
        let profile = AgentProfile::builder("Analyst")
            .goal("Analyze market data")
            .backstory("Senior analyst")
            .verbose(true)
            .allow_delegation(true)
            .llm("gpt-4o")
            .max_retry_limit(0)
            .build();

        assert_eq!(profile.goal(), "Analyze market data");
        assert_eq!(profile.backstory(), "Senior analyst");
        assert!(profile.verbose());
        assert!(profile.allow_delegation());
        assert_eq!(profile.llm(), Some("gpt-4o"));
        assert_eq!(profile.max_retry_limit(), 0);
    }
}
