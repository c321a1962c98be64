//! Sentry lifecycle state machine.
//!
//! ```text
//!  BOOTING ──[hardware open]──▶ CALIBRATING ──[sweep done]──▶ PATROLLING ─┐
//!     │                                                          ▲        │
//!     └──[config / init fault]──▶ FAILED                         └────────┘
//! ```
//!
//! Unlike a tick-driven FSM, every state here is *executed* by the
//! sequencer as a blocking block of work; this module only owns the state
//! identity and guards the legal edges.  `Patrolling` has no outgoing
//! edge: the sentry leaves it only when the process dies.

use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible sentry states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Booting = 0,
    Calibrating = 1,
    Patrolling = 2,
    Failed = 3,
}

impl StateId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Booting => "Booting",
            Self::Calibrating => "Calibrating",
            Self::Patrolling => "Patrolling",
            Self::Failed => "Failed",
        }
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub const fn can_transition_to(self, next: StateId) -> bool {
        matches!(
            (self, next),
            (Self::Booting, Self::Calibrating)
                | (Self::Booting, Self::Failed)
                | (Self::Calibrating, Self::Patrolling)
        )
    }
}

/// Attempted edge that is not part of the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: StateId,
    pub to: StateId,
}

impl core::fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "illegal transition {} -> {}", self.from.name(), self.to.name())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle tracker
// ---------------------------------------------------------------------------

/// Current sentry state plus the legal-edge guard.
#[derive(Debug)]
pub struct Lifecycle {
    current: StateId,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Every sentry starts in `Booting`.
    pub fn new() -> Self {
        Self {
            current: StateId::Booting,
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Move to `next`, returning the state that was left.
    pub fn transition(&mut self, next: StateId) -> Result<StateId, InvalidTransition> {
        let from = self.current;
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        info!("FSM transition: {} -> {}", from.name(), next.name());
        self.current = next;
        Ok(from)
    }
}
