//! Invariants over what live-chat clients display.
//!
//! A [`SystemSnapshot`] holds one [`ClientSnapshot`] per simulated client:
//! visitor widgets and agent dashboards side by side. Each snapshot records
//! what the user can see: panel visibility, the unread counter, the visible
//! message list (text, author role and whether it was created locally or
//! delivered by the channel) and, for agents, the conversation list and the
//! selected session.
//!
//! The checks are stated over that visible state only. They hold after
//! every render no matter how user input, channel pushes and connection
//! drops interleave:
//!
//! | Check | Applies to |
//! |---|---|
//! | [`UnreadOnlyWhenClosed`] | every client |
//! | [`LocalAuthorship`] | every client |
//! | [`MessageLength`] | locally sent messages |
//! | [`ActiveConversationListed`] | agents |
//! | [`UniqueConversations`] | agents |
//!
//! Properties that need the backend's store (such as the agent pane
//! matching a session's stored history) live with the simulations, which
//! own the backend.
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::from_clients(vec![
//!     ClientSnapshot::from_app(42, visitor.app()),
//!     ClientSnapshot::from_app(1, agent.app()),
//! ]);
//! registry.assert_all(&snapshot, "after reply");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ActiveConversationListed, LocalAuthorship, MessageLength, UniqueConversations,
    UnreadOnlyWhenClosed,
};
pub use snapshot::{ClientSnapshot, MessageSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant, naming the check and the offending client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Which client broke it and how.
    pub message: String,
}

/// A property of the visible state of every client in a snapshot.
pub trait Invariant: Send + Sync {
    /// Stable name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check the property, reporting the first client that breaks it.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Set of invariants run together after each render.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every widget and dashboard check.
    pub fn standard() -> Self {
        Self::new()
            .with(UnreadOnlyWhenClosed)
            .with(LocalAuthorship)
            .with(MessageLength)
            .with(ActiveConversationListed)
            .with(UniqueConversations)
    }

    /// Add a check.
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.add(invariant);
        self
    }

    /// Add a check in place.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Names of the registered checks, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(|inv| inv.name()).collect()
    }

    /// Run every check. Collects one violation per broken invariant.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic listing all violations, labelled with
    /// `context` (e.g. "after render").
    #[allow(clippy::panic, reason = "test helper fails loudly")]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// True when no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
