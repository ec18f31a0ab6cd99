//! Navigation History
//!
//! Ordered history of visited screens, used for back navigation.
//! Entry screens (landing, signup) never appear in it and consecutive
//! duplicates are suppressed.

use serde::Serialize;
use thiserror::Error;

use crate::screens::ScreenId;

/// Why a navigation request was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The identifier does not name any screen
    #[error("Screen {0} not found")]
    UnknownScreen(String),

    /// The surface does not render this screen
    #[error("Screen {0} is not provided by the surface")]
    ScreenUnavailable(ScreenId),
}

/// Stack of previously visited screens
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavigationStack {
    entries: Vec<ScreenId>,
}

impl NavigationStack {
    /// Create an empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a screen. Returns whether it was actually appended.
    pub fn push(&mut self, screen: ScreenId) -> bool {
        if screen.is_entry() || self.entries.last() == Some(&screen) {
            return false;
        }
        self.entries.push(screen);
        true
    }

    /// Remove and return the most recent screen
    pub fn pop(&mut self) -> Option<ScreenId> {
        self.entries.pop()
    }

    /// Most recent screen without removing it
    #[must_use]
    pub fn top(&self) -> Option<ScreenId> {
        self.entries.last().copied()
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Whether there is anything to go back to
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded screens
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Recorded screens, oldest first
    #[must_use]
    pub fn entries(&self) -> &[ScreenId] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop() {
        let mut stack = NavigationStack::new();
        assert!(stack.push(ScreenId::Home));
        assert!(stack.push(ScreenId::Map));
        assert_eq!(stack.pop(), Some(ScreenId::Map));
        assert_eq!(stack.pop(), Some(ScreenId::Home));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_consecutive_duplicates_suppressed() {
        let mut stack = NavigationStack::new();
        stack.push(ScreenId::Home);
        assert!(!stack.push(ScreenId::Home));
        stack.push(ScreenId::Map);
        assert!(stack.push(ScreenId::Home));
        assert_eq!(stack.entries(), &[ScreenId::Home, ScreenId::Map, ScreenId::Home]);
    }

    #[test]
    fn test_entry_screens_never_recorded() {
        let mut stack = NavigationStack::new();
        assert!(!stack.push(ScreenId::Landing));
        assert!(!stack.push(ScreenId::Signup));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut stack = NavigationStack::new();
        stack.push(ScreenId::Home);
        stack.push(ScreenId::Scanning);
        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
    }
}
