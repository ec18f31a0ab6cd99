//! Session State
//!
//! Per-run selection and scan bookkeeping. Reset whenever the home screen
//! is activated.

use serde::Serialize;

use crate::catalog::WasteTypeId;

/// Selection and scan flags for the current recycling flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Waste type picked on the home screen
    pub selected_waste: Option<WasteTypeId>,
    /// Single-flight guard for the scan sequencer
    pub scan_in_progress: bool,
}

impl SessionState {
    /// Create a fresh session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the user's choice
    pub fn select(&mut self, waste: WasteTypeId) {
        self.selected_waste = Some(waste);
    }

    /// Clear selection and scan flag
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
