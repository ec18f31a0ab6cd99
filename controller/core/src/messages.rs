//! Controller Messages
//!
//! Messages sent from the controller to a surface. A surface is a pure
//! renderer: it applies these to its display state and draws whatever
//! they say, without deciding anything itself.
//!
//! Every message serializes to a tagged JSON object so the headless driver
//! can print a transcript of a run.

use serde::Serialize;

use crate::catalog::WasteTypeId;
use crate::chat::ChatMessage;
use crate::map::{MapStatus, MapView};
use crate::reveal::{DetectionSummary, RevealCue};
use crate::scan::ScanPhase;
use crate::screens::{FloatingControls, ScreenId};

/// Messages from the controller to a surface
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerMessage {
    // ============================================
    // Screens
    // ============================================
    /// Start the exit transition of a screen
    ScreenExiting {
        /// Screen being left
        screen: ScreenId,
    },

    /// Exit transition finished; hide the screen
    ScreenDeactivated {
        /// Screen now hidden
        screen: ScreenId,
    },

    /// Show a screen
    ScreenActivated {
        /// Screen now active
        screen: ScreenId,
    },

    /// Visibility of the floating controls
    FloatingControls {
        /// Which controls to show
        controls: FloatingControls,
    },

    /// Screen-reader announcement
    Announce {
        /// Text to read out
        text: String,
    },

    /// Withdraw the current announcement
    AnnouncementCleared,

    // ============================================
    // Recycling flow
    // ============================================
    /// Highlight the chosen waste type on the home screen
    SelectionFeedback {
        /// Chosen type
        waste: WasteTypeId,
    },

    /// Scan frame state
    ScanUpdate {
        /// Scan phase
        phase: ScanPhase,
        /// Prompt under the frame
        prompt: String,
        /// Whether the checkmark is shown
        checkmark: bool,
    },

    /// Stage A of the result screen
    DetectionResult {
        /// Card contents
        summary: DetectionSummary,
    },

    /// Result screen has nothing to show
    EmptyResult {
        /// Explanation for the user
        reason: String,
    },

    /// A timed step of the nature reaction or impact summary
    Reveal {
        /// The step
        cue: RevealCue,
    },

    // ============================================
    // Map
    // ============================================
    /// Location status line
    MapStatus {
        /// Which path was taken
        status: MapStatus,
        /// Status text
        text: String,
        /// Reported user position (`lat, lon`)
        position: Option<String>,
    },

    /// Map contents
    MapView {
        /// View to render
        view: MapView,
    },

    /// Nearby-centers list expanded or collapsed
    CentersList {
        /// Whether the list is expanded
        open: bool,
    },

    // ============================================
    // Chat
    // ============================================
    /// Chat panel opened or closed
    ChatVisibility {
        /// Whether the panel is open
        open: bool,
    },

    /// Append to the chat transcript
    ChatAppend {
        /// New message
        message: ChatMessage,
    },

    /// Quick-action shortcuts
    ChatQuickActions {
        /// Shortcut texts, empty once hidden
        actions: Vec<String>,
    },

    // ============================================
    // System
    // ============================================
    /// Transient notification (toast/alert)
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Text
        message: String,
    },

    /// The controller is shutting down
    Quit,
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

impl ControllerMessage {
    /// Notification shorthand
    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            message: message.into(),
        }
    }
}
