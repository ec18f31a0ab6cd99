//! Surface Events
//!
//! Events sent from a surface (TUI, headless driver, tests) to the
//! controller. Surfaces only report what the user did; the controller
//! decides what it means.

use serde::{Deserialize, Serialize};

use crate::catalog::WasteTypeId;
use crate::screens::ScreenId;

/// Events from a surface to the controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    // ============================================
    // Lifecycle
    // ============================================
    /// Surface is ready; show the initial screen
    Start,

    /// User asked to quit
    QuitRequested,

    // ============================================
    // Navigation
    // ============================================
    /// Go to a known screen
    Navigate {
        /// Target screen
        screen: ScreenId,
    },

    /// Go to a screen by element id (`map` or `map-screen`), which may not
    /// exist
    NavigateById {
        /// Raw identifier
        id: String,
    },

    /// Back button
    Back,

    /// "Back to app" on the landing screen
    BackToApp,

    /// Floating home button
    GoHome,

    // ============================================
    // Recycling flow
    // ============================================
    /// Waste type tapped on the home screen
    SelectWaste {
        /// Chosen type
        waste: WasteTypeId,
    },

    /// Simulated camera capture
    CaptureScan,

    /// File picker closed
    UploadScan {
        /// Chosen file, `None` if the picker was cancelled
        file_name: Option<String>,
    },

    /// "See the impact on nature" on the detection card
    ShowNatureReaction,

    /// "Continue" after the nature reaction
    ShowImpact,

    /// Expand or collapse the nearby-centers list
    ToggleCentersList,

    // ============================================
    // Chat
    // ============================================
    /// Open or close the chat panel
    ToggleChat,

    /// Typed chat message
    ChatSend {
        /// Raw input
        text: String,
    },

    /// Quick-action shortcut
    ChatQuick {
        /// Shortcut text
        text: String,
    },

    // ============================================
    // Account
    // ============================================
    /// Signup form submitted
    Signup {
        /// Mobile number without country prefix
        mobile: String,
        /// Password
        password: String,
        /// Password confirmation
        confirm_password: String,
    },
}

impl SurfaceEvent {
    /// Short name for logs (never includes user input)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::QuitRequested => "quit_requested",
            Self::Navigate { .. } => "navigate",
            Self::NavigateById { .. } => "navigate_by_id",
            Self::Back => "back",
            Self::BackToApp => "back_to_app",
            Self::GoHome => "go_home",
            Self::SelectWaste { .. } => "select_waste",
            Self::CaptureScan => "capture_scan",
            Self::UploadScan { .. } => "upload_scan",
            Self::ShowNatureReaction => "show_nature_reaction",
            Self::ShowImpact => "show_impact",
            Self::ToggleCentersList => "toggle_centers_list",
            Self::ToggleChat => "toggle_chat",
            Self::ChatSend { .. } => "chat_send",
            Self::ChatQuick { .. } => "chat_quick",
            Self::Signup { .. } => "signup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = SurfaceEvent::SelectWaste {
            waste: WasteTypeId::Laptop,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"select_waste","waste":"laptop"}"#);

        let back: SurfaceEvent = serde_json::from_str(r#"{"type":"back"}"#).unwrap();
        assert_eq!(back, SurfaceEvent::Back);
    }

    #[test]
    fn test_name_hides_payload() {
        let event = SurfaceEvent::Signup {
            mobile: "123".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
        };
        assert_eq!(event.name(), "signup");
    }
}
