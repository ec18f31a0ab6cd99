//! Screens
//!
//! Named, mutually exclusive UI surfaces. Screens are never created or
//! destroyed at runtime; a surface reports which ones it can show and the
//! controller activates exactly one at a time.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::timeline::SequenceKey;

/// Identifier of a screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    /// Marketing/entry screen; visiting it clears history
    Landing,
    /// Mock account creation form
    Signup,
    /// Waste type selection hub
    Home,
    /// Recycling center map
    Map,
    /// Camera/upload scan frame
    Scanning,
    /// Detection result, nature reaction and impact summary
    Result,
    /// Recycling history and points
    History,
}

impl ScreenId {
    /// Every screen the app defines
    pub const ALL: [ScreenId; 7] = [
        Self::Landing,
        Self::Signup,
        Self::Home,
        Self::Map,
        Self::Scanning,
        Self::Result,
        Self::History,
    ];

    /// Bare identifier (`"map"`)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Signup => "signup",
            Self::Home => "home",
            Self::Map => "map",
            Self::Scanning => "scanning",
            Self::Result => "result",
            Self::History => "history",
        }
    }

    /// Surface element name following the `<id>-screen` convention
    #[must_use]
    pub fn element_id(self) -> String {
        format!("{}-screen", self.as_str())
    }

    /// Title used in screen-reader announcements
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Landing => "Welcome",
            Self::Signup => "Sign Up",
            Self::Home => "Home",
            Self::Map => "Recycling Centers Map",
            Self::Scanning => "Scan Item",
            Self::Result => "Detection Result",
            Self::History => "History",
        }
    }

    /// Entry screens are never recorded as an intermediate history entry
    #[must_use]
    pub fn is_entry(self) -> bool {
        matches!(self, Self::Landing | Self::Signup)
    }

    /// Timed sequences that belong to this screen and die with it
    #[must_use]
    pub fn owned_sequences(self) -> &'static [SequenceKey] {
        match self {
            Self::Home => &[SequenceKey::Selection],
            Self::Map => &[SequenceKey::Map],
            Self::Scanning => &[SequenceKey::Scan],
            Self::Result => &[SequenceKey::Reveal],
            Self::Landing | Self::Signup | Self::History => &[],
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenId {
    type Err = String;

    /// Accepts both `map` and `map-screen`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        let id = id.strip_suffix("-screen").unwrap_or(id);
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == id)
            .ok_or_else(|| s.to_string())
    }
}

/// The set of screens a surface is able to show
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSet {
    screens: BTreeSet<ScreenId>,
}

impl ScreenSet {
    /// A surface that renders every screen
    #[must_use]
    pub fn all() -> Self {
        Self {
            screens: ScreenId::ALL.into_iter().collect(),
        }
    }

    /// A surface that renders only the given screens
    pub fn only(screens: impl IntoIterator<Item = ScreenId>) -> Self {
        Self {
            screens: screens.into_iter().collect(),
        }
    }

    /// Whether the surface provides this screen
    #[must_use]
    pub fn contains(&self, screen: ScreenId) -> bool {
        self.screens.contains(&screen)
    }
}

impl Default for ScreenSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Visibility of the floating controls that sit above every screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingControls {
    /// Floating "home" button
    pub home_button: bool,
    /// "Back to app" affordance on the landing screen
    pub back_to_app: bool,
}

impl FloatingControls {
    /// Controls for a freshly activated screen
    #[must_use]
    pub fn for_screen(screen: ScreenId, history_is_empty: bool) -> Self {
        Self {
            home_button: !matches!(screen, ScreenId::Landing | ScreenId::Home),
            back_to_app: screen == ScreenId::Landing && !history_is_empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_convention() {
        assert_eq!(ScreenId::Map.element_id(), "map-screen");
        assert_eq!(ScreenId::Result.element_id(), "result-screen");
    }

    #[test]
    fn test_parse_screen_ids() {
        assert_eq!("map".parse::<ScreenId>(), Ok(ScreenId::Map));
        assert_eq!("scanning-screen".parse::<ScreenId>(), Ok(ScreenId::Scanning));
        assert_eq!("settings".parse::<ScreenId>(), Err("settings".to_string()));
    }

    #[test]
    fn test_floating_controls() {
        assert_eq!(
            FloatingControls::for_screen(ScreenId::Home, false),
            FloatingControls::default()
        );
        assert!(FloatingControls::for_screen(ScreenId::Map, true).home_button);
        assert!(FloatingControls::for_screen(ScreenId::Landing, false).back_to_app);
        assert!(!FloatingControls::for_screen(ScreenId::Landing, true).back_to_app);
    }

    #[test]
    fn test_screen_set_only() {
        let set = ScreenSet::only([ScreenId::Home, ScreenId::Map]);
        assert!(set.contains(ScreenId::Map));
        assert!(!set.contains(ScreenId::History));
    }
}
