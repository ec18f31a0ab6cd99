//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ControllerMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the controller tells it
//! to. Display state is the bridge between ControllerMessages and rendering.
//! The only thing it tracks on its own is animation progress: fades and
//! decoration delays advance with frame time in [`DisplayState::update`].

use std::time::Duration;

use ecobin_core::map::MapView;
use ecobin_core::reveal::{Decoration, DecorationDelay};
use ecobin_core::{
    ChatMessage, ControllerMessage, DetectionSummary, FloatingControls, ImpactSummary, MapStatus,
    NotifyLevel, RevealCue, ScanPhase, ScreenId, WasteTypeId,
};

/// How long a notification toast stays up
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Fades
// ============================================================================

/// Opacity animation between two levels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
}

impl Fade {
    /// Fully visible, not animating
    pub fn solid() -> Self {
        Self::fixed(1.0)
    }

    /// Mounted but transparent
    pub fn hidden() -> Self {
        Self::fixed(0.0)
    }

    fn fixed(level: f32) -> Self {
        Self {
            from: level,
            to: level,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Start animating from the current opacity towards `to`
    pub fn animate_to(&mut self, to: f32, duration_ms: u64) {
        self.from = self.opacity();
        self.to = to;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::from_millis(duration_ms);
    }

    /// Advance the animation
    pub fn update(&mut self, delta: Duration) {
        self.elapsed = (self.elapsed + delta).min(self.duration);
    }

    /// Current opacity in `0.0..=1.0`
    pub fn opacity(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t.clamp(0.0, 1.0)
    }

    /// Whether anything of it can be seen
    pub fn is_visible(&self) -> bool {
        self.opacity() > 0.05
    }
}

// ============================================================================
// Per-screen display state
// ============================================================================

/// Scan frame state
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayScan {
    /// Current phase
    pub phase: ScanPhase,
    /// Prompt under the frame
    pub prompt: String,
    /// Checkmark shown
    pub checkmark: bool,
}

impl Default for DisplayScan {
    fn default() -> Self {
        Self {
            phase: ScanPhase::Idle,
            prompt: ScanPhase::Idle.prompt().to_string(),
            checkmark: false,
        }
    }
}

/// One plant decoration waiting for its animation delay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayDecoration {
    /// Leaf, flower or sparkle
    pub kind: Decoration,
    /// Position among decorations of the same kind
    pub index: usize,
    /// Time left before it appears
    pub remaining: Duration,
}

impl DisplayDecoration {
    fn from_delay(delay: &DecorationDelay) -> Self {
        Self {
            kind: delay.kind,
            index: delay.index,
            remaining: Duration::from_millis(delay.delay_ms),
        }
    }

    /// Whether the decoration has appeared
    pub fn is_shown(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Stage B of the result screen
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNature {
    /// Sad plant opacity
    pub sad_plant: Fade,
    /// Sad message text and opacity
    pub sad_message: (String, Fade),
    /// Happy plant opacity, once mounted
    pub happy_plant: Option<Fade>,
    /// Happy message text and opacity, once mounted
    pub happy_message: Option<(String, Fade)>,
    /// Decorations around the happy plant
    pub decorations: Vec<DisplayDecoration>,
    /// Continue control opacity, once mounted
    pub continue_control: Option<Fade>,
}

impl DisplayNature {
    fn new(sad_message: &str) -> Self {
        Self {
            sad_plant: Fade::solid(),
            sad_message: (sad_message.to_string(), Fade::solid()),
            happy_plant: None,
            happy_message: None,
            decorations: Vec::new(),
            continue_control: None,
        }
    }

    fn update(&mut self, delta: Duration) {
        self.sad_plant.update(delta);
        self.sad_message.1.update(delta);
        if let Some(fade) = self.happy_plant.as_mut() {
            fade.update(delta);
        }
        if let Some((_, fade)) = self.happy_message.as_mut() {
            fade.update(delta);
        }
        if let Some(fade) = self.continue_control.as_mut() {
            fade.update(delta);
        }
        for decoration in &mut self.decorations {
            decoration.remaining = decoration.remaining.saturating_sub(delta);
        }
    }

    /// Whether "Continue" can be pressed
    pub fn continue_visible(&self) -> bool {
        self.continue_control.is_some_and(|f| f.is_visible())
    }

    /// Decorations of one kind that have appeared
    pub fn shown(&self, kind: Decoration) -> usize {
        self.decorations
            .iter()
            .filter(|d| d.kind == kind && d.is_shown())
            .count()
    }
}

/// Stage C of the result screen
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayImpact {
    /// Summary contents
    pub summary: ImpactSummary,
    /// Which cards have popped in
    pub cards_shown: Vec<bool>,
}

/// Map screen state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayMap {
    /// Which location path was taken
    pub status: Option<MapStatus>,
    /// Status text
    pub status_text: Option<String>,
    /// User position label
    pub position: Option<String>,
    /// Map contents
    pub view: Option<MapView>,
    /// Nearby-centers list expanded
    pub centers_open: bool,
}

/// Chat panel state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayChat {
    /// Panel open
    pub open: bool,
    /// Transcript
    pub messages: Vec<ChatMessage>,
    /// Quick-action shortcuts
    pub quick_actions: Vec<String>,
}

/// Transient toast
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// Severity
    pub level: NotifyLevel,
    /// Text
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

// ============================================================================
// DisplayState
// ============================================================================

/// Everything the TUI renders
#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    /// Active screen
    pub active: Option<ScreenId>,
    /// Screens in their exit transition
    pub exiting: Vec<ScreenId>,
    /// Floating controls
    pub controls: FloatingControls,
    /// Screen-reader announcement
    pub announcement: Option<String>,
    /// Highlighted waste type on the home screen
    pub selection: Option<WasteTypeId>,
    /// Scan frame
    pub scan: DisplayScan,
    /// Stage A card
    pub detection: Option<DetectionSummary>,
    /// Result screen has nothing to show
    pub empty_reason: Option<String>,
    /// Stage B
    pub nature: Option<DisplayNature>,
    /// Stage C
    pub impact: Option<DisplayImpact>,
    /// Map screen
    pub map: DisplayMap,
    /// Chat panel
    pub chat: DisplayChat,
    /// Current toast
    pub notification: Option<Notification>,
    /// Controller has shut down
    pub quit: bool,
}

impl DisplayState {
    /// Create an empty display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a controller message
    pub fn apply_message(&mut self, msg: ControllerMessage) {
        match msg {
            ControllerMessage::ScreenExiting { screen } => {
                if !self.exiting.contains(&screen) {
                    self.exiting.push(screen);
                }
            }
            ControllerMessage::ScreenDeactivated { screen } => {
                self.exiting.retain(|s| *s != screen);
            }
            ControllerMessage::ScreenActivated { screen } => {
                self.exiting.retain(|s| *s != screen);
                self.active = Some(screen);
                if screen == ScreenId::Home {
                    self.selection = None;
                }
            }
            ControllerMessage::FloatingControls { controls } => self.controls = controls,
            ControllerMessage::Announce { text } => self.announcement = Some(text),
            ControllerMessage::AnnouncementCleared => self.announcement = None,

            ControllerMessage::SelectionFeedback { waste } => self.selection = Some(waste),
            ControllerMessage::ScanUpdate {
                phase,
                prompt,
                checkmark,
            } => {
                self.scan = DisplayScan {
                    phase,
                    prompt,
                    checkmark,
                };
            }
            ControllerMessage::DetectionResult { summary } => {
                self.clear_reveal();
                self.detection = Some(summary);
            }
            ControllerMessage::EmptyResult { reason } => {
                self.clear_reveal();
                self.empty_reason = Some(reason);
            }
            ControllerMessage::Reveal { cue } => self.apply_cue(cue),

            ControllerMessage::MapStatus {
                status,
                text,
                position,
            } => {
                self.map.status = Some(status);
                self.map.status_text = Some(text);
                self.map.position = position;
            }
            ControllerMessage::MapView { view } => self.map.view = Some(view),
            ControllerMessage::CentersList { open } => self.map.centers_open = open,

            ControllerMessage::ChatVisibility { open } => self.chat.open = open,
            ControllerMessage::ChatAppend { message } => self.chat.messages.push(message),
            ControllerMessage::ChatQuickActions { actions } => self.chat.quick_actions = actions,

            ControllerMessage::Notify { level, message } => {
                self.notification = Some(Notification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            ControllerMessage::Quit => self.quit = true,
        }
    }

    fn apply_cue(&mut self, cue: RevealCue) {
        match cue {
            RevealCue::DetectionHidden => self.detection = None,
            RevealCue::NatureShown { message } => {
                self.nature = Some(DisplayNature::new(message));
            }
            RevealCue::NatureHidden => self.nature = None,
            RevealCue::ImpactShown(summary) => {
                let cards_shown = vec![false; summary.cards.len()];
                self.impact = Some(DisplayImpact {
                    summary,
                    cards_shown,
                });
            }
            RevealCue::CardPopIn { index } => {
                if let Some(shown) = self
                    .impact
                    .as_mut()
                    .and_then(|impact| impact.cards_shown.get_mut(index))
                {
                    *shown = true;
                }
            }
            cue => {
                if let Some(nature) = self.nature.as_mut() {
                    Self::apply_nature_cue(nature, cue);
                }
            }
        }
    }

    fn apply_nature_cue(nature: &mut DisplayNature, cue: RevealCue) {
        match cue {
            RevealCue::SadPlantFadeOut { duration_ms } => {
                nature.sad_plant.animate_to(0.0, duration_ms);
            }
            RevealCue::HappyPlantShown => nature.happy_plant = Some(Fade::hidden()),
            RevealCue::HappyPlantFadeIn {
                duration_ms,
                decorations,
            } => {
                nature
                    .happy_plant
                    .get_or_insert_with(Fade::hidden)
                    .animate_to(1.0, duration_ms);
                nature.decorations = decorations
                    .iter()
                    .map(DisplayDecoration::from_delay)
                    .collect();
            }
            RevealCue::SadMessageFadeOut { duration_ms } => {
                nature.sad_message.1.animate_to(0.0, duration_ms);
            }
            RevealCue::HappyMessageShown { message } => {
                nature.happy_message = Some((message.to_string(), Fade::hidden()));
            }
            RevealCue::HappyMessageFadeIn { duration_ms } => {
                if let Some((_, fade)) = nature.happy_message.as_mut() {
                    fade.animate_to(1.0, duration_ms);
                }
            }
            RevealCue::ContinueShown => nature.continue_control = Some(Fade::hidden()),
            RevealCue::ContinueFadeIn { duration_ms } => {
                nature
                    .continue_control
                    .get_or_insert_with(Fade::hidden)
                    .animate_to(1.0, duration_ms);
            }
            _ => {}
        }
    }

    fn clear_reveal(&mut self) {
        self.detection = None;
        self.empty_reason = None;
        self.nature = None;
        self.impact = None;
    }

    /// Advance animations and timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(nature) = self.nature.as_mut() {
            nature.update(delta);
        }
        if let Some(notification) = self.notification.as_mut() {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Whether the active screen is still fading out
    pub fn is_leaving(&self) -> bool {
        self.active.is_some_and(|s| self.exiting.contains(&s))
    }

    /// Which result stage is on screen
    pub fn result_stage(&self) -> ResultStage {
        if self.impact.is_some() {
            ResultStage::Impact
        } else if self.nature.is_some() {
            ResultStage::Nature
        } else if self.detection.is_some() {
            ResultStage::Detection
        } else if self.empty_reason.is_some() {
            ResultStage::Empty
        } else {
            ResultStage::Pending
        }
    }
}

/// Visible part of the result screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultStage {
    /// Nothing received yet, or between stages
    Pending,
    /// No selection under strict mode
    Empty,
    /// Stage A
    Detection,
    /// Stage B
    Nature,
    /// Stage C
    Impact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecobin_core::reveal::{impact_summary, HAPPY_MESSAGE, SAD_MESSAGE};
    use pretty_assertions::assert_eq;

    fn activated(screen: ScreenId) -> ControllerMessage {
        ControllerMessage::ScreenActivated { screen }
    }

    #[test]
    fn test_fade_interpolates() {
        let mut fade = Fade::solid();
        fade.animate_to(0.0, 500);
        fade.update(Duration::from_millis(250));
        assert!((fade.opacity() - 0.5).abs() < 0.01);
        fade.update(Duration::from_secs(1));
        assert_eq!(fade.opacity(), 0.0);
        assert!(!fade.is_visible());
    }

    #[test]
    fn test_screen_transition() {
        let mut display = DisplayState::new();
        display.apply_message(activated(ScreenId::Landing));
        display.apply_message(ControllerMessage::ScreenExiting {
            screen: ScreenId::Landing,
        });
        assert!(display.is_leaving());

        display.apply_message(activated(ScreenId::Home));
        assert_eq!(display.active, Some(ScreenId::Home));
        assert_eq!(display.exiting, vec![ScreenId::Landing]);
        assert!(!display.is_leaving());

        display.apply_message(ControllerMessage::ScreenDeactivated {
            screen: ScreenId::Landing,
        });
        assert!(display.exiting.is_empty());
    }

    #[test]
    fn test_nature_choreography() {
        let mut display = DisplayState::new();
        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::NatureShown {
                message: SAD_MESSAGE,
            },
        });
        assert_eq!(display.result_stage(), ResultStage::Nature);

        for cue in [
            RevealCue::SadPlantFadeOut { duration_ms: 500 },
            RevealCue::HappyPlantShown,
            RevealCue::HappyPlantFadeIn {
                duration_ms: 800,
                decorations: vec![
                    DecorationDelay {
                        kind: Decoration::Leaf,
                        index: 0,
                        delay_ms: 0,
                    },
                    DecorationDelay {
                        kind: Decoration::Sparkle,
                        index: 0,
                        delay_ms: 800,
                    },
                ],
            },
            RevealCue::HappyMessageShown {
                message: HAPPY_MESSAGE,
            },
            RevealCue::HappyMessageFadeIn { duration_ms: 500 },
            RevealCue::ContinueShown,
        ] {
            display.apply_message(ControllerMessage::Reveal { cue });
        }

        let nature = display.nature.as_ref().unwrap();
        assert_eq!(nature.shown(Decoration::Leaf), 1);
        assert_eq!(nature.shown(Decoration::Sparkle), 0);
        assert!(!nature.continue_visible());

        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::ContinueFadeIn { duration_ms: 500 },
        });
        display.update(Duration::from_millis(900));

        let nature = display.nature.as_ref().unwrap();
        assert!(!nature.sad_plant.is_visible());
        assert_eq!(nature.happy_plant.unwrap().opacity(), 1.0);
        assert_eq!(nature.shown(Decoration::Sparkle), 1);
        assert!(nature.continue_visible());
    }

    #[test]
    fn test_impact_cards_pop_in() {
        let mut display = DisplayState::new();
        let summary = impact_summary(WasteTypeId::Battery);
        let cards = summary.cards.len();
        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::ImpactShown(summary),
        });
        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::CardPopIn { index: 1 },
        });
        // Out of range indices are ignored
        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::CardPopIn { index: 99 },
        });

        let impact = display.impact.as_ref().unwrap();
        assert_eq!(impact.cards_shown.len(), cards);
        assert!(!impact.cards_shown[0]);
        assert!(impact.cards_shown[1]);
        assert_eq!(display.result_stage(), ResultStage::Impact);
    }

    #[test]
    fn test_new_detection_clears_old_reveal() {
        let mut display = DisplayState::new();
        display.apply_message(ControllerMessage::Reveal {
            cue: RevealCue::ImpactShown(impact_summary(WasteTypeId::Phone)),
        });
        display.apply_message(ControllerMessage::EmptyResult {
            reason: "Nothing selected".into(),
        });
        assert!(display.impact.is_none());
        assert_eq!(display.result_stage(), ResultStage::Empty);
    }

    #[test]
    fn test_notification_expires() {
        let mut display = DisplayState::new();
        display.apply_message(ControllerMessage::notify(NotifyLevel::Error, "Oops"));
        display.update(Duration::from_secs(2));
        assert!(display.notification.is_some());
        display.update(Duration::from_secs(1));
        assert!(display.notification.is_none());
    }

    #[test]
    fn test_home_activation_clears_highlight() {
        let mut display = DisplayState::new();
        display.apply_message(ControllerMessage::SelectionFeedback {
            waste: WasteTypeId::Laptop,
        });
        assert_eq!(display.selection, Some(WasteTypeId::Laptop));
        display.apply_message(activated(ScreenId::Home));
        assert_eq!(display.selection, None);
    }
}
