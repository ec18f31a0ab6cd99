//! Reveal Sequencer
//!
//! The result screen tells its story in three stages, each reachable only
//! from the one before it:
//!
//! ```text
//! DetectionResult ──(user)──▶ NatureReaction ──(user, after "continue")──▶ ImpactSummary
//! ```
//!
//! Stage A fills in the detection card from the catalog. Stage B plays a
//! fixed sad → happy choreography; Stage C pops in three impact cards. Both
//! timed stages are returned as `(offset, cue)` lists where every offset is
//! measured from the moment the user triggered the stage. The caller owns
//! the timers and may cancel them wholesale.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{WasteCatalog, WasteTypeId};

// ============================================================================
// Choreography constants
// ============================================================================

/// Previous stage hides, next stage appears this much later
pub const STAGE_SWAP: Duration = Duration::from_millis(300);
/// How long the sad plant is shown before transforming
pub const SAD_HOLD: Duration = Duration::from_millis(2000);
/// Sad plant fade-out
pub const SAD_FADE: Duration = Duration::from_millis(500);
/// Happy plant fade-in
pub const HAPPY_FADE: Duration = Duration::from_millis(800);
/// Sad message fade-out
pub const SAD_MESSAGE_FADE: Duration = Duration::from_millis(300);
/// Happy message fade-in
pub const HAPPY_MESSAGE_FADE: Duration = Duration::from_millis(500);
/// Continue control fade-in
pub const CONTINUE_FADE: Duration = Duration::from_millis(500);
/// Gap between showing an element and starting its fade-in
const FADE_KICK: Duration = Duration::from_millis(50);
/// Happy message settles before the continue control appears
const CONTINUE_DELAY: Duration = Duration::from_millis(800);
/// Happy plant shown before the message swap begins
const MESSAGE_SWAP_DELAY: Duration = Duration::from_millis(500);

/// Impact cards start popping in this long after the impact stage appears
const CARDS_DELAY: Duration = Duration::from_millis(200);
/// Per-card pop-in stagger
pub const CARD_STAGGER: Duration = Duration::from_millis(150);

const LEAF_STAGGER_MS: u64 = 100;
const FLOWER_BASE_MS: u64 = 400;
const FLOWER_STAGGER_MS: u64 = 50;
const SPARKLE_BASE_MS: u64 = 800;
const SPARKLE_STAGGER_MS: u64 = 200;

/// Message shown next to the sad plant
pub const SAD_MESSAGE: &str = "E-waste in landfills leaks toxins into soil and water. Nature is hurting... 😢";
/// Message shown once the plant has recovered
pub const HAPPY_MESSAGE: &str = "You did it! Recycling this item helps nature bloom again! 🌸";

// ============================================================================
// Types
// ============================================================================

/// Stage of the result narrative
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStage {
    /// Stage A: what was detected
    DetectionResult,
    /// Stage B: sad → happy plant
    NatureReaction,
    /// Stage C: points, CO₂ and energy
    ImpactSummary,
}

/// Errors from driving the reveal out of order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// Result screen reached with no waste type selected (strict mode)
    #[error("no waste type was selected before reaching the result screen")]
    NoSelection,

    /// A stage was requested from the wrong predecessor
    #[error("cannot enter {requested:?} from {current:?}")]
    OutOfOrder {
        /// Stage requested
        requested: RevealStage,
        /// Stage currently shown
        current: Option<RevealStage>,
    },

    /// Impact requested before the continue control was revealed
    #[error("nature reaction is still playing")]
    ContinueNotReady,
}

/// Stage A payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectionSummary {
    /// Resolved waste type
    pub waste: WasteTypeId,
    /// Item name
    pub name: &'static str,
    /// Monetary value
    pub value: &'static str,
    /// Detection confidence
    pub confidence: &'static str,
    /// Confidence explanation
    pub explanation: &'static str,
}

/// One card of the impact summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImpactCard {
    /// Card caption
    pub label: &'static str,
    /// Card value
    pub value: String,
}

/// Stage C payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImpactSummary {
    /// Resolved waste type
    pub waste: WasteTypeId,
    /// Eco points, CO₂ saved, energy days
    pub cards: Vec<ImpactCard>,
    /// Closing sentence
    pub final_message: String,
}

/// Decorative element of the happy plant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    /// Growing leaf
    Leaf,
    /// Blooming flower
    Flower,
    /// Looping sparkle
    Sparkle,
}

/// Animation delay of one decoration, relative to the happy fade-in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationDelay {
    /// Which kind of decoration
    pub kind: Decoration,
    /// Index among decorations of the same kind
    pub index: usize,
    /// Delay before it starts animating
    pub delay_ms: u64,
}

/// How many decorations of each kind the happy plant carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationCounts {
    /// Leaves
    pub leaves: usize,
    /// Flowers
    pub flowers: usize,
    /// Sparkles
    pub sparkles: usize,
}

impl Default for DecorationCounts {
    fn default() -> Self {
        Self {
            leaves: 4,
            flowers: 3,
            sparkles: 3,
        }
    }
}

impl DecorationCounts {
    /// Staggered delays: leaves, then flowers, then sparkles
    #[must_use]
    pub fn delays(&self) -> Vec<DecorationDelay> {
        let leaves = (0..self.leaves).map(|i| DecorationDelay {
            kind: Decoration::Leaf,
            index: i,
            delay_ms: i as u64 * LEAF_STAGGER_MS,
        });
        let flowers = (0..self.flowers).map(|i| DecorationDelay {
            kind: Decoration::Flower,
            index: i,
            delay_ms: FLOWER_BASE_MS + i as u64 * FLOWER_STAGGER_MS,
        });
        let sparkles = (0..self.sparkles).map(|i| DecorationDelay {
            kind: Decoration::Sparkle,
            index: i,
            delay_ms: SPARKLE_BASE_MS + i as u64 * SPARKLE_STAGGER_MS,
        });
        leaves.chain(flowers).chain(sparkles).collect()
    }
}

/// Timed visual step of the reveal
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum RevealCue {
    /// Stage A card hides
    DetectionHidden,
    /// Stage B appears with the sad plant and sad message
    NatureShown {
        /// Text next to the sad plant
        message: &'static str,
    },
    /// Sad plant starts fading out
    SadPlantFadeOut {
        /// Fade duration in milliseconds
        duration_ms: u64,
    },
    /// Happy plant mounted (still transparent)
    HappyPlantShown,
    /// Happy plant fades in and its decorations start
    HappyPlantFadeIn {
        /// Fade duration in milliseconds
        duration_ms: u64,
        /// Per-decoration animation delays
        decorations: Vec<DecorationDelay>,
    },
    /// Sad message starts fading out
    SadMessageFadeOut {
        /// Fade duration in milliseconds
        duration_ms: u64,
    },
    /// Happy message mounted (still transparent)
    HappyMessageShown {
        /// Text next to the happy plant
        message: &'static str,
    },
    /// Happy message fades in
    HappyMessageFadeIn {
        /// Fade duration in milliseconds
        duration_ms: u64,
    },
    /// Continue control mounted (still transparent)
    ContinueShown,
    /// Continue control fades in
    ContinueFadeIn {
        /// Fade duration in milliseconds
        duration_ms: u64,
    },
    /// Stage B hides
    NatureHidden,
    /// Stage C appears, populated
    ImpactShown(ImpactSummary),
    /// Impact card pops in
    CardPopIn {
        /// Card index (0 = eco points)
        index: usize,
    },
}

// ============================================================================
// Sequencer
// ============================================================================

/// Reveal configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealConfig {
    /// Refuse to reveal without a selection instead of defaulting to phone
    pub strict_selection: bool,
    /// Happy plant decorations
    pub decorations: DecorationCounts,
}

/// Three-stage result narrative
#[derive(Clone, Debug, Default)]
pub struct RevealSequencer {
    config: RevealConfig,
    stage: Option<RevealStage>,
    waste: Option<WasteTypeId>,
    continue_ready: bool,
}

impl RevealSequencer {
    /// Create a sequencer with the given configuration
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Stage currently shown
    #[must_use]
    pub fn stage(&self) -> Option<RevealStage> {
        self.stage
    }

    /// Waste type the reveal was resolved against
    #[must_use]
    pub fn waste(&self) -> Option<WasteTypeId> {
        self.waste
    }

    /// Whether the continue control has been revealed
    #[must_use]
    pub fn continue_ready(&self) -> bool {
        self.continue_ready
    }

    /// Forget any in-progress reveal
    pub fn reset(&mut self) {
        self.stage = None;
        self.waste = None;
        self.continue_ready = false;
    }

    /// Stage A: resolve the selection and populate the detection card
    pub fn begin(&mut self, selected: Option<WasteTypeId>) -> Result<DetectionSummary, RevealError> {
        self.reset();
        let waste = match selected {
            Some(waste) => waste,
            None if self.config.strict_selection => return Err(RevealError::NoSelection),
            None => {
                tracing::warn!("Result screen reached without a selection, showing phone");
                WasteTypeId::Phone
            }
        };

        let record = WasteCatalog::lookup(waste);
        self.stage = Some(RevealStage::DetectionResult);
        self.waste = Some(waste);

        Ok(DetectionSummary {
            waste,
            name: record.name,
            value: record.monetary_value,
            confidence: record.confidence,
            explanation: record.explanation,
        })
    }

    /// Stage B: the sad → happy choreography
    pub fn nature_reaction(&mut self) -> Result<Vec<(Duration, RevealCue)>, RevealError> {
        self.advance(RevealStage::DetectionResult, RevealStage::NatureReaction)?;
        self.continue_ready = false;

        let shown = STAGE_SWAP;
        let transform = shown + SAD_HOLD;
        let happy_shown = transform + SAD_FADE;
        let happy_fade = happy_shown + FADE_KICK;
        let message_swap = happy_shown + MESSAGE_SWAP_DELAY;
        let happy_message = message_swap + SAD_MESSAGE_FADE;
        let happy_message_fade = happy_message + FADE_KICK;
        let continue_shown = happy_message_fade + CONTINUE_DELAY;
        let continue_fade = continue_shown + FADE_KICK;

        Ok(vec![
            (Duration::ZERO, RevealCue::DetectionHidden),
            (shown, RevealCue::NatureShown { message: SAD_MESSAGE }),
            (
                transform,
                RevealCue::SadPlantFadeOut {
                    duration_ms: millis(SAD_FADE),
                },
            ),
            (happy_shown, RevealCue::HappyPlantShown),
            (
                happy_fade,
                RevealCue::HappyPlantFadeIn {
                    duration_ms: millis(HAPPY_FADE),
                    decorations: self.config.decorations.delays(),
                },
            ),
            (
                message_swap,
                RevealCue::SadMessageFadeOut {
                    duration_ms: millis(SAD_MESSAGE_FADE),
                },
            ),
            (
                happy_message,
                RevealCue::HappyMessageShown {
                    message: HAPPY_MESSAGE,
                },
            ),
            (
                happy_message_fade,
                RevealCue::HappyMessageFadeIn {
                    duration_ms: millis(HAPPY_MESSAGE_FADE),
                },
            ),
            (continue_shown, RevealCue::ContinueShown),
            (
                continue_fade,
                RevealCue::ContinueFadeIn {
                    duration_ms: millis(CONTINUE_FADE),
                },
            ),
        ])
    }

    /// Stage C: impact cards and closing sentence
    pub fn impact(&mut self) -> Result<Vec<(Duration, RevealCue)>, RevealError> {
        if self.stage == Some(RevealStage::NatureReaction) && !self.continue_ready {
            return Err(RevealError::ContinueNotReady);
        }
        self.advance(RevealStage::NatureReaction, RevealStage::ImpactSummary)?;

        let summary = impact_summary(self.waste.unwrap_or(WasteTypeId::Phone));
        let card_count = summary.cards.len();
        let cards_start = STAGE_SWAP + CARDS_DELAY;

        let mut cues = vec![
            (Duration::ZERO, RevealCue::NatureHidden),
            (STAGE_SWAP, RevealCue::ImpactShown(summary)),
        ];
        for index in 0..card_count {
            let offset = cards_start + CARD_STAGGER * index as u32;
            cues.push((offset, RevealCue::CardPopIn { index }));
        }
        Ok(cues)
    }

    /// Record that a cue has been shown
    pub fn apply(&mut self, cue: &RevealCue) {
        if matches!(cue, RevealCue::ContinueShown) {
            self.continue_ready = true;
        }
    }

    fn advance(&mut self, from: RevealStage, to: RevealStage) -> Result<(), RevealError> {
        if self.stage != Some(from) {
            return Err(RevealError::OutOfOrder {
                requested: to,
                current: self.stage,
            });
        }
        self.stage = Some(to);
        Ok(())
    }
}

/// Build the Stage C payload for a waste type
#[must_use]
pub fn impact_summary(waste: WasteTypeId) -> ImpactSummary {
    let record = WasteCatalog::lookup(waste);
    ImpactSummary {
        waste,
        cards: vec![
            ImpactCard {
                label: "Eco Points",
                value: format!("+{}", record.eco_points),
            },
            ImpactCard {
                label: "CO₂ Saved",
                value: record.co2_saved.to_string(),
            },
            ImpactCard {
                label: "Energy Days",
                value: record.energy_days.to_string(),
            },
        ],
        final_message: format!(
            "You saved enough energy to charge a phone for {} days! 🔋",
            record.energy_days
        ),
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn offsets(cues: &[(Duration, RevealCue)]) -> Vec<u64> {
        cues.iter().map(|(d, _)| millis(*d)).collect()
    }

    fn ready_for_impact(waste: WasteTypeId) -> RevealSequencer {
        let mut reveal = RevealSequencer::default();
        reveal.begin(Some(waste)).unwrap();
        for (_, cue) in reveal.nature_reaction().unwrap() {
            reveal.apply(&cue);
        }
        reveal
    }

    #[test]
    fn test_stage_a_matches_catalog() {
        for waste in WasteTypeId::ALL {
            let mut reveal = RevealSequencer::default();
            let summary = reveal.begin(Some(waste)).unwrap();
            let record = waste.record();
            assert_eq!(summary.name, record.name);
            assert_eq!(summary.value, record.monetary_value);
            assert_eq!(summary.confidence, record.confidence);
            assert_eq!(summary.explanation, record.explanation);
        }
    }

    #[test]
    fn test_missing_selection_defaults_to_phone() {
        let mut reveal = RevealSequencer::default();
        let summary = reveal.begin(None).unwrap();
        assert_eq!(summary.waste, WasteTypeId::Phone);
        assert_eq!(summary.name, "Smartphone");
    }

    #[test]
    fn test_strict_mode_refuses_missing_selection() {
        let mut reveal = RevealSequencer::new(RevealConfig {
            strict_selection: true,
            ..RevealConfig::default()
        });
        assert_eq!(reveal.begin(None), Err(RevealError::NoSelection));
        assert_eq!(reveal.stage(), None);
        assert!(reveal.nature_reaction().is_err());
    }

    #[test]
    fn test_nature_choreography_offsets() {
        let mut reveal = RevealSequencer::default();
        reveal.begin(Some(WasteTypeId::Battery)).unwrap();
        let cues = reveal.nature_reaction().unwrap();

        assert_eq!(
            offsets(&cues),
            vec![0, 300, 2300, 2800, 2850, 3300, 3600, 3650, 4450, 4500]
        );
        assert_eq!(cues.last().map(|(_, c)| c.clone()), Some(RevealCue::ContinueFadeIn { duration_ms: 500 }));
    }

    #[test]
    fn test_offsets_never_decrease() {
        let mut reveal = ready_for_impact(WasteTypeId::Laptop);
        let nature = {
            let mut r = RevealSequencer::default();
            r.begin(Some(WasteTypeId::Laptop)).unwrap();
            r.nature_reaction().unwrap()
        };
        let impact = reveal.impact().unwrap();
        for cues in [nature, impact] {
            let times = offsets(&cues);
            assert!(times.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_decoration_stagger() {
        let delays = DecorationCounts {
            leaves: 2,
            flowers: 2,
            sparkles: 2,
        }
        .delays();
        let ms: Vec<u64> = delays.iter().map(|d| d.delay_ms).collect();
        assert_eq!(ms, vec![0, 100, 400, 450, 800, 1000]);
    }

    #[test]
    fn test_impact_requires_continue() {
        let mut reveal = RevealSequencer::default();
        reveal.begin(Some(WasteTypeId::Phone)).unwrap();
        reveal.nature_reaction().unwrap();
        assert_eq!(reveal.impact(), Err(RevealError::ContinueNotReady));
    }

    #[test]
    fn test_stages_cannot_be_skipped() {
        let mut reveal = RevealSequencer::default();
        reveal.begin(Some(WasteTypeId::Phone)).unwrap();
        assert_eq!(
            reveal.impact(),
            Err(RevealError::OutOfOrder {
                requested: RevealStage::ImpactSummary,
                current: Some(RevealStage::DetectionResult),
            })
        );
    }

    #[test]
    fn test_impact_cards_pop_in_staggered() {
        let mut reveal = ready_for_impact(WasteTypeId::Charger);
        let cues = reveal.impact().unwrap();
        assert_eq!(offsets(&cues), vec![0, 300, 500, 650, 800]);
        assert_eq!(reveal.stage(), Some(RevealStage::ImpactSummary));
    }

    #[test]
    fn test_charger_final_message() {
        let summary = impact_summary(WasteTypeId::Charger);
        assert_eq!(
            summary.final_message,
            "You saved enough energy to charge a phone for 2 days! 🔋"
        );
        assert_eq!(summary.cards[0].value, "+60");
        assert_eq!(summary.cards[1].value, "0.5 kg");
        assert_eq!(summary.cards[2].value, "2");
    }
}
