//! Scan Sequencer
//!
//! Scripted stand-in for item detection. A scan moves
//! `Idle → Analyzing → Detected` on fixed delays and then hands control to
//! the result screen. Only one scan may be in flight at a time; the guard
//! lives in [`SessionState::scan_in_progress`].
//!
//! Uploaded files are never inspected: both entry points start the same
//! scripted sequence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Delay between "Analyzing…" and "Item detected!"
pub const ANALYZE_DELAY: Duration = Duration::from_millis(2500);

/// Delay between "Item detected!" and the result screen
pub const RESULT_DELAY: Duration = Duration::from_millis(1000);

/// Prompt shown when the scan screen opens
pub const IDLE_PROMPT: &str = "Position your item in the frame";

/// Prompt shown while the scripted detection runs
pub const ANALYZING_PROMPT: &str = "Analyzing your item...";

/// Prompt shown once the item is "detected"
pub const DETECTED_PROMPT: &str = "Item detected!";

/// Where a scan was started from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    /// Simulated camera capture
    Capture,
    /// File picker selection
    Upload {
        /// Name of the chosen file, if any was chosen
        file_name: Option<String>,
    },
}

/// Scan progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    /// Waiting for the user to capture or upload
    #[default]
    Idle,
    /// Scripted detection running
    Analyzing,
    /// Item "recognised", result screen imminent
    Detected,
}

impl ScanPhase {
    /// Prompt text for this phase
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Idle => IDLE_PROMPT,
            Self::Analyzing => ANALYZING_PROMPT,
            Self::Detected => DETECTED_PROMPT,
        }
    }

    /// Whether the checkmark affordance is shown
    #[must_use]
    pub fn shows_checkmark(self) -> bool {
        self == Self::Detected
    }
}

/// Timed step of a running scan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanCue {
    /// Switch to the detected state
    Detected,
    /// Leave for the result screen and release the guard
    Complete,
}

/// Why a scan request did not start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanRejection {
    /// A scan is already running
    InProgress,
    /// The upload dialog closed without a file
    NoFile,
}

/// Single-flight scripted scan state machine
#[derive(Clone, Debug, Default)]
pub struct ScanSequencer {
    phase: ScanPhase,
}

impl ScanSequencer {
    /// Create an idle sequencer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Return to the initial "position item" prompt
    pub fn reset(&mut self) {
        self.phase = ScanPhase::Idle;
    }

    /// Start a scan.
    ///
    /// On success the guard is raised, the phase becomes `Analyzing` and the
    /// cues to schedule are returned as delays relative to now (each one
    /// relative to the previous cue).
    pub fn start(
        &mut self,
        source: &ScanSource,
        session: &mut SessionState,
    ) -> Result<[(Duration, ScanCue); 2], ScanRejection> {
        if matches!(source, ScanSource::Upload { file_name: None }) {
            return Err(ScanRejection::NoFile);
        }
        if session.scan_in_progress {
            return Err(ScanRejection::InProgress);
        }
        session.scan_in_progress = true;
        self.phase = ScanPhase::Analyzing;
        Ok([
            (ANALYZE_DELAY, ScanCue::Detected),
            (RESULT_DELAY, ScanCue::Complete),
        ])
    }

    /// Apply a fired cue. Returns the phase to display.
    pub fn apply(&mut self, cue: ScanCue, session: &mut SessionState) -> ScanPhase {
        match cue {
            ScanCue::Detected => {
                self.phase = ScanPhase::Detected;
            }
            ScanCue::Complete => {
                session.scan_in_progress = false;
                self.phase = ScanPhase::Idle;
            }
        }
        self.phase
    }

    /// Abort a running scan (its screen is going away)
    pub fn abort(&mut self, session: &mut SessionState) {
        session.scan_in_progress = false;
        self.phase = ScanPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_raises_guard() {
        let mut scan = ScanSequencer::new();
        let mut session = SessionState::new();
        let cues = scan.start(&ScanSource::Capture, &mut session).unwrap();

        assert!(session.scan_in_progress);
        assert_eq!(scan.phase(), ScanPhase::Analyzing);
        assert_eq!(cues[0], (ANALYZE_DELAY, ScanCue::Detected));
        assert_eq!(cues[1], (RESULT_DELAY, ScanCue::Complete));
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut scan = ScanSequencer::new();
        let mut session = SessionState::new();
        scan.start(&ScanSource::Capture, &mut session).unwrap();
        let upload = ScanSource::Upload {
            file_name: Some("phone.jpg".into()),
        };
        assert_eq!(
            scan.start(&upload, &mut session),
            Err(ScanRejection::InProgress)
        );
    }

    #[test]
    fn test_upload_without_file_is_ignored() {
        let mut scan = ScanSequencer::new();
        let mut session = SessionState::new();
        let upload = ScanSource::Upload { file_name: None };
        assert_eq!(scan.start(&upload, &mut session), Err(ScanRejection::NoFile));
        assert!(!session.scan_in_progress);
    }

    #[test]
    fn test_cues_progress_monotonically() {
        let mut scan = ScanSequencer::new();
        let mut session = SessionState::new();
        scan.start(&ScanSource::Capture, &mut session).unwrap();

        assert_eq!(scan.apply(ScanCue::Detected, &mut session), ScanPhase::Detected);
        assert!(ScanPhase::Detected.shows_checkmark());
        assert!(session.scan_in_progress);

        assert_eq!(scan.apply(ScanCue::Complete, &mut session), ScanPhase::Idle);
        assert!(!session.scan_in_progress);
    }

    #[test]
    fn test_prompts() {
        assert_eq!(ScanPhase::Idle.prompt(), "Position your item in the frame");
        assert_eq!(ScanPhase::Analyzing.prompt(), "Analyzing your item...");
        assert_eq!(ScanPhase::Detected.prompt(), "Item detected!");
    }
}
