//! Controller - The Orchestration Core
//!
//! The controller owns every piece of app state (active screen, history,
//! session, sequencers, map, chat) and is the only thing that mutates it.
//! It communicates through:
//! - `SurfaceEvent`: what the user did, received from the surface
//! - `ControllerMessage`: what to show, sent to the surface
//!
//! # Time
//!
//! The controller never sleeps. Every delay goes onto a [`Timeline`] and the
//! surface calls [`Controller::tick`] with elapsed frame time. Tests drive
//! the same code with synthetic deltas.
//!
//! # Screen transitions
//!
//! ```text
//! navigate_to(target)
//!   ├─ push current onto history (unless back, same screen or entry screen)
//!   ├─ reset history if target is landing
//!   ├─ current: cancel owned sequences, ScreenExiting ── 300ms ──▶ ScreenDeactivated
//!   └─ ── 150ms ──▶ ScreenActivated(target), init hook, floating controls, announcement
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::sync::oneshot::error::TryRecvError;

use crate::catalog::WasteTypeId;
use crate::chat::{ChatContext, ChatResponder, ChatTranscript, QUICK_ACTIONS};
use crate::config::EcobinConfig;
use crate::events::SurfaceEvent;
use crate::map::{
    FixedGeolocation, GeoPosition, GeolocationError, GeolocationProvider, LocateReceiver,
    MapPresenter, UnavailableGeolocation, LOCATE_DELAY,
};
use crate::messages::{ControllerMessage, NotifyLevel};
use crate::navigation::{NavigationError, NavigationStack};
use crate::reveal::{RevealCue, RevealError, RevealSequencer, RevealStage};
use crate::scan::{ScanCue, ScanPhase, ScanSequencer, ScanSource};
use crate::screens::{FloatingControls, ScreenId, ScreenSet};
use crate::session::SessionState;
use crate::signup::{
    register, JsonFileStore, KeyValueStore, MemoryStore, SignupError, SignupForm, SignupRecord,
};
use crate::timeline::{SequenceKey, Timeline};

/// Exit transition length before the old screen is hidden
pub const DEACTIVATE_DELAY: Duration = Duration::from_millis(300);

/// Delay before the target screen is shown
pub const ACTIVATE_DELAY: Duration = Duration::from_millis(150);

/// Selection feedback before moving on to the map
pub const SELECTION_DELAY: Duration = Duration::from_millis(200);

/// How long a screen-reader announcement stays up
pub const ANNOUNCEMENT_LIFETIME: Duration = Duration::from_millis(1000);

/// Shown instead of a detection card when nothing was selected
pub const EMPTY_RESULT_REASON: &str =
    "No item was selected. Go back and choose what you're recycling.";

/// Things the timeline fires
#[derive(Clone, Debug, PartialEq)]
pub enum TimerEvent {
    /// Hide a screen whose exit transition finished
    Deactivate(ScreenId),
    /// Show a navigation target
    Activate(ScreenId),
    /// Selection feedback done, continue to the map
    SelectionDone,
    /// Scan progress
    Scan(ScanCue),
    /// Reveal choreography step
    Reveal(RevealCue),
    /// Answer a chat message
    ChatReply(String),
    /// Ask for the user's position
    LocateUser,
    /// Withdraw the announcement
    ClearAnnouncement,
}

/// The orchestration core
pub struct Controller {
    config: EcobinConfig,
    tx: mpsc::Sender<ControllerMessage>,
    screens: ScreenSet,

    active: Option<ScreenId>,
    exiting: Vec<ScreenId>,
    history: NavigationStack,
    session: SessionState,

    scan: ScanSequencer,
    reveal: RevealSequencer,
    map: MapPresenter,
    locate_rx: Option<LocateReceiver>,

    responder: ChatResponder,
    chat_context: ChatContext,
    transcript: ChatTranscript,
    rng: StdRng,

    store: Arc<dyn KeyValueStore>,
    timeline: Timeline<TimerEvent>,
    running: bool,
}

impl Controller {
    /// Create a controller from configuration.
    ///
    /// Geolocation comes from `fixed_position` when configured, otherwise
    /// the platform is treated as having none. Signups go to the configured
    /// store file, or memory.
    pub fn new(config: EcobinConfig, tx: mpsc::Sender<ControllerMessage>) -> Self {
        let provider: Arc<dyn GeolocationProvider> = match config.fixed_position {
            Some(position) => Arc::new(FixedGeolocation::new(position)),
            None => Arc::new(UnavailableGeolocation::unsupported()),
        };
        let store: Arc<dyn KeyValueStore> = match config.storage_path {
            Some(ref path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };

        Self {
            map: MapPresenter::new(provider, config.map),
            reveal: RevealSequencer::new(config.reveal),
            config,
            tx,
            screens: ScreenSet::all(),
            active: None,
            exiting: Vec::new(),
            history: NavigationStack::new(),
            session: SessionState::new(),
            scan: ScanSequencer::new(),
            locate_rx: None,
            responder: ChatResponder::new(),
            chat_context: ChatContext::default(),
            transcript: ChatTranscript::new(),
            rng: StdRng::from_entropy(),
            store,
            timeline: Timeline::new(),
            running: true,
        }
    }

    /// Use a different geolocation provider
    #[must_use]
    pub fn with_geolocation(mut self, provider: Arc<dyn GeolocationProvider>) -> Self {
        self.map = MapPresenter::new(provider, self.config.map);
        self
    }

    /// Use a different signup store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    /// Seed the chat RNG
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Restrict the screens the surface can show
    #[must_use]
    pub fn with_screens(mut self, screens: ScreenSet) -> Self {
        self.screens = screens;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Currently shown screen
    #[must_use]
    pub fn active_screen(&self) -> Option<ScreenId> {
        self.active
    }

    /// Navigation history
    #[must_use]
    pub fn history(&self) -> &NavigationStack {
        &self.history
    }

    /// Selection and scan flags
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Scan phase
    #[must_use]
    pub fn scan_phase(&self) -> ScanPhase {
        self.scan.phase()
    }

    /// Result screen stage
    #[must_use]
    pub fn reveal_stage(&self) -> Option<RevealStage> {
        self.reveal.stage()
    }

    /// Map presenter
    #[must_use]
    pub fn map(&self) -> &MapPresenter {
        &self.map
    }

    /// What the bot remembers
    #[must_use]
    pub fn chat_context(&self) -> ChatContext {
        self.chat_context
    }

    /// Chat panel state
    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Virtual time since start
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// Live timers under `key`
    #[must_use]
    pub fn pending(&self, key: SequenceKey) -> usize {
        self.timeline.pending(key)
    }

    /// Time until the next timer fires
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.timeline.next_due_in()
    }

    /// Whether a geolocation answer is outstanding
    #[must_use]
    pub fn awaiting_location(&self) -> bool {
        self.locate_rx.is_some()
    }

    /// Whether the controller has not been asked to quit
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Effective configuration
    #[must_use]
    pub fn config(&self) -> &EcobinConfig {
        &self.config
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Show the initial screen and the chat quick actions
    pub async fn start(&mut self) -> anyhow::Result<()> {
        tracing::info!(screen = %self.config.initial_screen, "Controller starting");
        self.send(ControllerMessage::ChatQuickActions {
            actions: QUICK_ACTIONS.iter().map(|s| s.to_string()).collect(),
        })
        .await;
        self.send(ControllerMessage::ChatVisibility {
            open: self.transcript.is_open(),
        })
        .await;
        self.navigate_to(self.config.initial_screen, false).await?;
        Ok(())
    }

    /// Stop and tell the surface
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.running = false;
        for key in [
            SequenceKey::Activation,
            SequenceKey::Exit,
            SequenceKey::Selection,
            SequenceKey::Scan,
            SequenceKey::Reveal,
            SequenceKey::Chat,
            SequenceKey::Map,
            SequenceKey::Announcement,
        ] {
            self.timeline.cancel(key);
        }
        self.send(ControllerMessage::Quit).await;
        Ok(())
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::debug!(event = event.name(), "Surface event");
        match event {
            SurfaceEvent::Start => self.start().await?,
            SurfaceEvent::QuitRequested => self.shutdown().await?,

            SurfaceEvent::Navigate { screen } => {
                // Missing screens are logged inside and otherwise ignored
                let _ = self.navigate_to(screen, false).await;
            }
            SurfaceEvent::NavigateById { id } => {
                let _ = self.navigate_to_id(&id).await;
            }
            SurfaceEvent::Back | SurfaceEvent::BackToApp => self.go_back().await,
            SurfaceEvent::GoHome => {
                let _ = self.navigate_to(ScreenId::Home, false).await;
            }

            SurfaceEvent::SelectWaste { waste } => self.select_waste(waste).await,
            SurfaceEvent::CaptureScan => self.start_scan(ScanSource::Capture).await,
            SurfaceEvent::UploadScan { file_name } => {
                self.start_scan(ScanSource::Upload { file_name }).await;
            }
            SurfaceEvent::ShowNatureReaction => self.show_nature_reaction().await,
            SurfaceEvent::ShowImpact => self.show_impact().await,
            SurfaceEvent::ToggleCentersList => {
                let open = self.map.toggle_centers_list();
                self.send(ControllerMessage::CentersList { open }).await;
            }

            SurfaceEvent::ToggleChat => {
                let open = self.transcript.toggle();
                self.send(ControllerMessage::ChatVisibility { open }).await;
            }
            SurfaceEvent::ChatSend { text } => {
                let delay = self.config.chat_reply_delay;
                self.chat_input(&text, delay).await;
            }
            SurfaceEvent::ChatQuick { text } => {
                let delay = self.config.chat_quick_reply_delay;
                self.chat_input(&text, delay).await;
            }

            SurfaceEvent::Signup {
                mobile,
                password,
                confirm_password,
            } => {
                let form = SignupForm {
                    mobile,
                    password,
                    confirm_password,
                };
                self.signup(&form).await;
            }
        }
        Ok(())
    }

    /// Advance virtual time by `delta`, firing everything that came due.
    ///
    /// Also picks up a finished geolocation request.
    pub async fn tick(&mut self, delta: Duration) {
        self.poll_location().await;

        let until = self.timeline.now() + delta;
        while let Some(fired) = self.timeline.pop_due(until) {
            self.on_timer(fired.event).await;
        }
        self.timeline.settle(until);
    }

    /// Wait for an outstanding geolocation request and apply it
    pub async fn wait_for_location(&mut self) {
        if let Some(rx) = self.locate_rx.take() {
            let outcome = rx.await.unwrap_or_else(|_| {
                Err(GeolocationError::Unavailable(
                    "geolocation task ended".to_string(),
                ))
            });
            self.apply_location(outcome).await;
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to a screen by element id (`map` or `map-screen`)
    pub async fn navigate_to_id(&mut self, id: &str) -> Result<(), NavigationError> {
        match id.parse::<ScreenId>() {
            Ok(screen) => self.navigate_to(screen, false).await,
            Err(bad) => {
                tracing::error!(screen = %bad, "Screen not found");
                Err(NavigationError::UnknownScreen(bad))
            }
        }
    }

    /// Transition to `target`.
    ///
    /// Back navigations skip the history push. Fails without touching any
    /// state if the surface does not provide the target.
    pub async fn navigate_to(
        &mut self,
        target: ScreenId,
        is_back: bool,
    ) -> Result<(), NavigationError> {
        if !self.screens.contains(target) {
            tracing::error!(screen = %target, "Screen not found");
            return Err(NavigationError::ScreenUnavailable(target));
        }

        let current = self.active;
        if let Some(current) = current {
            if !is_back && current != target {
                self.history.push(current);
            }
        }
        if target == ScreenId::Landing {
            self.history.reset();
        }

        match current {
            Some(current) if current != target => self.begin_exit(current).await,
            Some(current) => self.cancel_owned(current),
            None => {}
        }

        // A newer navigation replaces a pending activation
        self.timeline.cancel(SequenceKey::Activation);
        self.timeline
            .schedule(SequenceKey::Activation, ACTIVATE_DELAY, TimerEvent::Activate(target));

        tracing::info!(
            from = ?current,
            to = %target,
            back = is_back,
            depth = self.history.len(),
            "Navigating"
        );
        Ok(())
    }

    /// Back button: previous screen, or home when there is none
    pub async fn go_back(&mut self) {
        let result = match self.history.pop() {
            Some(previous) => self.navigate_to(previous, true).await,
            None => self.navigate_to(ScreenId::Home, false).await,
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Back navigation failed");
        }
    }

    fn cancel_owned(&mut self, screen: ScreenId) {
        for key in screen.owned_sequences() {
            let dropped = self.timeline.cancel(*key);
            if dropped > 0 {
                tracing::debug!(screen = %screen, sequence = ?key, dropped, "Cancelled timers");
            }
        }
        if screen == ScreenId::Scanning && self.session.scan_in_progress {
            tracing::debug!("Scan abandoned");
            self.scan.abort(&mut self.session);
        }
        if screen == ScreenId::Result && self.reveal.stage().is_some() {
            tracing::debug!(stage = ?self.reveal.stage(), "Reveal abandoned");
            self.reveal.reset();
        }
    }

    async fn begin_exit(&mut self, screen: ScreenId) {
        self.cancel_owned(screen);
        if !self.exiting.contains(&screen) {
            self.exiting.push(screen);
        }
        self.send(ControllerMessage::ScreenExiting { screen }).await;
        self.timeline
            .schedule(SequenceKey::Exit, DEACTIVATE_DELAY, TimerEvent::Deactivate(screen));
    }

    async fn activate(&mut self, target: ScreenId) {
        self.exiting.retain(|s| *s != target);
        self.active = Some(target);
        self.send(ControllerMessage::ScreenActivated { screen: target })
            .await;

        self.init_screen(target).await;

        let controls = FloatingControls::for_screen(target, self.history.is_empty());
        self.send(ControllerMessage::FloatingControls { controls })
            .await;

        self.send(ControllerMessage::Announce {
            text: format!("Navigated to {}", target.title()),
        })
        .await;
        self.timeline.cancel(SequenceKey::Announcement);
        self.timeline.schedule(
            SequenceKey::Announcement,
            ANNOUNCEMENT_LIFETIME,
            TimerEvent::ClearAnnouncement,
        );
    }

    async fn deactivate(&mut self, screen: ScreenId) {
        let Some(pos) = self.exiting.iter().position(|s| *s == screen) else {
            // Re-activated before its exit finished
            return;
        };
        self.exiting.remove(pos);
        self.send(ControllerMessage::ScreenDeactivated { screen })
            .await;
    }

    /// Per-screen setup run on activation
    async fn init_screen(&mut self, screen: ScreenId) {
        match screen {
            ScreenId::Home => self.session.reset(),
            ScreenId::Map => {
                if self.map.needs_location() && self.timeline.pending(SequenceKey::Map) == 0 {
                    self.timeline
                        .schedule(SequenceKey::Map, LOCATE_DELAY, TimerEvent::LocateUser);
                } else {
                    tracing::debug!("Map already initialised");
                }
            }
            ScreenId::Scanning => {
                self.scan.reset();
                self.send_scan_update().await;
            }
            ScreenId::Result => self.begin_reveal().await,
            ScreenId::Landing | ScreenId::Signup | ScreenId::History => {}
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    async fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Deactivate(screen) => self.deactivate(screen).await,
            TimerEvent::Activate(screen) => self.activate(screen).await,
            TimerEvent::SelectionDone => {
                let _ = self.navigate_to(ScreenId::Map, false).await;
            }
            TimerEvent::Scan(cue) => self.on_scan_cue(cue).await,
            TimerEvent::Reveal(cue) => self.on_reveal_cue(cue).await,
            TimerEvent::ChatReply(text) => self.chat_reply(&text).await,
            TimerEvent::LocateUser => {
                if self.map.needs_location() {
                    tracing::debug!("Requesting user location");
                    self.locate_rx = Some(self.map.locate());
                }
            }
            TimerEvent::ClearAnnouncement => {
                self.send(ControllerMessage::AnnouncementCleared).await;
            }
        }
    }

    // ========================================================================
    // Recycling flow
    // ========================================================================

    async fn select_waste(&mut self, waste: WasteTypeId) {
        self.session.select(waste);
        tracing::info!(waste = %waste, "Waste type selected");
        self.send(ControllerMessage::SelectionFeedback { waste }).await;
        self.timeline.cancel(SequenceKey::Selection);
        self.timeline
            .schedule(SequenceKey::Selection, SELECTION_DELAY, TimerEvent::SelectionDone);
    }

    async fn start_scan(&mut self, source: ScanSource) {
        if self.active != Some(ScreenId::Scanning) {
            tracing::debug!(screen = ?self.active, "Scan requested off the scanning screen");
            return;
        }
        match self.scan.start(&source, &mut self.session) {
            Ok(cues) => {
                tracing::info!(source = ?source, "Scan started");
                self.send_scan_update().await;
                // Each cue is relative to the previous one
                let mut offset = Duration::ZERO;
                for (delay, cue) in cues {
                    offset += delay;
                    self.timeline
                        .schedule(SequenceKey::Scan, offset, TimerEvent::Scan(cue));
                }
            }
            Err(rejection) => {
                tracing::debug!(reason = ?rejection, "Scan request ignored");
            }
        }
    }

    async fn on_scan_cue(&mut self, cue: ScanCue) {
        self.scan.apply(cue, &mut self.session);
        match cue {
            ScanCue::Detected => self.send_scan_update().await,
            ScanCue::Complete => {
                if let Err(e) = self.navigate_to(ScreenId::Result, false).await {
                    tracing::warn!(error = %e, "Scan finished without a result screen");
                    self.send_scan_update().await;
                }
            }
        }
    }

    async fn send_scan_update(&self) {
        let phase = self.scan.phase();
        self.send(ControllerMessage::ScanUpdate {
            phase,
            prompt: phase.prompt().to_string(),
            checkmark: phase.shows_checkmark(),
        })
        .await;
    }

    async fn begin_reveal(&mut self) {
        match self.reveal.begin(self.session.selected_waste) {
            Ok(summary) => {
                self.send(ControllerMessage::DetectionResult { summary })
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Nothing to reveal");
                self.send(ControllerMessage::EmptyResult {
                    reason: EMPTY_RESULT_REASON.to_string(),
                })
                .await;
            }
        }
    }

    async fn show_nature_reaction(&mut self) {
        if self.active != Some(ScreenId::Result) {
            tracing::debug!(screen = ?self.active, "Nature reaction off the result screen");
            return;
        }
        match self.reveal.nature_reaction() {
            Ok(cues) => self.schedule_reveal(cues).await,
            Err(e) => tracing::debug!(error = %e, "Nature reaction ignored"),
        }
    }

    async fn show_impact(&mut self) {
        if self.active != Some(ScreenId::Result) {
            tracing::debug!(screen = ?self.active, "Impact requested off the result screen");
            return;
        }
        match self.reveal.impact() {
            Ok(cues) => self.schedule_reveal(cues).await,
            Err(RevealError::ContinueNotReady) => {
                tracing::debug!("Impact requested before continue was shown");
            }
            Err(e) => tracing::debug!(error = %e, "Impact ignored"),
        }
    }

    /// Offsets are measured from now; zero-offset cues apply immediately
    async fn schedule_reveal(&mut self, cues: Vec<(Duration, RevealCue)>) {
        for (offset, cue) in cues {
            if offset.is_zero() {
                self.on_reveal_cue(cue).await;
            } else {
                self.timeline
                    .schedule(SequenceKey::Reveal, offset, TimerEvent::Reveal(cue));
            }
        }
    }

    async fn on_reveal_cue(&mut self, cue: RevealCue) {
        self.reveal.apply(&cue);
        self.send(ControllerMessage::Reveal { cue }).await;
    }

    // ========================================================================
    // Map
    // ========================================================================

    async fn poll_location(&mut self) {
        let Some(rx) = self.locate_rx.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(GeolocationError::Unavailable(
                "geolocation task ended".to_string(),
            )),
        };
        self.locate_rx = None;
        self.apply_location(outcome).await;
    }

    async fn apply_location(&mut self, outcome: Result<GeoPosition, GeolocationError>) {
        let update = self.map.resolve(outcome);
        tracing::info!(status = ?update.status, center = %update.view.center.label(), "Map ready");
        self.send(ControllerMessage::MapStatus {
            status: update.status,
            text: update.status.text().to_string(),
            position: update.position_label,
        })
        .await;
        self.send(ControllerMessage::MapView { view: update.view })
            .await;
    }

    // ========================================================================
    // Chat
    // ========================================================================

    async fn chat_input(&mut self, text: &str, delay: Duration) {
        let had_quick_actions = self.transcript.quick_actions_visible();
        let Some(message) = self.transcript.push_user(text) else {
            tracing::debug!("Empty chat message ignored");
            return;
        };

        if let Some(last) = self.transcript.messages().last() {
            self.send(ControllerMessage::ChatAppend {
                message: last.clone(),
            })
            .await;
        }
        if had_quick_actions {
            self.send(ControllerMessage::ChatQuickActions {
                actions: Vec::new(),
            })
            .await;
        }
        self.timeline
            .schedule(SequenceKey::Chat, delay, TimerEvent::ChatReply(message));
    }

    async fn chat_reply(&mut self, message: &str) {
        let turn = self
            .responder
            .respond_with_rng(message, &self.chat_context, &mut self.rng);
        self.chat_context = turn.context;
        self.transcript.push_bot(turn.response);
        if let Some(last) = self.transcript.messages().last() {
            self.send(ControllerMessage::ChatAppend {
                message: last.clone(),
            })
            .await;
        }
    }

    // ========================================================================
    // Signup
    // ========================================================================

    async fn signup(&mut self, form: &SignupForm) {
        let record = match register(form, self.store.as_ref(), Utc::now()).await {
            Ok(record) => record,
            Err(SignupError::PasswordMismatch) => {
                tracing::info!("Signup rejected: passwords differ");
                self.notify(NotifyLevel::Error, &SignupError::PasswordMismatch.to_string())
                    .await;
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Signup record not saved");
                self.notify(
                    NotifyLevel::Warning,
                    "Could not save your account on this device",
                )
                .await;
                SignupRecord::new(&form.mobile, Utc::now())
            }
        };

        self.notify(NotifyLevel::Success, &record.welcome()).await;
        let _ = self.navigate_to(ScreenId::Home, false).await;
    }

    // ========================================================================
    // Surface channel
    // ========================================================================

    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ControllerMessage::notify(level, message)).await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: ControllerMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (Controller, mpsc::Receiver<ControllerMessage>) {
        let (tx, rx) = mpsc::channel(1024);
        let controller = Controller::new(EcobinConfig::default(), tx).with_rng_seed(1);
        (controller, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ControllerMessage>) -> Vec<ControllerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_start_activates_initial_screen_after_delay() {
        let (mut c, mut rx) = controller();
        c.start().await.unwrap();
        assert_eq!(c.active_screen(), None);

        c.tick(Duration::from_millis(149)).await;
        assert_eq!(c.active_screen(), None);

        c.tick(Duration::from_millis(1)).await;
        assert_eq!(c.active_screen(), Some(ScreenId::Landing));

        let msgs = drain(&mut rx);
        assert!(msgs.contains(&ControllerMessage::ScreenActivated {
            screen: ScreenId::Landing
        }));
        assert!(msgs.contains(&ControllerMessage::Announce {
            text: "Navigated to Welcome".to_string()
        }));
    }

    #[tokio::test]
    async fn test_exit_then_deactivate() {
        let (mut c, mut rx) = controller();
        c.navigate_to(ScreenId::Home, false).await.unwrap();
        c.tick(ACTIVATE_DELAY).await;
        drain(&mut rx);

        c.navigate_to(ScreenId::History, false).await.unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![ControllerMessage::ScreenExiting {
                screen: ScreenId::Home
            }]
        );

        c.tick(ACTIVATE_DELAY).await;
        assert_eq!(c.active_screen(), Some(ScreenId::History));

        c.tick(DEACTIVATE_DELAY - ACTIVATE_DELAY).await;
        assert!(drain(&mut rx).contains(&ControllerMessage::ScreenDeactivated {
            screen: ScreenId::Home
        }));
    }

    #[tokio::test]
    async fn test_quick_return_keeps_screen_visible() {
        let (mut c, mut rx) = controller();
        c.navigate_to(ScreenId::Home, false).await.unwrap();
        c.tick(ACTIVATE_DELAY).await;

        c.navigate_to(ScreenId::History, false).await.unwrap();
        c.tick(Duration::from_millis(50)).await;
        // History not yet shown, so Home is still current
        c.navigate_to(ScreenId::Home, false).await.unwrap();
        drain(&mut rx);

        c.tick(Duration::from_millis(500)).await;
        let msgs = drain(&mut rx);
        assert_eq!(c.active_screen(), Some(ScreenId::Home));
        assert!(!msgs.contains(&ControllerMessage::ScreenDeactivated {
            screen: ScreenId::Home
        }));
        assert!(!msgs.contains(&ControllerMessage::ScreenActivated {
            screen: ScreenId::History
        }));
    }

    #[tokio::test]
    async fn test_announcement_cleared() {
        let (mut c, mut rx) = controller();
        c.navigate_to(ScreenId::Home, false).await.unwrap();
        c.tick(ACTIVATE_DELAY).await;
        drain(&mut rx);

        c.tick(ANNOUNCEMENT_LIFETIME).await;
        assert_eq!(drain(&mut rx), vec![ControllerMessage::AnnouncementCleared]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_rejected() {
        let (mut c, _rx) = controller();
        let err = c.navigate_to_id("settings").await.unwrap_err();
        assert_eq!(err, NavigationError::UnknownScreen("settings".to_string()));
        assert_eq!(c.pending(SequenceKey::Activation), 0);
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut c, mut rx) = controller();
        c.handle_event(SurfaceEvent::QuitRequested).await.unwrap();
        assert!(!c.is_running());
        assert_eq!(drain(&mut rx), vec![ControllerMessage::Quit]);
    }
}
