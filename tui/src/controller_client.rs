//! Controller Client
//!
//! Thin wrapper around the EcoBin controller for TUI integration.
//! The controller is embedded directly (no network); this client gives the
//! app a small interface for sending events and collecting messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any app rules.
//! All orchestration happens in the controller. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the controller
//! 3. Feed it the elapsed frame time
//! 4. Receive ControllerMessages and render them

use std::time::Duration;

use tokio::sync::mpsc;

use ecobin_core::{Controller, ControllerMessage, EcobinConfig, SurfaceEvent};

/// Messages buffered between frames
const CHANNEL_CAPACITY: usize = 512;

/// Client for communicating with the embedded controller
pub struct ControllerClient {
    /// The embedded controller
    controller: Controller,
    /// Receiver for messages from the controller
    rx: mpsc::Receiver<ControllerMessage>,
}

impl ControllerClient {
    /// Create a client around a fresh controller
    pub fn new(config: EcobinConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let controller = Controller::new(config, tx);
        Self { controller, rx }
    }

    /// Wrap an already configured controller
    pub fn from_parts(controller: Controller, rx: mpsc::Receiver<ControllerMessage>) -> Self {
        Self { controller, rx }
    }

    /// Show the initial screen
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Start).await
    }

    /// Send a surface event to the controller
    pub async fn send_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        self.controller.handle_event(event).await
    }

    /// Tell the controller the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::QuitRequested).await
    }

    /// Advance the controller's timers by the elapsed frame time
    pub async fn tick(&mut self, elapsed: Duration) {
        self.controller.tick(elapsed).await;
    }

    /// Receive all pending messages from the controller (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ControllerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Whether the controller is still running
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Read-only access to the controller
    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}
