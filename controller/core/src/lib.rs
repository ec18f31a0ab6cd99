//! EcoBin Core - Headless Orchestration for the EcoBin recycling app
//!
//! This crate holds every rule of the app: which screen is shown, how the
//! history stack behaves, the scripted scan, the three-stage result reveal,
//! the recycling-center map and the keyword chatbot. It knows nothing about
//! terminals or widgets; a surface feeds it events and renders its messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Surfaces                                │
//! │  ┌──────────────┐   ┌────────────────────┐   ┌───────────────┐  │
//! │  │     TUI      │   │  Headless driver   │   │     Tests     │  │
//! │  │  (ratatui)   │   │   (ecobin-cli)     │   │               │  │
//! │  └──────┬───────┘   └─────────┬──────────┘   └───────┬───────┘  │
//! │         └─────────────────────┼──────────────────────┘          │
//! │                    SurfaceEvent (up)                             │
//! │                 ControllerMessage (down)                         │
//! └───────────────────────────────┼──────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼──────────────────────────────────┐
//! │                          ECOBIN CORE                             │
//! │  ┌────────────────────────────┴───────────────────────────────┐  │
//! │  │                        Controller                           │  │
//! │  │  ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌─────────────┐  │  │
//! │  │  │ Navigation │ │   Scan   │ │  Reveal  │ │ Map / Chat  │  │  │
//! │  │  │  + Screens │ │Sequencer │ │Sequencer │ │ / Signup    │  │  │
//! │  │  └────────────┘ └──────────┘ └──────────┘ └─────────────┘  │  │
//! │  │                   Timeline (virtual time)                   │  │
//! │  └─────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Controller`]: owns all state and is the only thing that mutates it
//! - [`SurfaceEvent`]: what the user did
//! - [`ControllerMessage`]: what the surface should show
//! - [`Timeline`]: cancellable timers on virtual time
//! - [`WasteCatalog`]: the fixed e-waste catalog
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use ecobin_core::{Controller, EcobinConfig, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut controller = Controller::new(EcobinConfig::default(), tx);
//!
//!     controller.handle_event(SurfaceEvent::Start).await.unwrap();
//!
//!     loop {
//!         // Render whatever the controller asked for
//!         while let Ok(msg) = rx.try_recv() {
//!             // apply msg to display state
//!         }
//!
//!         // Advance timers by the elapsed frame time
//!         controller.tick(Duration::from_millis(16)).await;
//!
//!         // Handle user input, send as SurfaceEvent
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`catalog`]: waste types and their valuation records
//! - [`chat`]: keyword/rule chatbot and the chat transcript
//! - [`config`]: TOML + environment configuration
//! - [`controller`]: the orchestration core
//! - [`events`]: events from surfaces
//! - [`map`]: geolocation and the recycling-center map
//! - [`messages`]: messages to surfaces
//! - [`navigation`]: back-navigation history
//! - [`reveal`]: detection, nature reaction and impact stages
//! - [`scan`]: scripted scan state machine
//! - [`screens`]: screen identifiers and floating controls
//! - [`session`]: selection and scan flags
//! - [`signup`]: mock signup and key-value storage
//! - [`timeline`]: virtual-time timer queue
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod chat;
pub mod config;
pub mod controller;
pub mod events;
pub mod map;
pub mod messages;
pub mod navigation;
pub mod reveal;
pub mod scan;
pub mod screens;
pub mod session;
pub mod signup;
pub mod timeline;

// Re-exports for convenience
pub use catalog::{UnknownWasteType, WasteCatalog, WasteRecord, WasteTypeId};
pub use chat::{
    ChatContext, ChatMessage, ChatResponder, ChatSender, ChatTranscript, ChatTurn, MatchSource,
    Topic, QUICK_ACTIONS,
};
pub use controller::{Controller, TimerEvent};
pub use events::SurfaceEvent;
pub use map::{
    FixedGeolocation, GeoPosition, GeolocationError, GeolocationProvider, MapPresenter,
    MapStatus, MapView, UnavailableGeolocation,
};
pub use messages::{ControllerMessage, NotifyLevel};
pub use navigation::{NavigationError, NavigationStack};
pub use reveal::{DetectionSummary, ImpactSummary, RevealCue, RevealError, RevealStage};
pub use scan::{ScanCue, ScanPhase, ScanSource};
pub use screens::{FloatingControls, ScreenId, ScreenSet};
pub use session::SessionState;
pub use signup::{
    JsonFileStore, KeyValueStore, MemoryStore, SignupError, SignupForm, SignupRecord, StoreError,
};
pub use timeline::{SequenceKey, Timeline};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, EcobinConfig, EcobinToml,
};
