//! EcoBin TUI - Terminal interface for the EcoBin recycling app
//!
//! A full-screen terminal surface for the headless EcoBin controller. It
//! turns key presses into surface events and renders whatever the
//! controller sends back; every app rule lives in `ecobin-core`.
//!
//! # Architecture
//!
//! - **App**: event loop, frame timing, layer layout
//! - **Controller client**: embedded controller plus its message channel
//! - **Display**: state derived from controller messages, plus fades
//! - **Input**: key presses to surface events
//! - **Compositor**: layered rendering with z-ordering
//! - **Screens**: one renderer per screen

pub mod app;
pub mod compositor;
pub mod controller_client;
pub mod display;
pub mod input;
pub mod screens;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use controller_client::ControllerClient;
pub use display::DisplayState;
