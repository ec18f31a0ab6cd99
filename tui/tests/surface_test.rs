//! Surface Tests
//!
//! Drive the TUI app with key presses and virtual frame time against an
//! embedded controller, without a terminal.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use ecobin_core::{
    ChatSender, EcobinConfig, GeoPosition, MapStatus, NotifyLevel, ScanPhase, ScreenId,
    WasteTypeId,
};
use ecobin_tui::display::ResultStage;
use ecobin_tui::{App, ControllerClient};

const FRAME: Duration = Duration::from_millis(50);

fn app() -> App {
    let mut config = EcobinConfig::default();
    config.fixed_position = Some(GeoPosition::new(25.3176, 82.9739));
    App::with_client(ControllerClient::new(config), (100, 32))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Run frames for `total` of virtual time, yielding so spawned work can finish
async fn run_for(app: &mut App, total: Duration) {
    let mut left = total;
    while !left.is_zero() {
        let step = FRAME.min(left);
        app.advance(step).await;
        tokio::task::yield_now().await;
        left -= step;
    }
}

async fn press(app: &mut App, code: KeyCode) {
    app.handle_key(key(code)).await;
}

fn screen_text(app: &mut App) -> String {
    let buf = app.frame_buffer();
    let area = buf.area;
    let mut text = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

async fn started() -> App {
    let mut app = app();
    app.start().await.unwrap();
    run_for(&mut app, Duration::from_millis(300)).await;
    app
}

#[tokio::test]
async fn test_landing_then_home() {
    let mut app = started().await;
    assert_eq!(app.display().active, Some(ScreenId::Landing));
    assert!(screen_text(&mut app).contains("Get started"));

    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(500)).await;

    assert_eq!(app.display().active, Some(ScreenId::Home));
    assert!(app.display().exiting.is_empty());
    assert!(screen_text(&mut app).contains("What are you recycling today?"));
}

#[tokio::test]
async fn test_escape_on_home_stays() {
    let mut app = started().await;
    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(500)).await;

    press(&mut app, KeyCode::Esc).await;
    run_for(&mut app, Duration::from_millis(500)).await;
    assert_eq!(app.display().active, Some(ScreenId::Home));
    assert!(app.is_running());
}

#[tokio::test]
async fn test_full_recycling_flow() {
    let mut app = started().await;
    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(500)).await;

    // Laptop is the third tile
    press(&mut app, KeyCode::Char('3')).await;
    assert_eq!(app.display().selection, Some(WasteTypeId::Laptop));
    run_for(&mut app, Duration::from_secs(2)).await;

    assert_eq!(app.display().active, Some(ScreenId::Map));
    assert_eq!(app.display().map.status, Some(MapStatus::Found));
    assert_eq!(app.display().map.position.as_deref(), Some("25.3176, 82.9739"));

    press(&mut app, KeyCode::Char('l')).await;
    assert!(app.display().map.centers_open);
    assert!(screen_text(&mut app).contains("EcoBin Station #42"));

    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(500)).await;
    assert_eq!(app.display().active, Some(ScreenId::Scanning));
    assert_eq!(app.display().scan.phase, ScanPhase::Idle);

    press(&mut app, KeyCode::Char('c')).await;
    assert_eq!(app.display().scan.phase, ScanPhase::Analyzing);
    run_for(&mut app, Duration::from_secs(4)).await;

    assert_eq!(app.display().active, Some(ScreenId::Result));
    assert_eq!(app.display().result_stage(), ResultStage::Detection);
    assert!(screen_text(&mut app).contains("Laptop Computer"));

    // Continue is not pressable until it has faded in
    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_secs(1)).await;
    assert_eq!(app.display().result_stage(), ResultStage::Nature);
    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(100)).await;
    assert_eq!(app.display().result_stage(), ResultStage::Nature);

    run_for(&mut app, Duration::from_secs(5)).await;
    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_secs(2)).await;

    let impact = app.display().impact.clone().unwrap();
    assert!(impact.cards_shown.iter().all(|shown| *shown));
    assert!(screen_text(&mut app).contains("You saved enough energy"));

    press(&mut app, KeyCode::Enter).await;
    run_for(&mut app, Duration::from_millis(500)).await;
    assert_eq!(app.display().active, Some(ScreenId::Home));
}

#[tokio::test]
async fn test_chat_quick_action() {
    let mut app = started().await;

    press(&mut app, KeyCode::F(2)).await;
    assert!(app.display().chat.open);
    assert_eq!(app.display().chat.quick_actions.len(), 4);

    press(&mut app, KeyCode::Char('1')).await;
    assert!(app.display().chat.quick_actions.is_empty());
    run_for(&mut app, Duration::from_secs(1)).await;

    let messages = &app.display().chat.messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "Can I recycle batteries?");
    assert_eq!(messages[1].sender, ChatSender::Bot);
    assert!(screen_text(&mut app).contains("EcoBot"));

    // Escape closes the panel instead of navigating
    press(&mut app, KeyCode::Esc).await;
    assert!(!app.display().chat.open);
    assert_eq!(app.display().active, Some(ScreenId::Landing));
}

async fn type_line(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
    press(app, KeyCode::Enter).await;
    run_for(app, Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_chat_transcript_scrolls() {
    let mut app = started().await;
    press(&mut app, KeyCode::F(2)).await;

    type_line(&mut app, "hello first").await;
    for _ in 0..4 {
        type_line(&mut app, "Can I recycle batteries?").await;
    }
    assert_eq!(app.display().chat.messages.len(), 10);

    // Long transcripts stay pinned to the newest reply
    assert!(!screen_text(&mut app).contains("You: hello first"));

    for _ in 0..20 {
        press(&mut app, KeyCode::PageUp).await;
    }
    assert!(screen_text(&mut app).contains("You: hello first"));

    // A new message jumps back to the bottom
    type_line(&mut app, "thanks").await;
    assert!(!screen_text(&mut app).contains("You: hello first"));
    assert!(screen_text(&mut app).contains("You: thanks"));
}

#[tokio::test]
async fn test_signup_form() {
    let mut app = started().await;
    press(&mut app, KeyCode::Char('s')).await;
    run_for(&mut app, Duration::from_millis(500)).await;
    assert_eq!(app.display().active, Some(ScreenId::Signup));

    for c in "9876543210".chars() {
        press(&mut app, KeyCode::Char(c)).await;
    }
    press(&mut app, KeyCode::Tab).await;
    for c in "green".chars() {
        press(&mut app, KeyCode::Char(c)).await;
    }
    press(&mut app, KeyCode::Tab).await;
    for c in "green".chars() {
        press(&mut app, KeyCode::Char(c)).await;
    }
    press(&mut app, KeyCode::Enter).await;

    let notification = app.display().notification.clone().unwrap();
    assert_eq!(notification.level, NotifyLevel::Success);
    assert!(notification.message.contains("+919876543210"));

    run_for(&mut app, Duration::from_millis(500)).await;
    assert_eq!(app.display().active, Some(ScreenId::Home));
}

#[tokio::test]
async fn test_ctrl_c_quits() {
    let mut app = started().await;
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .await;
    assert!(!app.is_running());
    assert!(app.display().quit);
}
