//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ControllerClient for orchestration
//! - DisplayState for rendering
//!
//! Every frame the App:
//! 1. Converts terminal events to SurfaceEvents via [`InputState`]
//! 2. Feeds the controller the elapsed frame time
//! 3. Applies ControllerMessages to DisplayState
//! 4. Renders the layers from DisplayState

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};
use ratatui::Terminal;
use tracing::{debug, warn};

use ecobin_core::{ChatSender, EcobinConfig, NotifyLevel};

use crate::compositor::{Compositor, LayerId};
use crate::controller_client::ControllerClient;
use crate::display::DisplayState;
use crate::input::{InputState, KeyAction};
use crate::screens::{self, RenderContext};
use crate::theme::{
    BOT_TEXT, DIM_GRAY, ECO_GREEN, ECO_GREEN_DARK, ECO_TEAL, ERROR_RED, INFO_BLUE, PANEL_BG,
    POINTS_GOLD, SUCCESS_GREEN, USER_TEXT, WARNING_AMBER,
};
use crate::widgets::{truncate, wrap_lines, TextBlockState};

/// Frame interval (~60 FPS)
const FRAME: Duration = Duration::from_millis(16);

/// Widest the chat panel gets
const CHAT_WIDTH: u16 = 46;

/// Below this width the chat panel covers the whole screen
const NARROW_WIDTH: u16 = 80;

/// Toast size
const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

/// Floating home button label
const HOME_BUTTON: &str = " [h] ⌂ Home ";

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Controller Integration ===
    /// Client for the embedded controller
    client: ControllerClient,
    /// Display state derived from ControllerMessages
    display: DisplayState,
    /// What the user is typing
    input: InputState,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,

    // === Misc State ===
    /// Last frame time (for timers and animations)
    last_frame: Instant,
    /// Frames rendered so far
    frame: u64,
}

/// Layer IDs for UI regions
struct AppLayers {
    screen: LayerId,
    status: LayerId,
    chat: LayerId,
    controls: LayerId,
    toast: LayerId,
}

/// Where each layer goes for a terminal size
struct LayerBounds {
    screen: Rect,
    status: Rect,
    chat: Rect,
    controls: Rect,
    toast: Rect,
}

impl LayerBounds {
    fn for_size(width: u16, height: u16) -> Self {
        let body_h = height.saturating_sub(1);
        let chat_w = if width < NARROW_WIDTH {
            width
        } else {
            CHAT_WIDTH
        };
        let controls_w = HOME_BUTTON.chars().count() as u16;
        let toast_w = TOAST_WIDTH.min(width);
        Self {
            screen: Rect::new(0, 0, width, body_h),
            status: Rect::new(0, body_h, width, height.min(1)),
            chat: Rect::new(width.saturating_sub(chat_w), 0, chat_w, body_h),
            controls: Rect::new(
                width.saturating_sub(controls_w + 2),
                body_h.saturating_sub(1),
                controls_w.min(width),
                body_h.min(1),
            ),
            toast: Rect::new(
                width.saturating_sub(toast_w + 1),
                body_h.min(1),
                toast_w,
                TOAST_HEIGHT.min(body_h),
            ),
        }
    }
}

impl App {
    /// Create a new App instance sized to the terminal
    pub fn new(config: EcobinConfig) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        Ok(Self::with_client(ControllerClient::new(config), size))
    }

    /// Create an App around an existing client
    pub fn with_client(client: ControllerClient, size: (u16, u16)) -> Self {
        let area = Rect::new(0, 0, size.0, size.1);
        let bounds = LayerBounds::for_size(size.0, size.1);

        let mut compositor = Compositor::new(area);
        let layers = AppLayers {
            screen: compositor.create_layer(bounds.screen, 0),
            status: compositor.create_layer(bounds.status, 10),
            chat: compositor.create_opaque_layer(bounds.chat, 30),
            controls: compositor.create_opaque_layer(bounds.controls, 40),
            toast: compositor.create_opaque_layer(bounds.toast, 50),
        };

        Self {
            running: true,
            client,
            display: DisplayState::new(),
            input: InputState::new(),
            compositor,
            layers,
            last_frame: Instant::now(),
            frame: 0,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.start().await?;
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events first
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await;
                        }
                        Some(Ok(Event::Resize(w, h))) => self.handle_resize(w, h),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(FRAME) => {}
            }

            self.update().await;
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Show the initial screen
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.client.start().await?;
        self.process_messages();
        Ok(())
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match self.input.handle_key(key, &self.display) {
            KeyAction::Nothing => {}
            KeyAction::Send(event) => {
                debug!(event = event.name(), "Key mapped to event");
                if let Err(e) = self.client.send_event(event).await {
                    warn!(error = %e, "Controller rejected event");
                }
            }
            KeyAction::Quit => {
                if let Err(e) = self.client.request_quit().await {
                    warn!(error = %e, "Quit request failed");
                }
                self.running = false;
            }
        }
        self.process_messages();
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.compositor.resize(Rect::new(0, 0, width, height));

        let bounds = LayerBounds::for_size(width, height);
        self.compositor.place_layer(self.layers.screen, bounds.screen);
        self.compositor.place_layer(self.layers.status, bounds.status);
        self.compositor.place_layer(self.layers.chat, bounds.chat);
        self.compositor.place_layer(self.layers.controls, bounds.controls);
        self.compositor.place_layer(self.layers.toast, bounds.toast);
    }

    /// Advance the controller and animations by the elapsed frame time
    pub async fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(delta).await;
    }

    /// Advance by an explicit amount of time
    pub async fn advance(&mut self, delta: Duration) {
        self.client.tick(delta).await;
        self.process_messages();
        self.display.update(delta);
        self.frame = self.frame.wrapping_add(1);

        if self.display.quit || !self.client.is_running() {
            self.running = false;
        }
    }

    /// Apply all pending controller messages
    fn process_messages(&mut self) {
        let seen = self.display.chat.messages.len();
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
        if self.display.chat.messages.len() != seen {
            self.input.chat_scroll.scroll_to_bottom();
        }
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let output = self.frame_buffer();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    let idx = output.index_of(x, y);
                    if let Some(cell) = output.content.get(idx) {
                        buf[(x, y)] = cell.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Draw every layer and composite them into one frame
    pub fn frame_buffer(&mut self) -> &Buffer {
        self.render_layers();
        self.compositor.composite()
    }

    /// Draw every layer into its buffer
    fn render_layers(&mut self) {
        let ctx = RenderContext {
            display: &self.display,
            input: &self.input,
            frame: self.frame,
        };

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.screen) {
            screens::render(buf, &ctx);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            Self::render_status(buf, &self.display);
        }

        let chat_open = self.display.chat.open;
        self.compositor.set_visible(self.layers.chat, chat_open);
        if chat_open {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.chat) {
                Self::render_chat(
                    buf,
                    &self.display,
                    &self.input.chat,
                    &mut self.input.chat_scroll,
                );
            }
        }

        let home_button = self.display.controls.home_button && !chat_open;
        self.compositor.set_visible(self.layers.controls, home_button);
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.controls) {
            buf.reset();
            buf.set_string(
                0,
                0,
                HOME_BUTTON,
                Style::default()
                    .fg(PANEL_BG)
                    .bg(ECO_GREEN)
                    .add_modifier(Modifier::BOLD),
            );
        }

        let toast = self.display.notification.is_some();
        self.compositor.set_visible(self.layers.toast, toast);
        if let Some(notification) = self.display.notification.as_ref() {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.toast) {
                Self::render_toast(buf, notification.level, &notification.message);
            }
        }
    }

    /// Status line: screen, announcement, chat hint
    fn render_status(buf: &mut Buffer, display: &DisplayState) {
        buf.reset();
        let area = buf.area;
        if area.height == 0 {
            return;
        }

        let screen = display.active.map_or("EcoBin", |s| s.title());
        let mut status = format!(" ♻ EcoBin | {screen}");
        if let Some(text) = display.announcement.as_deref() {
            status.push_str(" | ");
            status.push_str(text);
        }
        if !display.exiting.is_empty() {
            status.push_str(" …");
        }
        let right = if display.chat.open {
            "F2 close chat "
        } else {
            "F2 EcoBot "
        };

        let style = Style::default().fg(DIM_GRAY);
        let room = (area.width as usize).saturating_sub(right.chars().count() + 1);
        buf.set_string(0, 0, truncate(&status, room), style);
        let right_x = area.width.saturating_sub(right.chars().count() as u16);
        buf.set_string(right_x, 0, right, Style::default().fg(ECO_TEAL));
    }

    /// Chat panel: transcript, quick actions, input line
    fn render_chat(
        buf: &mut Buffer,
        display: &DisplayState,
        typed: &str,
        scroll: &mut TextBlockState,
    ) {
        buf.reset();
        let area = buf.area;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ECO_GREEN_DARK))
            .title(" EcoBot 🤖 ")
            .title_style(Style::default().fg(ECO_GREEN).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(PANEL_BG));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 8 || inner.height < 4 {
            return;
        }
        let width = inner.width as usize;

        // Bottom up: input line, quick actions, transcript
        let input_y = inner.y + inner.height - 1;
        let input = format!("> {typed}_");
        let input = truncate(&input, width);
        buf.set_string(inner.x, input_y, &input, Style::default().fg(USER_TEXT));

        let actions = &display.chat.quick_actions;
        let mut bottom = input_y;
        if !actions.is_empty() {
            bottom = bottom.saturating_sub(actions.len() as u16 + 1);
            for (i, action) in actions.iter().enumerate() {
                let line = format!("[{}] {action}", i + 1);
                buf.set_string(
                    inner.x,
                    bottom + i as u16,
                    truncate(&line, width),
                    Style::default().fg(POINTS_GOLD),
                );
            }
        }

        let mut lines: Vec<(String, Style)> = Vec::new();
        for message in &display.chat.messages {
            let (prefix, color) = match message.sender {
                ChatSender::User => ("You: ", USER_TEXT),
                ChatSender::Bot => ("EcoBot: ", BOT_TEXT),
            };
            let text = format!("{prefix}{}", message.text);
            for line in wrap_lines(&text, width) {
                lines.push((line, Style::default().fg(color)));
            }
            lines.push((String::new(), Style::default()));
        }

        let room = bottom.saturating_sub(inner.y) as usize;
        let first = scroll.layout(lines.len(), room);
        for (i, (line, style)) in lines.iter().skip(first).take(room).enumerate() {
            buf.set_stringn(inner.x, inner.y + i as u16, line, width, *style);
        }
    }

    /// Notification toast
    fn render_toast(buf: &mut Buffer, level: NotifyLevel, message: &str) {
        buf.reset();
        let area = buf.area;
        let color = match level {
            NotifyLevel::Info => INFO_BLUE,
            NotifyLevel::Warning => WARNING_AMBER,
            NotifyLevel::Error => ERROR_RED,
            NotifyLevel::Success => SUCCESS_GREEN,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(PANEL_BG));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height > 0 {
            let text = truncate(message, inner.width as usize);
            buf.set_string(inner.x, inner.y, text, Style::default().fg(color));
        }
    }
}
