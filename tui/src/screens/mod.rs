//! Screen Rendering
//!
//! One renderer per screen. Each draws into the screen layer's buffer from
//! the display state alone; none of them send events.

mod home;
mod landing;
mod map;
mod result;
mod scanning;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use ecobin_core::ScreenId;

use crate::display::DisplayState;
use crate::input::InputState;
use crate::theme::{DIM_GRAY, ECO_GREEN, ECO_GREEN_DARK};
use crate::widgets::{centered_x, truncate};

/// What a screen renderer can look at
pub struct RenderContext<'a> {
    /// Controller-driven state
    pub display: &'a DisplayState,
    /// What the user is typing
    pub input: &'a InputState,
    /// Frame counter for idle animations
    pub frame: u64,
}

impl RenderContext<'_> {
    /// Style for the screen body, dimmed while the screen fades out
    pub fn body_style(&self, color: Color) -> Style {
        if self.display.is_leaving() {
            Style::default().fg(DIM_GRAY)
        } else {
            Style::default().fg(color)
        }
    }
}

/// Draw the active screen
pub fn render(buf: &mut Buffer, ctx: &RenderContext<'_>) {
    buf.reset();
    let area = buf.area;
    if area.width < 20 || area.height < 8 {
        buf.set_stringn(0, 0, "Terminal too small", area.width as usize, Style::default());
        return;
    }

    let Some(screen) = ctx.display.active else {
        let text = "🌱 EcoBin";
        buf.set_string(
            centered_x(text, area.width),
            area.height / 2,
            text,
            Style::default().fg(ECO_GREEN),
        );
        return;
    };

    let inner = frame(buf, area, screen.title(), ctx);
    match screen {
        ScreenId::Landing => landing::render_landing(buf, inner, ctx),
        ScreenId::Signup => landing::render_signup(buf, inner, ctx),
        ScreenId::Home => home::render_home(buf, inner, ctx),
        ScreenId::History => home::render_history(buf, inner, ctx),
        ScreenId::Map => map::render(buf, inner, ctx),
        ScreenId::Scanning => scanning::render(buf, inner, ctx),
        ScreenId::Result => result::render(buf, inner, ctx),
    }
}

/// Rounded border with the screen title; returns the inner area
fn frame(buf: &mut Buffer, area: Rect, title: &str, ctx: &RenderContext<'_>) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ctx.body_style(ECO_GREEN_DARK))
        .title(format!(" ♻ {title} "))
        .title_style(ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

/// Write a centered line, clipped to the area
fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y >= area.y + area.height {
        return;
    }
    let text = truncate(text, area.width as usize);
    buf.set_string(area.x + centered_x(&text, area.width), y, &text, style);
}

/// Key hints on the last line of an area
fn hints(buf: &mut Buffer, area: Rect, text: &str) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height - 1;
    centered(buf, area, y, text, Style::default().fg(DIM_GRAY));
}
