//! Scan frame

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use ecobin_core::ScanPhase;

use super::{centered, hints, RenderContext};
use crate::theme::{DIM_GRAY, ECO_GREEN, ECO_TEAL, POINTS_GOLD, SUCCESS_GREEN};

const FRAME_W: u16 = 28;
const FRAME_H: u16 = 9;

pub(super) fn render(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let scan = &ctx.display.scan;
    let frame_w = FRAME_W.min(area.width);
    let frame_h = FRAME_H.min(area.height.saturating_sub(6));
    let x = area.x + (area.width - frame_w) / 2;
    let y = area.y + 1;

    let color = match scan.phase {
        ScanPhase::Idle => ECO_TEAL,
        ScanPhase::Analyzing => POINTS_GOLD,
        ScanPhase::Detected => SUCCESS_GREEN,
    };
    let style = ctx.body_style(color);

    draw_corners(buf, Rect::new(x, y, frame_w, frame_h), style);

    if scan.phase == ScanPhase::Analyzing && frame_h > 2 {
        // Sweep line bouncing inside the frame
        let travel = u64::from(frame_h - 2);
        let step = ctx.frame / 2 % (travel * 2);
        let offset = if step < travel { step } else { travel * 2 - step - 1 };
        let line_y = y + 1 + offset as u16;
        let sweep = "─".repeat(frame_w.saturating_sub(4) as usize);
        buf.set_string(x + 2, line_y, &sweep, style);
    }

    if scan.checkmark {
        centered(
            buf,
            area,
            y + frame_h / 2,
            "✔",
            style.add_modifier(Modifier::BOLD),
        );
    }

    let below = y + frame_h + 1;
    centered(buf, area, below, &scan.prompt, style.add_modifier(Modifier::BOLD));

    match &ctx.input.upload {
        Some(name) => {
            let line = format!("File to upload: {name}_");
            centered(buf, area, below + 2, &line, Style::default().fg(ECO_GREEN));
            hints(buf, area, "Enter upload · Esc cancel");
        }
        None => {
            if scan.phase == ScanPhase::Idle {
                centered(
                    buf,
                    area,
                    below + 2,
                    "[c] Capture    [u] Upload a photo",
                    ctx.body_style(DIM_GRAY),
                );
            }
            hints(buf, area, "c capture · u upload · Esc back · h home · F2 chat");
        }
    }
}

fn draw_corners(buf: &mut Buffer, r: Rect, style: Style) {
    if r.width < 4 || r.height < 2 {
        return;
    }
    let right = r.x + r.width - 2;
    let bottom = r.y + r.height - 1;
    buf.set_string(r.x, r.y, "┌─", style);
    buf.set_string(right, r.y, "─┐", style);
    buf.set_string(r.x, bottom, "└─", style);
    buf.set_string(right, bottom, "─┘", style);
}
