//! Result screen: detection card, nature reaction, impact summary

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, StatefulWidget, Widget};

use ecobin_core::reveal::Decoration;

use super::{centered, hints, RenderContext};
use crate::display::{DisplayNature, Fade, ResultStage};
use crate::theme::{
    blend, DIM_GRAY, ECO_GREEN, ECO_GREEN_DARK, ECO_TEAL, FLOWER_PINK, PANEL_BG, PLANT_HAPPY,
    PLANT_SAD, POINTS_GOLD, SAD_TEXT, SPARKLE, SUCCESS_GREEN,
};
use crate::widgets::{TextBlock, TextBlockState};

const SAD_PLANT: &[&str] = &[
    r"    _     ",
    r"   ( \    ",
    r"    \ \_  ",
    r"     |    ",
    r"   __|__  ",
    r"   \___/  ",
];

const HAPPY_PLANT: &[&str] = &[
    r"   \ | /  ",
    r"  --(@)-- ",
    r"   / | \  ",
    r"  \  |  / ",
    r"   __|__  ",
    r"   \___/  ",
];

pub(super) fn render(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let display = ctx.display;
    match display.result_stage() {
        ResultStage::Pending => {}
        ResultStage::Empty => {
            let reason = display.empty_reason.as_deref().unwrap_or_default();
            centered(buf, area, area.y + area.height / 2, reason, ctx.body_style(SAD_TEXT));
            hints(buf, area, "Enter home · Esc back");
        }
        ResultStage::Detection => render_detection(buf, area, ctx),
        ResultStage::Nature => {
            if let Some(nature) = display.nature.as_ref() {
                render_nature(buf, area, nature, ctx);
            }
        }
        ResultStage::Impact => render_impact(buf, area, ctx),
    }
}

fn render_detection(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let Some(summary) = ctx.display.detection.as_ref() else {
        return;
    };

    let card_w = area.width.saturating_sub(4).min(56);
    let card = Rect::new(
        area.x + (area.width - card_w) / 2,
        area.y + 1,
        card_w,
        area.height.saturating_sub(3).min(12),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ctx.body_style(ECO_GREEN_DARK));
    let inner = block.inner(card);
    block.render(card, buf);
    if inner.height < 5 {
        return;
    }

    centered(
        buf,
        inner,
        inner.y,
        summary.name,
        ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD),
    );
    let worth = format!("Estimated value: {}", summary.value);
    centered(buf, inner, inner.y + 1, &worth, ctx.body_style(POINTS_GOLD));
    let confidence = format!("Confidence: {}", summary.confidence);
    centered(buf, inner, inner.y + 2, &confidence, ctx.body_style(DIM_GRAY));

    let text_area = Rect::new(
        inner.x + 1,
        inner.y + 4,
        inner.width.saturating_sub(2),
        inner.height - 4,
    );
    let mut state = TextBlockState::default();
    TextBlock::new(summary.explanation)
        .style(ctx.body_style(Color::White))
        .render(text_area, buf, &mut state);

    hints(buf, area, "Enter see the impact on nature 🌿 · Esc back · F2 chat");
}

/// Style for text at a fade level, blending into the panel background
fn faded(color: Color, fade: Fade) -> Style {
    Style::default().fg(blend(PANEL_BG, color, fade.opacity()))
}

fn render_nature(buf: &mut Buffer, area: Rect, nature: &DisplayNature, ctx: &RenderContext<'_>) {
    let plant_w = 10;
    let x = area.x + area.width.saturating_sub(plant_w) / 2;
    let top = area.y + 1;

    // Both plants occupy the same spot; the happy one is drawn last
    if nature.sad_plant.is_visible() {
        let style = faded(PLANT_SAD, nature.sad_plant);
        for (i, line) in SAD_PLANT.iter().enumerate() {
            buf.set_string(x, top + i as u16, line, style);
        }
    }
    if let Some(fade) = nature.happy_plant.filter(Fade::is_visible) {
        let style = faded(PLANT_HAPPY, fade);
        for (i, line) in HAPPY_PLANT.iter().enumerate() {
            buf.set_string(x, top + i as u16, line, style);
        }
        draw_decorations(buf, area, x, top, nature);
    }

    let text_y = top + SAD_PLANT.len() as u16 + 1;
    let (sad, sad_fade) = &nature.sad_message;
    if sad_fade.is_visible() {
        centered(buf, area, text_y, sad, faded(SAD_TEXT, *sad_fade));
    }
    if let Some((happy, fade)) = nature.happy_message.as_ref() {
        if fade.is_visible() {
            centered(buf, area, text_y, happy, faded(SUCCESS_GREEN, *fade));
        }
    }
    if let Some(fade) = nature.continue_control.filter(Fade::is_visible) {
        centered(
            buf,
            area,
            text_y + 2,
            "[ Continue ]",
            faded(ECO_TEAL, fade).add_modifier(Modifier::BOLD),
        );
        hints(buf, area, "Enter continue · Esc back");
    }
}

fn draw_decorations(buf: &mut Buffer, area: Rect, x: u16, top: u16, nature: &DisplayNature) {
    let spots: [(Decoration, &str, Color, &[(i16, i16)]); 3] = [
        (Decoration::Leaf, "🍃", PLANT_HAPPY, &[(-4, 2), (11, 2), (-6, 4), (13, 4), (-2, 0)]),
        (Decoration::Flower, "🌸", FLOWER_PINK, &[(-8, 1), (15, 1), (-5, 5), (12, 5)]),
        (Decoration::Sparkle, "✨", SPARKLE, &[(-3, -1), (12, -1), (4, -1)]),
    ];

    for (kind, glyph, color, positions) in spots {
        let shown = nature.shown(kind);
        for &(dx, dy) in positions.iter().take(shown) {
            let px = i32::from(x) + i32::from(dx);
            let py = i32::from(top) + i32::from(dy);
            if px < i32::from(area.x)
                || py < i32::from(area.y)
                || px + 2 > i32::from(area.x + area.width)
                || py >= i32::from(area.y + area.height)
            {
                continue;
            }
            buf.set_string(px as u16, py as u16, glyph, Style::default().fg(color));
        }
    }
}

fn render_impact(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let Some(impact) = ctx.display.impact.as_ref() else {
        return;
    };

    centered(
        buf,
        area,
        area.y + 1,
        "Your impact 🌍",
        ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD),
    );

    let count = impact.summary.cards.len() as u16;
    let card_w = 18u16;
    let gap = 2u16;
    let total = count * card_w + count.saturating_sub(1) * gap;
    let left = area.x + area.width.saturating_sub(total) / 2;
    let top = area.y + 3;

    for (i, card) in impact.summary.cards.iter().enumerate() {
        if !impact.cards_shown.get(i).copied().unwrap_or(false) {
            continue;
        }
        let rect = Rect::new(left + i as u16 * (card_w + gap), top, card_w, 5);
        if rect.x + rect.width > area.x + area.width {
            break;
        }
        let color = if i == 0 { POINTS_GOLD } else { ECO_TEAL };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(ctx.body_style(color));
        let inner = block.inner(rect);
        block.render(rect, buf);
        centered(
            buf,
            inner,
            inner.y,
            &card.value,
            ctx.body_style(color).add_modifier(Modifier::BOLD),
        );
        centered(buf, inner, inner.y + 2, card.label, ctx.body_style(DIM_GRAY));
    }

    centered(
        buf,
        area,
        top + 7,
        &impact.summary.final_message,
        ctx.body_style(SUCCESS_GREEN),
    );
    hints(buf, area, "Enter home · F2 chat");
}
