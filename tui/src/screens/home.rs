//! Home grid and history screens

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use ecobin_core::{WasteCatalog, WasteTypeId};

use super::{centered, hints, RenderContext};
use crate::theme::{DIM_GRAY, ECO_GREEN, ECO_GREEN_DARK, POINTS_GOLD, SUCCESS_GREEN};
use crate::widgets::truncate;

fn icon(waste: WasteTypeId) -> &'static str {
    match waste {
        WasteTypeId::Phone => "📱",
        WasteTypeId::Battery => "🔋",
        WasteTypeId::Laptop => "💻",
        WasteTypeId::Charger => "🔌",
    }
}

pub(super) fn render_home(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    centered(
        buf,
        area,
        area.y + 1,
        "What are you recycling today?",
        ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD),
    );

    let tile_w = (area.width.saturating_sub(6) / 2).min(30);
    let tile_h = 5;
    let grid_w = tile_w * 2 + 2;
    let left = area.x + area.width.saturating_sub(grid_w) / 2;
    let top = area.y + 3;

    for (i, waste) in WasteTypeId::ALL.iter().copied().enumerate() {
        let col = (i % 2) as u16;
        let row = (i / 2) as u16;
        let tile = Rect::new(
            left + col * (tile_w + 2),
            top + row * (tile_h + 1),
            tile_w,
            tile_h,
        );
        if tile.y + tile.height > area.y + area.height {
            break;
        }

        let cursor = ctx.input.home_cursor == i;
        let picked = ctx.display.selection == Some(waste);
        let border = if picked {
            ctx.body_style(SUCCESS_GREEN).add_modifier(Modifier::BOLD)
        } else if cursor {
            ctx.body_style(POINTS_GOLD)
        } else {
            ctx.body_style(ECO_GREEN_DARK)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if picked {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border);
        let inner = block.inner(tile);
        block.render(tile, buf);

        let record = WasteCatalog::lookup(waste);
        let label = format!("{} {}  [{}]", icon(waste), record.name, i + 1);
        centered(buf, inner, inner.y, &label, border);
        let points = format!("+{} Eco Points", record.eco_points);
        centered(buf, inner, inner.y + 1, &points, ctx.body_style(DIM_GRAY));
        if picked {
            centered(buf, inner, inner.y + 2, "✓ Selected", border);
        }
    }

    hints(
        buf,
        area,
        "←→ move · Enter select · m map · v history · F2 chat · q quit",
    );
}

pub(super) fn render_history(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    centered(
        buf,
        area,
        area.y + 1,
        "Your recycling history",
        ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD),
    );
    centered(
        buf,
        area,
        area.y + 3,
        "Nothing recycled yet. Your first item is waiting! 🌱",
        ctx.body_style(DIM_GRAY),
    );

    // What each item is worth, as a teaser
    let mut y = area.y + 5;
    for (waste, record) in WasteCatalog::entries() {
        if y + 1 >= area.y + area.height {
            break;
        }
        let line = format!(
            "{} {:<16} {:>10}  +{} pts",
            icon(waste),
            record.name,
            record.monetary_value,
            record.eco_points
        );
        let line = truncate(&line, area.width.saturating_sub(4) as usize);
        centered(buf, area, y, &line, Style::default().fg(DIM_GRAY));
        y += 1;
    }

    hints(buf, area, "Enter home · Esc back · F2 chat");
}
