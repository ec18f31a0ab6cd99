//! Recycling-center map
//!
//! Markers are projected onto the character grid around the view center.
//! One map tile at the view's zoom spans two thirds of the plot width, and
//! rows are treated as twice as tall as columns are wide.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use ecobin_core::map::{MapMarker, MapView};
use ecobin_core::MapStatus;

use super::{centered, hints, RenderContext};
use crate::theme::{
    DIM_GRAY, ECO_GREEN, ECO_TEAL, ERROR_RED, INFO_BLUE, POINTS_GOLD, SUCCESS_GREEN,
    WARNING_AMBER,
};
use crate::widgets::truncate;

/// Rows reserved for the status line and the legend
const LEGEND_ROWS: u16 = 5;

pub(super) fn render(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let map = &ctx.display.map;

    let (status_text, status_color) = match (map.status, map.status_text.as_deref()) {
        (Some(status), Some(text)) => (text.to_string(), status_color(status)),
        _ => ("Finding your location...".to_string(), DIM_GRAY),
    };
    let status_line = match map.position.as_deref() {
        Some(pos) => format!("{status_text} ({pos})"),
        None => status_text,
    };
    centered(buf, area, area.y, &status_line, ctx.body_style(status_color));

    let Some(view) = map.view.as_ref() else {
        hints(buf, area, "Esc back · h home · F2 chat");
        return;
    };

    let list_rows = if map.centers_open {
        view.centers.len() as u16 + 1
    } else {
        0
    };
    let plot = Rect::new(
        area.x + 1,
        area.y + 2,
        area.width.saturating_sub(2),
        area.height.saturating_sub(LEGEND_ROWS + list_rows + 1),
    );
    if plot.height >= 3 && plot.width >= 10 {
        draw_plot(buf, plot, view, ctx);
    }

    let mut y = plot.y + plot.height;
    let legend = format!(
        "@ you   1-{} EcoBin stations   {}",
        view.centers.len(),
        view.attribution
    );
    buf.set_stringn(area.x + 1, y, &legend, plot.width as usize, Style::default().fg(DIM_GRAY));
    y += 1;

    let toggle = if map.centers_open {
        "▾ Nearby centers [l]"
    } else {
        "▸ Nearby centers [l]"
    };
    buf.set_string(area.x + 1, y, toggle, ctx.body_style(ECO_TEAL));
    y += 1;

    if map.centers_open {
        for (i, center) in view.centers.iter().enumerate() {
            let line = center_line(i, center);
            let line = truncate(&line, plot.width as usize);
            buf.set_string(area.x + 3, y, &line, ctx.body_style(ECO_GREEN));
            y += 1;
        }
    }

    hints(buf, area, "l centers · Enter scan an item · Esc back · F2 chat");
}

fn status_color(status: MapStatus) -> ratatui::style::Color {
    match status {
        MapStatus::Found => SUCCESS_GREEN,
        MapStatus::Fallback => WARNING_AMBER,
        MapStatus::Unsupported => ERROR_RED,
    }
}

fn center_line(i: usize, center: &MapMarker) -> String {
    let mut line = format!("{}. {}", i + 1, center.title);
    if let Some(detail) = &center.detail {
        line.push_str(", ");
        line.push_str(detail);
    }
    if let Some(url) = &center.directions_url {
        line.push_str("  ");
        line.push_str(url);
    }
    line
}

/// Longitude span of the plot width
fn lon_span(zoom: u8) -> f64 {
    360.0 / f64::from(1u32 << zoom.min(22)) * 1.5
}

/// Grid cell for a position, if it falls inside the plot
fn project(view: &MapView, plot: Rect, lat: f64, lon: f64) -> Option<(u16, u16)> {
    let w = f64::from(plot.width);
    let h = f64::from(plot.height);
    let lon_span = lon_span(view.zoom);
    let lat_span = lon_span * (h * 2.0) / w;

    let fx = (lon - view.center.longitude) / lon_span * w + w / 2.0;
    let fy = (view.center.latitude - lat) / lat_span * h + h / 2.0;
    if fx < 0.0 || fy < 0.0 || fx >= w || fy >= h {
        return None;
    }
    Some((plot.x + fx as u16, plot.y + fy as u16))
}

fn draw_plot(buf: &mut Buffer, plot: Rect, view: &MapView, ctx: &RenderContext<'_>) {
    // Background dots stand in for map tiles
    let grid = Style::default().fg(DIM_GRAY);
    for y in (plot.y..plot.y + plot.height).step_by(2) {
        for x in (plot.x..plot.x + plot.width).step_by(4) {
            buf.set_string(x, y, "·", grid);
        }
    }

    for (i, center) in view.centers.iter().enumerate() {
        if let Some((x, y)) = project(view, plot, center.position.latitude, center.position.longitude)
        {
            let label = (i + 1).to_string();
            buf.set_string(
                x,
                y,
                &label,
                ctx.body_style(POINTS_GOLD).add_modifier(Modifier::BOLD),
            );
        }
    }

    if let Some(user) = view.user_marker.as_ref() {
        if let Some((x, y)) = project(view, plot, user.position.latitude, user.position.longitude) {
            buf.set_string(x, y, "@", ctx.body_style(INFO_BLUE).add_modifier(Modifier::BOLD));
        }
    }
}
