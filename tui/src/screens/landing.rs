//! Landing and signup screens

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{centered, hints, RenderContext};
use crate::input::SignupField;
use crate::theme::{DIM_GRAY, ECO_GREEN, ECO_TEAL, POINTS_GOLD};

const LOGO: &[&str] = &[
    r"   ___          ___  _      ",
    r"  | __|__ ___  | _ )(_)_ _  ",
    r"  | _|/ _/ _ \ | _ \| | ' \ ",
    r"  |___\__\___/ |___/|_|_||_|",
];

pub(super) fn render_landing(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let mut y = area.y + area.height.saturating_sub(12) / 2;
    for line in LOGO {
        centered(buf, area, y, line, ctx.body_style(ECO_GREEN));
        y += 1;
    }
    y += 1;
    centered(
        buf,
        area,
        y,
        "Recycle your e-waste. Earn Eco Points. Watch nature bloom. 🌸",
        ctx.body_style(ECO_TEAL),
    );
    y += 2;
    centered(
        buf,
        area,
        y,
        "[Enter] Get started    [s] Sign up",
        ctx.body_style(POINTS_GOLD).add_modifier(Modifier::BOLD),
    );
    if ctx.display.controls.back_to_app {
        centered(buf, area, y + 1, "[a] Back to app", ctx.body_style(ECO_TEAL));
    }

    hints(buf, area, "F2 chat · q quit");
}

pub(super) fn render_signup(buf: &mut Buffer, area: Rect, ctx: &RenderContext<'_>) {
    let form = &ctx.input.signup;
    let fields = [
        (SignupField::Mobile, "Mobile  +91", form.mobile.clone()),
        (SignupField::Password, "Password", "•".repeat(form.password.chars().count())),
        (SignupField::Confirm, "Confirm ", "•".repeat(form.confirm.chars().count())),
    ];

    let width = area.width.min(44);
    let x = area.x + (area.width - width) / 2;
    let mut y = area.y + area.height.saturating_sub(10) / 2;

    centered(
        buf,
        area,
        y,
        "Create your EcoBin account",
        ctx.body_style(ECO_GREEN).add_modifier(Modifier::BOLD),
    );
    y += 2;

    for (field, label, value) in fields {
        let focused = form.focus == field;
        let marker = if focused { "›" } else { " " };
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            ctx.body_style(ECO_TEAL).add_modifier(Modifier::BOLD)
        } else {
            ctx.body_style(DIM_GRAY)
        };
        let line = format!("{marker} {label}: {value}{cursor}");
        buf.set_stringn(x, y, &line, width as usize, style);
        y += 2;
    }

    centered(
        buf,
        area,
        y,
        "[Enter] Sign up",
        Style::default().fg(POINTS_GOLD),
    );

    hints(buf, area, "Tab next field · Esc back · F2 chat");
}
