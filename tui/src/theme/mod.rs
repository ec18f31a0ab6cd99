//! Theme and Colors
//!
//! EcoBin's palette: leafy greens for the app chrome, earth tones for the
//! sad plant, and bright bloom colors for the happy one.

use ratatui::style::Color;

// ============================================================================
// Brand
// ============================================================================

/// Primary brand green (titles, selected items)
pub const ECO_GREEN: Color = Color::Rgb(46, 204, 113);

/// Darker green for borders and separators
pub const ECO_GREEN_DARK: Color = Color::Rgb(30, 132, 73);

/// Accent teal (buttons, links)
pub const ECO_TEAL: Color = Color::Rgb(26, 188, 156);

/// Eco Points gold
pub const POINTS_GOLD: Color = Color::Rgb(241, 196, 15);

// ============================================================================
// Nature Reaction
// ============================================================================

/// Wilted plant brown
pub const PLANT_SAD: Color = Color::Rgb(139, 94, 60);

/// Healthy plant green
pub const PLANT_HAPPY: Color = Color::Rgb(88, 214, 141);

/// Flower pink
pub const FLOWER_PINK: Color = Color::Rgb(255, 121, 198);

/// Sparkle yellow
pub const SPARKLE: Color = Color::Rgb(255, 236, 139);

/// Sad message text
pub const SAD_TEXT: Color = Color::Rgb(170, 140, 120);

// ============================================================================
// UI Colors
// ============================================================================

/// User chat text
pub const USER_TEXT: Color = Color::Rgb(130, 220, 130);

/// Bot chat text
pub const BOT_TEXT: Color = Color::Rgb(150, 200, 255);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Panel background
pub const PANEL_BG: Color = Color::Rgb(20, 30, 24);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 179, 71);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Info blue
pub const INFO_BLUE: Color = Color::Rgb(100, 180, 255);

/// Blend two RGB colors; `t` is clamped to `0.0..=1.0`.
///
/// Non-RGB colors snap to `to` once `t` passes the midpoint.
#[must_use]
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| {
                let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
                v.round().clamp(0.0, 255.0) as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t >= 0.5 => to,
        _ => from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(PLANT_SAD, PLANT_HAPPY, 0.0), PLANT_SAD);
        assert_eq!(blend(PLANT_SAD, PLANT_HAPPY, 1.0), PLANT_HAPPY);
        assert_eq!(blend(PLANT_SAD, PLANT_HAPPY, 7.0), PLANT_HAPPY);
    }

    #[test]
    fn test_blend_midpoint() {
        assert_eq!(
            blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 50), 0.5),
            Color::Rgb(100, 50, 25)
        );
        assert_eq!(blend(Color::Black, Color::White, 0.4), Color::Black);
    }
}
