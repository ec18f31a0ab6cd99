//! TextBlock Widget
//!
//! A borderless, scrollable text region, plus width-aware helpers for
//! strings that contain emoji.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// State for a scrollable text block
///
/// With `follow` set the view sticks to the last line as content grows,
/// the way a chat transcript should.
#[derive(Default, Debug, Clone)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
    /// Visible lines at the last render
    pub viewport: usize,
    /// Pin the view to the bottom
    pub follow: bool,
}

impl TextBlockState {
    /// Largest offset that still fills the viewport
    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        let current = if self.follow {
            self.max_offset()
        } else {
            self.scroll_offset
        };
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            current.saturating_add(delta as usize)
        };
        self.scroll_offset = next.min(self.max_offset());
        self.follow = self.scroll_offset >= self.max_offset();
    }

    /// Scroll to bottom and stay there as lines are added
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
        self.scroll_offset = self.max_offset();
    }

    /// Record the content size and return the first visible line
    pub fn layout(&mut self, total_lines: usize, viewport: usize) -> usize {
        self.total_lines = total_lines;
        self.viewport = viewport;
        self.scroll_offset = if self.follow {
            self.max_offset()
        } else {
            self.scroll_offset.min(self.max_offset())
        };
        self.scroll_offset
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = wrap_lines(self.content, area.width as usize);
        let first = state.layout(wrapped.len(), area.height as usize);

        for (i, line) in wrapped
            .iter()
            .skip(first)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, area.width as usize, self.style);
        }
    }
}

/// Wrap text to `width`, keeping blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    content
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// Cut `text` to at most `max_width` terminal columns
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Column where `text` starts when centered in `width`
pub fn centered_x(text: &str, width: u16) -> u16 {
    let w = u16::try_from(text.width()).unwrap_or(u16::MAX);
    width.saturating_sub(w) / 2
}
