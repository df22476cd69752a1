//! TextBlock Widget
//!
//! A borderless, wrapped text region. Scrollable when rendered with state,
//! optionally centred.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};
use textwrap::core::display_width;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Scroll to bottom
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(1);
    }
}

/// A borderless, wrapped text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    alignment: Alignment,
}

impl<'a> TextBlock<'a> {
    /// Block over `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            alignment: Alignment::Left,
        }
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Horizontal alignment of each wrapped line
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Wrapped lines for a given width
    #[must_use]
    pub fn wrapped(&self, width: u16) -> Vec<String> {
        let width = usize::from(width.max(1));
        self.content
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
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let wrapped = self.wrapped(area.width);

        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(usize::from(area.height));
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(usize::from(area.height))
            .enumerate()
        {
            let width = u16::try_from(display_width(line)).unwrap_or(area.width);
            let offset = match self.alignment {
                Alignment::Left => 0,
                Alignment::Center => area.width.saturating_sub(width) / 2,
                Alignment::Right => area.width.saturating_sub(width),
            };
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + i as u16;
            buf.set_stringn(
                area.x + offset,
                y,
                line,
                usize::from(area.width - offset),
                self.style,
            );
        }
    }
}

impl Widget for TextBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut state = TextBlockState::default();
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_wraps_to_width() {
        let block = TextBlock::new("one two three four");
        assert_eq!(block.wrapped(9), vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_centered_render() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        Widget::render(
            TextBlock::new("abcd").alignment(Alignment::Center),
            area,
            &mut buf,
        );
        assert_eq!(row(&buf, 0), "   abcd   ");
    }

    #[test]
    fn test_scroll_clamped() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState {
            scroll_offset: 10,
            total_lines: 0,
        };
        StatefulWidget::render(TextBlock::new("a\nb\nc\nd"), area, &mut buf, &mut state);
        assert_eq!(state.total_lines, 4);
        assert_eq!(state.scroll_offset, 2);
        assert_eq!(row(&buf, 0).trim_end(), "c");
        assert_eq!(row(&buf, 1).trim_end(), "d");
    }
}
