//! Color Picker Widget
//!
//! Each accent slot is a trigger button; an open picker shows a palette
//! popup under its trigger. Layout is computed separately from drawing so the
//! app can hit-test clicks and report picker bounds to the orchestrator.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Clear, Widget};

use adwizard_core::{Bounds, ColorSlot, HexColor};

use crate::theme::{accent, text_on, BRAND_VIOLET, DIM_GRAY};

/// Swatches offered by the popup
pub const PALETTE: [HexColor; 16] = [
    HexColor::new(0xFF, 0xFF, 0xFF),
    HexColor::new(0x00, 0x00, 0x00),
    HexColor::new(0x80, 0x80, 0x80),
    HexColor::new(0xE6, 0x39, 0x46),
    HexColor::new(0xF4, 0xA2, 0x61),
    HexColor::new(0xE9, 0xC4, 0x6A),
    HexColor::new(0x2A, 0x9D, 0x8F),
    HexColor::new(0x26, 0x46, 0x53),
    HexColor::new(0x45, 0x7B, 0x9D),
    HexColor::new(0xA8, 0xDA, 0xDC),
    HexColor::new(0x7F, 0x00, 0xFF),
    HexColor::new(0xFF, 0x66, 0xC4),
    HexColor::new(0x3A, 0x86, 0xFF),
    HexColor::new(0x8A, 0xC9, 0x26),
    HexColor::new(0xB5, 0x65, 0x1D),
    HexColor::new(0xFF, 0xBE, 0x0B),
];

const SWATCHES_PER_ROW: u16 = 4;
const SWATCH_WIDTH: u16 = 4;
const TRIGGER_WIDTH: u16 = 16;

/// Screen regions of one picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerLayout {
    /// Slot this picker edits
    pub slot: ColorSlot,
    /// Trigger button
    pub trigger: Rect,
    /// Popup frame, when open
    pub popup: Option<Rect>,
    /// Clickable swatches inside the popup
    pub swatches: Vec<(Rect, HexColor)>,
}

impl PickerLayout {
    /// Lay out a picker with its trigger at `origin`, clipped to `screen`
    pub fn new(slot: ColorSlot, origin: Position, open: bool, screen: Rect) -> Self {
        let trigger = Rect::new(origin.x, origin.y, TRIGGER_WIDTH, 1).intersection(screen);

        let mut swatches = Vec::new();
        let popup = open.then(|| {
            #[allow(clippy::cast_possible_truncation)]
            let rows = (PALETTE.len() as u16).div_ceil(SWATCHES_PER_ROW);
            let popup = Rect::new(
                origin.x,
                origin.y + 1,
                SWATCHES_PER_ROW * SWATCH_WIDTH + 2,
                rows + 2,
            )
            .intersection(screen);

            for (i, color) in PALETTE.iter().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let i = i as u16;
                let cell = Rect::new(
                    popup.x + 1 + (i % SWATCHES_PER_ROW) * SWATCH_WIDTH,
                    popup.y + 1 + i / SWATCHES_PER_ROW,
                    SWATCH_WIDTH,
                    1,
                )
                .intersection(popup);
                if !cell.is_empty() {
                    swatches.push((cell, *color));
                }
            }
            popup
        });

        Self {
            slot,
            trigger,
            popup,
            swatches,
        }
    }

    /// Region owned by the picker (trigger plus popup)
    pub fn bounds(&self) -> Bounds {
        let trigger = to_bounds(self.trigger);
        match self.popup {
            Some(popup) => trigger.union(&to_bounds(popup)),
            None => trigger,
        }
    }

    /// Swatch under a point
    pub fn swatch_at(&self, position: Position) -> Option<HexColor> {
        self.swatches
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, color)| *color)
    }

    /// Draw the trigger showing `color`
    pub fn render_trigger(&self, color: HexColor, buf: &mut Buffer) {
        let key = format!("F{} ", self.slot.index() + 1);
        buf.set_string(
            self.trigger.x,
            self.trigger.y,
            &key,
            Style::default().fg(DIM_GRAY),
        );
        let label = format!(" {color} ");
        buf.set_stringn(
            self.trigger.x + 3,
            self.trigger.y,
            &label,
            usize::from(self.trigger.width.saturating_sub(3)),
            Style::default().fg(text_on(color)).bg(accent(color)),
        );
    }

    /// Draw the popup, if open, over whatever is below
    pub fn render_popup(&self, current: HexColor, buf: &mut Buffer) {
        let Some(popup) = self.popup else {
            return;
        };
        Clear.render(popup, buf);
        Block::bordered()
            .title(format!(" {} ", self.slot))
            .border_style(Style::default().fg(BRAND_VIOLET))
            .render(popup, buf);

        for (rect, color) in &self.swatches {
            let mut style = Style::default().bg(accent(*color)).fg(text_on(*color));
            let glyph = if *color == current {
                style = style.add_modifier(Modifier::BOLD);
                " ** "
            } else {
                "    "
            };
            buf.set_stringn(rect.x, rect.y, glyph, usize::from(rect.width), style);
        }
    }
}

fn to_bounds(rect: Rect) -> Bounds {
    Bounds::new(rect.x, rect.y, rect.width, rect.height)
}

/// Palette neighbour of `color`, for keyboard cycling
pub fn cycle_palette(color: HexColor, forward: bool) -> HexColor {
    let len = PALETTE.len();
    let next = match PALETTE.iter().position(|c| *c == color) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    PALETTE[next]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::new(0, 0, 80, 24);

    #[test]
    fn test_closed_picker_is_just_trigger() {
        let layout = PickerLayout::new(ColorSlot::First, Position::new(2, 5), false, SCREEN);
        assert_eq!(layout.popup, None);
        assert!(layout.swatches.is_empty());
        assert_eq!(layout.bounds(), Bounds::new(2, 5, TRIGGER_WIDTH, 1));
    }

    #[test]
    fn test_open_picker_swatches() {
        let layout = PickerLayout::new(ColorSlot::Second, Position::new(20, 5), true, SCREEN);
        let popup = layout.popup.unwrap();
        assert_eq!(layout.swatches.len(), PALETTE.len());
        assert!(layout.bounds().contains(popup.x, popup.y + popup.height - 1));

        let (first, color) = layout.swatches[0];
        assert_eq!(layout.swatch_at(Position::new(first.x, first.y)), Some(color));
        assert_eq!(layout.swatch_at(Position::new(0, 0)), None);
    }

    #[test]
    fn test_cycle_palette_wraps() {
        assert_eq!(cycle_palette(PALETTE[15], true), PALETTE[0]);
        assert_eq!(cycle_palette(PALETTE[0], false), PALETTE[15]);
        assert_eq!(cycle_palette(HexColor::new(1, 1, 1), true), PALETTE[0]);
    }
}
