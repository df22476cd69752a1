//! Accent Color Selection
//!
//! Three independent color pickers feed the accent colors of the image
//! prompt. Each picker can be toggled open, recolored, and dismissed by an
//! interaction outside its rendered region.
//!
//! # Outside Interactions
//!
//! The controller knows nothing about any particular UI toolkit. A surface
//! either reports an outside interaction for a slot directly
//! ([`ColorSelectionController::interaction_outside`]) or registers the
//! rendered [`Bounds`] of each picker and forwards raw pointer positions
//! ([`ColorSelectionController::pointer_interaction`]), letting the controller
//! do the hit-testing.
//!
//! Opening one picker never closes another; an outside interaction closes
//! exactly the pickers it falls outside of.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid color input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input was not 3 or 6 hex digits
    #[error("invalid hex color '{0}': expected #RRGGBB or #RGB")]
    InvalidHex(String),
}

/// An sRGB color written as `#RRGGBB`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    /// Default accent color
    pub const WHITE: HexColor = HexColor::new(0xFF, 0xFF, 0xFF);

    /// Create from components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Red, green and blue components
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for anything else.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(input.to_string());
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let expand = |c: &str| channel(&c.repeat(2));
                Ok(Self::new(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// One of the three accent color slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorSlot {
    /// First accent
    First,
    /// Second accent
    Second,
    /// Third accent
    Third,
}

impl ColorSlot {
    /// All slots in prompt order
    pub const ALL: [ColorSlot; 3] = [ColorSlot::First, ColorSlot::Second, ColorSlot::Third];

    /// Position within [`ColorSlot::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }
}

impl fmt::Display for ColorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color {}", self.index() + 1)
    }
}

/// A rectangular region in surface coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: u16,
    /// Top edge
    pub y: u16,
    /// Width
    pub width: u16,
    /// Height
    pub height: u16,
}

impl Bounds {
    /// Create a region
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside (right and bottom edges exclusive)
    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let right = u32::from(self.x) + u32::from(self.width);
        let bottom = u32::from(self.y) + u32::from(self.height);
        x >= self.x && u32::from(x) < right && y >= self.y && u32::from(y) < bottom
    }

    /// Smallest region covering both
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (u32::from(self.x) + u32::from(self.width))
            .max(u32::from(other.x) + u32::from(other.width));
        let bottom = (u32::from(self.y) + u32::from(self.height))
            .max(u32::from(other.y) + u32::from(other.height));
        Bounds {
            x,
            y,
            width: u16::try_from(right - u32::from(x)).unwrap_or(u16::MAX),
            height: u16::try_from(bottom - u32::from(y)).unwrap_or(u16::MAX),
        }
    }
}

/// State of a single picker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorPickerState {
    /// Current color
    pub color: HexColor,
    /// Whether the picker is expanded
    pub is_open: bool,
    /// Rendered region (trigger plus popup), if the surface reported one
    #[serde(skip)]
    pub bounds: Option<Bounds>,
}

/// Owns the three accent pickers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSelectionController {
    pickers: [ColorPickerState; 3],
}

impl ColorSelectionController {
    /// All pickers closed, all colors white
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the given colors (all pickers closed)
    #[must_use]
    pub fn with_colors(colors: [HexColor; 3]) -> Self {
        let mut controller = Self::default();
        for (picker, color) in controller.pickers.iter_mut().zip(colors) {
            picker.color = color;
        }
        controller
    }

    /// Picker state for a slot
    #[must_use]
    pub fn picker(&self, slot: ColorSlot) -> &ColorPickerState {
        &self.pickers[slot.index()]
    }

    /// The three accent colors in prompt order
    #[must_use]
    pub fn colors(&self) -> [HexColor; 3] {
        [
            self.pickers[0].color,
            self.pickers[1].color,
            self.pickers[2].color,
        ]
    }

    /// Whether a slot is expanded
    #[must_use]
    pub fn is_open(&self, slot: ColorSlot) -> bool {
        self.pickers[slot.index()].is_open
    }

    /// Flip a slot open/closed. Other slots are untouched.
    pub fn toggle(&mut self, slot: ColorSlot) -> bool {
        let picker = &mut self.pickers[slot.index()];
        picker.is_open = !picker.is_open;
        tracing::trace!(slot = %slot, open = picker.is_open, "Toggled color picker");
        picker.is_open
    }

    /// Change a slot's color without affecting whether it is open
    pub fn set_color(&mut self, slot: ColorSlot, color: HexColor) {
        self.pickers[slot.index()].color = color;
    }

    /// Record where a slot is rendered, or `None` when it is not on screen
    pub fn set_bounds(&mut self, slot: ColorSlot, bounds: Option<Bounds>) {
        self.pickers[slot.index()].bounds = bounds;
    }

    /// An interaction happened outside the slot's region: close it
    pub fn interaction_outside(&mut self, slot: ColorSlot) {
        self.pickers[slot.index()].is_open = false;
    }

    /// Hit-test a pointer interaction against every open picker
    ///
    /// Closes each open picker whose registered bounds do not contain the
    /// point. Pickers without registered bounds are left alone, as are
    /// pickers that contain the point. Returns the slots that were closed.
    pub fn pointer_interaction(&mut self, x: u16, y: u16) -> Vec<ColorSlot> {
        let mut closed = Vec::new();
        for slot in ColorSlot::ALL {
            let picker = &mut self.pickers[slot.index()];
            if !picker.is_open {
                continue;
            }
            if let Some(bounds) = picker.bounds {
                if !bounds.contains(x, y) {
                    picker.is_open = false;
                    closed.push(slot);
                }
            }
        }
        closed
    }

    /// Slots currently open
    #[must_use]
    pub fn open_slots(&self) -> Vec<ColorSlot> {
        ColorSlot::ALL
            .into_iter()
            .filter(|slot| self.is_open(*slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_forms() {
        let expected = HexColor::new(0xA1, 0xB2, 0xC3);
        assert_eq!(HexColor::parse("#A1B2C3").unwrap(), expected);
        assert_eq!(HexColor::parse("a1b2c3").unwrap(), expected);
        assert_eq!(HexColor::parse(" #a1B2c3 ").unwrap(), expected);
        assert_eq!(
            HexColor::parse("#fa0").unwrap(),
            HexColor::new(0xFF, 0xAA, 0x00)
        );
    }

    #[test]
    fn test_hex_parse_rejects_garbage() {
        for bad in ["", "#", "#12345", "#1234567", "#GGGGGG", "red", "#12 345"] {
            assert!(HexColor::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_hex_display_upper_case() {
        assert_eq!(HexColor::parse("#a1b2c3").unwrap().to_string(), "#A1B2C3");
        assert_eq!(HexColor::default().to_string(), "#FFFFFF");
    }

    #[test]
    fn test_hex_serde_as_string() {
        let json = serde_json::to_string(&HexColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: HexColor = serde_json::from_str("\"#010203\"").unwrap();
        assert_eq!(back, HexColor::new(1, 2, 3));
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_defaults_white_and_closed() {
        let controller = ColorSelectionController::new();
        assert_eq!(controller.colors(), [HexColor::WHITE; 3]);
        assert!(controller.open_slots().is_empty());
    }

    #[test]
    fn test_toggle_does_not_close_others() {
        let mut controller = ColorSelectionController::new();
        controller.toggle(ColorSlot::First);
        controller.toggle(ColorSlot::Second);
        controller.toggle(ColorSlot::Third);
        assert_eq!(controller.open_slots(), ColorSlot::ALL.to_vec());

        controller.toggle(ColorSlot::Second);
        assert!(controller.is_open(ColorSlot::First));
        assert!(!controller.is_open(ColorSlot::Second));
        assert!(controller.is_open(ColorSlot::Third));
    }

    #[test]
    fn test_set_color_keeps_open_state() {
        let mut controller = ColorSelectionController::new();
        controller.toggle(ColorSlot::Third);
        let teal = HexColor::parse("#008080").unwrap();
        controller.set_color(ColorSlot::Third, teal);
        assert!(controller.is_open(ColorSlot::Third));
        assert_eq!(controller.colors()[2], teal);

        controller.set_color(ColorSlot::First, teal);
        assert!(!controller.is_open(ColorSlot::First));
    }

    #[test]
    fn test_interaction_outside_closes_only_that_slot() {
        let mut controller = ColorSelectionController::new();
        controller.toggle(ColorSlot::First);
        controller.toggle(ColorSlot::Second);

        controller.interaction_outside(ColorSlot::First);
        assert!(!controller.is_open(ColorSlot::First));
        assert!(controller.is_open(ColorSlot::Second));
    }

    #[test]
    fn test_pointer_interaction_hit_testing() {
        let mut controller = ColorSelectionController::new();
        controller.set_bounds(ColorSlot::First, Some(Bounds::new(0, 0, 10, 5)));
        controller.set_bounds(ColorSlot::Second, Some(Bounds::new(20, 0, 10, 5)));
        controller.toggle(ColorSlot::First);
        controller.toggle(ColorSlot::Second);

        // Inside the second picker: outside the first
        let closed = controller.pointer_interaction(25, 2);
        assert_eq!(closed, vec![ColorSlot::First]);
        assert!(!controller.is_open(ColorSlot::First));
        assert!(controller.is_open(ColorSlot::Second));

        // Outside everything
        let closed = controller.pointer_interaction(50, 50);
        assert_eq!(closed, vec![ColorSlot::Second]);
        assert!(controller.open_slots().is_empty());
    }

    #[test]
    fn test_pointer_interaction_without_bounds_keeps_open() {
        let mut controller = ColorSelectionController::new();
        controller.toggle(ColorSlot::Third);
        assert!(controller.pointer_interaction(3, 3).is_empty());
        assert!(controller.is_open(ColorSlot::Third));
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::new(2, 3, 4, 2);
        assert!(bounds.contains(2, 3));
        assert!(bounds.contains(5, 4));
        assert!(!bounds.contains(6, 4));
        assert!(!bounds.contains(5, 5));
        assert!(!bounds.contains(1, 3));
        assert!(!Bounds::new(0, 0, 0, 0).contains(0, 0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(2, 2, 3, 1);
        let b = Bounds::new(0, 3, 4, 6);
        assert_eq!(a.union(&b), Bounds::new(0, 2, 5, 7));
    }
}
