//! Theme and Colors
//!
//! The wizard chrome palette, plus conversion of user-picked accent colors
//! into terminal colors.

use ratatui::style::Color;

use adwizard_core::HexColor;

// ============================================================================
// Wizard Chrome
// ============================================================================

/// Brand accent (headings, focused buttons)
pub const BRAND_VIOLET: Color = Color::Rgb(160, 120, 255);

/// Primary button background
pub const BUTTON_BG: Color = Color::Rgb(60, 60, 90);

/// Disabled button text
pub const BUTTON_DISABLED: Color = Color::Rgb(90, 90, 90);

/// Typed input
pub const INPUT_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Spinner while generating
pub const SPINNER_BLUE: Color = Color::Rgb(150, 180, 255);

/// Warning notifications
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 80);

/// Error notifications
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

// ============================================================================
// Ad Templates
// ============================================================================

/// Template canvas
pub const AD_CANVAS: Color = Color::Rgb(250, 248, 240);

/// Template headline
pub const AD_HEADLINE: Color = Color::Rgb(30, 30, 40);

/// Template body copy
pub const AD_BODY: Color = Color::Rgb(70, 70, 80);

/// CTA button face
pub const AD_CTA_BG: Color = Color::Rgb(230, 80, 60);

/// CTA button text
pub const AD_CTA_FG: Color = Color::Rgb(255, 255, 255);

/// Image placeholder frame and caption
pub const AD_IMAGE: Color = Color::Rgb(140, 140, 150);

// ============================================================================
// Accent Colors
// ============================================================================

/// Terminal color for a picked accent color
#[must_use]
pub fn accent(color: HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Black or white, whichever reads better on `background`
#[must_use]
pub fn text_on(background: HexColor) -> Color {
    let (r, g, b) = background.rgb();
    // ITU-R BT.601 luma
    let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    if luma > 128_000 {
        Color::Black
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_conversion() {
        assert_eq!(accent(HexColor::new(1, 2, 3)), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(text_on(HexColor::WHITE), Color::Black);
        assert_eq!(text_on(HexColor::new(0, 0, 0)), Color::White);
        assert_eq!(text_on(HexColor::new(0x20, 0x20, 0x80)), Color::White);
    }
}
