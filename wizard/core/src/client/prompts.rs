//! Prompt Construction
//!
//! Every text prompt embeds the raw seed description. The image prompt is
//! different: it embeds the *generated* title and description plus the three
//! accent colors, which is why image generation runs last.

use crate::colors::HexColor;

/// Token budget for title completions
pub const TITLE_MAX_TOKENS: u32 = 100;

/// Token budget for description completions
pub const DESCRIPTION_MAX_TOKENS: u32 = 100;

/// Token budget for call-to-action completions
pub const CTA_MAX_TOKENS: u32 = 60;

/// Prompt for a catchy title (the service is asked for up to 6 words)
#[must_use]
pub fn title_prompt(seed: &str) -> String {
    format!("Create a catchy title up to 6 words for a {seed} ad featuring key features and benefits.")
}

/// Prompt for ad body copy
#[must_use]
pub fn description_prompt(seed: &str) -> String {
    format!(
        "Write a concise, engaging description suitable for a {seed} ad, focusing on unique features and benefits."
    )
}

/// Prompt for a call to action
#[must_use]
pub fn cta_prompt(seed: &str) -> String {
    format!(
        "Generate a compelling call to action for a {seed} ad that motivates customers to take immediate action."
    )
}

/// Human-readable rendering of the accent colors, e.g. `color #A1B2C3, color #FFFFFF, ...`
#[must_use]
pub fn color_description(colors: &[HexColor; 3]) -> String {
    colors
        .iter()
        .map(|color| format!("color {color}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt for the ad artwork
#[must_use]
pub fn image_prompt(title: &str, description: &str, colors: &[HexColor; 3]) -> String {
    format!(
        "Create a minimalist ad image with the colors: {}, and based on the title: '{title}' and the description: '{description}'",
        color_description(colors)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompts_embed_seed() {
        let seed = "vegan protein bar";
        for prompt in [title_prompt(seed), description_prompt(seed), cta_prompt(seed)] {
            assert!(prompt.contains("a vegan protein bar ad"), "{prompt}");
        }
        assert!(title_prompt(seed).contains("up to 6 words"));
    }

    #[test]
    fn test_image_prompt_embeds_colors_and_copy() {
        let colors = [
            HexColor::parse("#a1b2c3").unwrap(),
            HexColor::WHITE,
            HexColor::new(0, 0, 0),
        ];
        let prompt = image_prompt("Crunch Time", "Snack smarter today", &colors);
        assert_eq!(
            prompt,
            "Create a minimalist ad image with the colors: color #A1B2C3, color #FFFFFF, color #000000, \
             and based on the title: 'Crunch Time' and the description: 'Snack smarter today'"
        );
    }
}
