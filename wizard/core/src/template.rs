//! Ad Templates
//!
//! The core does not draw anything. It exposes the finished draft and the
//! selected [`TemplateVariant`]; a surface implements [`TemplateRenderer`]
//! to turn them into pixels, cells, or markup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::AdDraft;

/// Layout variant for a finished ad
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    /// Square social post
    #[default]
    Instagram,
    /// Wide banner/header
    Twitter,
    /// Tall vertical story
    Story,
}

impl TemplateVariant {
    /// All variants in selector order
    pub const ALL: [TemplateVariant; 3] = [
        TemplateVariant::Instagram,
        TemplateVariant::Twitter,
        TemplateVariant::Story,
    ];

    /// Human-readable name for selectors
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram Post",
            Self::Twitter => "Twitter Header",
            Self::Story => "Story",
        }
    }

    /// Identifier used in config files and the environment
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Story => "story",
        }
    }

    /// Reference size in pixels (width, height)
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Instagram => (500, 500),
            Self::Twitter => (1500, 500),
            Self::Story => (270, 480),
        }
    }

    /// Next variant in selector order (wraps)
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Instagram => Self::Twitter,
            Self::Twitter => Self::Story,
            Self::Story => Self::Instagram,
        }
    }

    /// Previous variant in selector order (wraps)
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Instagram => Self::Story,
            Self::Twitter => Self::Instagram,
            Self::Story => Self::Twitter,
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TemplateVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" => Ok(Self::Instagram),
            "twitter" => Ok(Self::Twitter),
            "story" => Ok(Self::Story),
            other => Err(format!(
                "unknown template '{other}' (expected instagram, twitter or story)"
            )),
        }
    }
}

/// Renders a finished draft in one of the template layouts
///
/// Implementations are pure: the same draft and variant always produce the
/// same output, and nothing flows back into the core.
pub trait TemplateRenderer {
    /// What rendering produces (a buffer, a string, a widget...)
    type Output;

    /// Render `ad` using `variant`
    fn render(&self, variant: TemplateVariant, ad: &AdDraft) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_cycle() {
        for variant in TemplateVariant::ALL {
            assert_eq!(variant.next().previous(), variant);
        }
        assert_eq!(
            TemplateVariant::Story.next(),
            TemplateVariant::Instagram
        );
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("twitter".parse(), Ok(TemplateVariant::Twitter));
        assert_eq!(" Story ".parse(), Ok(TemplateVariant::Story));
        assert!("billboard".parse::<TemplateVariant>().is_err());
        for variant in TemplateVariant::ALL {
            assert_eq!(variant.key().parse(), Ok(variant));
        }
    }

    #[test]
    fn test_variant_shapes() {
        let (w, h) = TemplateVariant::Instagram.dimensions();
        assert_eq!(w, h);
        let (w, h) = TemplateVariant::Twitter.dimensions();
        assert!(w > h);
        let (w, h) = TemplateVariant::Story.dimensions();
        assert!(h > w);
    }

    #[test]
    fn test_variant_serde_names() {
        let json = serde_json::to_string(&TemplateVariant::Instagram).unwrap();
        assert_eq!(json, "\"instagram\"");
    }

    struct PlainText;

    impl TemplateRenderer for PlainText {
        type Output = String;

        fn render(&self, variant: TemplateVariant, ad: &AdDraft) -> String {
            format!("[{}] {} | {} | {}", variant.label(), ad.title, ad.description, ad.cta)
        }
    }

    #[test]
    fn test_renderer_is_pure() {
        let ad = AdDraft {
            title: "Cold Brew".to_string(),
            description: "Smooth all day".to_string(),
            cta: "Order now".to_string(),
            image_url: Some("https://img.example/1.png".to_string()),
        };
        let first = PlainText.render(TemplateVariant::Story, &ad);
        assert_eq!(first, PlainText.render(TemplateVariant::Story, &ad));
        assert_eq!(first, "[Story] Cold Brew | Smooth all day | Order now");
    }
}
