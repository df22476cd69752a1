//! Terminal Ad Templates
//!
//! Renders a finished [`AdDraft`] into a ratatui [`Buffer`] in one of the
//! three layouts. Rendering is a pure function of the variant and the draft;
//! the caller decides where the buffer lands on screen.
//!
//! ```text
//!  Instagram (square)     Twitter (wide)                 Story (tall)
//! ┌──────────────┐      ┌─────────┬──────────────────┐  ┌────────┐
//! │    image     │      │  image  │ title            │  │ image  │
//! ├──────────────┤      │         │ description      │  │        │
//! │ title        │      │         │ [ cta ]          │  │ title  │
//! │ description  │      └─────────┴──────────────────┘  │ desc   │
//! │   [ cta ]    │                                      │        │
//! └──────────────┘                                      │ [ cta ]│
//!                                                       └────────┘
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use adwizard_core::{AdDraft, TemplateRenderer, TemplateVariant};

use crate::theme::{AD_BODY, AD_CANVAS, AD_CTA_BG, AD_CTA_FG, AD_HEADLINE, AD_IMAGE};
use crate::widgets::TextBlock;

/// Terminal cell size of each template
///
/// Roughly the reference pixel aspect ratio with cells about twice as tall
/// as they are wide.
#[must_use]
pub const fn cell_size(variant: TemplateVariant) -> (u16, u16) {
    match variant {
        TemplateVariant::Instagram => (40, 20),
        TemplateVariant::Twitter => (72, 12),
        TemplateVariant::Story => (28, 24),
    }
}

/// Renders ads as terminal cells
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalTemplates;

impl TemplateRenderer for TerminalTemplates {
    type Output = Buffer;

    fn render(&self, variant: TemplateVariant, ad: &AdDraft) -> Buffer {
        let (width, height) = cell_size(variant);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);

        let frame = Block::bordered()
            .title(format!(" {} ", variant.label()))
            .style(Style::default().bg(AD_CANVAS).fg(AD_BODY));
        let inner = frame.inner(area);
        frame.render(area, &mut buf);

        match variant {
            TemplateVariant::Instagram => {
                let [image, copy] =
                    Layout::vertical([Constraint::Percentage(45), Constraint::Min(0)]).areas(inner);
                render_image(ad, image, &mut buf);
                render_copy(ad, copy, &mut buf);
            }
            TemplateVariant::Twitter => {
                let [image, copy] =
                    Layout::horizontal([Constraint::Length(24), Constraint::Min(0)]).areas(inner);
                render_image(ad, image, &mut buf);
                render_copy(ad, copy, &mut buf);
            }
            TemplateVariant::Story => {
                let [image, copy] =
                    Layout::vertical([Constraint::Percentage(40), Constraint::Min(0)]).areas(inner);
                render_image(ad, image, &mut buf);
                render_copy(ad, copy, &mut buf);
            }
        }

        buf
    }
}

fn render_image(ad: &AdDraft, area: Rect, buf: &mut Buffer) {
    let frame = Block::bordered()
        .title(" image ")
        .style(Style::default().fg(AD_IMAGE));
    let inner = frame.inner(area);
    frame.render(area, buf);

    let caption = ad.image_url.as_deref().unwrap_or("no image");
    TextBlock::new(caption)
        .style(Style::default().fg(AD_IMAGE).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .render(inner, buf);
}

/// Title, description and the CTA button, stacked and centred
fn render_copy(ad: &AdDraft, area: Rect, buf: &mut Buffer) {
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    let [_, title, _, description, cta] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    TextBlock::new(&ad.title)
        .style(
            Style::default()
                .fg(AD_HEADLINE)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .render(title, buf);

    TextBlock::new(&ad.description)
        .style(Style::default().fg(AD_BODY))
        .alignment(Alignment::Center)
        .render(description, buf);

    if !ad.cta.is_empty() {
        let label = format!(" {} ", ad.cta);
        TextBlock::new(&label)
            .style(
                Style::default()
                    .fg(AD_CTA_FG)
                    .bg(AD_CTA_BG)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .render(cta, buf);
    }
}
