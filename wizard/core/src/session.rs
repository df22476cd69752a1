//! Wizard Session
//!
//! A session is the whole state of one wizard instance: where the user is in
//! the flow, the seed description, the draft being generated, the accent
//! colors and the chosen template. It lives in memory only and is discarded
//! with the surface that created it.
//!
//! # Generation Epochs
//!
//! Every reset bumps an epoch counter. A generation run remembers the epoch it
//! started in and its results are dropped if the session has been reset
//! since, so a late response can never overwrite a fresh draft.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::colors::ColorSelectionController;
use crate::template::TemplateVariant;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wizard position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Landing screen
    #[default]
    Welcome,
    /// Description and color entry, generation
    Input,
    /// Finished ad in a template
    Result,
}

impl Step {
    /// One step forward, saturating at `Result`
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Welcome => Self::Input,
            Self::Input | Self::Result => Self::Result,
        }
    }

    /// One step back, saturating at `Welcome`
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Welcome | Self::Input => Self::Welcome,
            Self::Result => Self::Input,
        }
    }

    /// Short description for status lines
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Input => "Describe your ad",
            Self::Result => "Your ad",
        }
    }
}

/// One of the four sequential generation calls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Catchy title
    Title,
    /// Body copy
    Description,
    /// Call to action
    Cta,
    /// Artwork
    Image,
}

impl PipelineStage {
    /// Stages in execution order
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Title,
        PipelineStage::Description,
        PipelineStage::Cta,
        PipelineStage::Image,
    ];
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Cta => "cta",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Generated ad fields; each starts empty and fills independently
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdDraft {
    /// Headline
    pub title: String,
    /// Body copy
    pub description: String,
    /// Call to action
    pub cta: String,
    /// Artwork URL, once generated
    pub image_url: Option<String>,
}

impl AdDraft {
    /// Value of one field (empty string for a missing image)
    #[must_use]
    pub fn field(&self, stage: PipelineStage) -> &str {
        match stage {
            PipelineStage::Title => &self.title,
            PipelineStage::Description => &self.description,
            PipelineStage::Cta => &self.cta,
            PipelineStage::Image => self.image_url.as_deref().unwrap_or(""),
        }
    }

    /// Overwrite one field
    pub fn set_field(&mut self, stage: PipelineStage, value: String) {
        match stage {
            PipelineStage::Title => self.title = value,
            PipelineStage::Description => self.description = value,
            PipelineStage::Cta => self.cta = value,
            PipelineStage::Image => self.image_url = Some(value),
        }
    }

    /// Whether an image URL has been stored
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Whether nothing has been generated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.cta.is_empty()
            && self.image_url.is_none()
    }
}

/// The state of one wizard instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: SessionId,
    step: Step,
    description: String,
    draft: AdDraft,
    colors: ColorSelectionController,
    is_generating: bool,
    selected_template: TemplateVariant,
    epoch: u64,
    attempts: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session at the welcome step
    #[must_use]
    pub fn new() -> Self {
        Self::with_template(TemplateVariant::default())
    }

    /// Fresh session with a preselected template
    #[must_use]
    pub fn with_template(selected_template: TemplateVariant) -> Self {
        Self {
            id: SessionId::new(),
            step: Step::Welcome,
            description: String::new(),
            draft: AdDraft::default(),
            colors: ColorSelectionController::new(),
            is_generating: false,
            selected_template,
            epoch: 0,
            attempts: 0,
        }
    }

    /// Current step
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Seed description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Draft, including partially filled fields while generating
    #[must_use]
    pub fn draft(&self) -> &AdDraft {
        &self.draft
    }

    /// Draft for template rendering; `None` while a generation is in flight
    #[must_use]
    pub fn renderable_draft(&self) -> Option<&AdDraft> {
        if self.is_generating {
            None
        } else {
            Some(&self.draft)
        }
    }

    /// Accent color pickers
    #[must_use]
    pub fn colors(&self) -> &ColorSelectionController {
        &self.colors
    }

    /// Accent color pickers (mutable)
    pub fn colors_mut(&mut self) -> &mut ColorSelectionController {
        &mut self.colors
    }

    /// Whether a generation is in flight
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// Selected template
    #[must_use]
    pub fn selected_template(&self) -> TemplateVariant {
        self.selected_template
    }

    /// Current generation epoch
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of generations started in this session
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Move forward one step
    pub fn advance(&mut self) -> Step {
        self.step = self.step.next();
        self.step
    }

    /// Move back one step (no-op at `Welcome`)
    pub fn retreat(&mut self) -> Step {
        self.step = self.step.previous();
        self.step
    }

    /// Whether the surface should offer "Next" from the input step
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Welcome => true,
            Step::Input => !self.is_generating && self.draft.has_image(),
            Step::Result => false,
        }
    }

    /// Replace the seed description verbatim
    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Change the template
    pub fn select_template(&mut self, variant: TemplateVariant) {
        self.selected_template = variant;
    }

    /// Clear description and draft and return to the input step
    ///
    /// Colors and the selected template are kept. An in-flight generation is
    /// not interrupted, but its results will no longer be stored.
    /// `is_generating` is left set until that run settles and its guard calls
    /// [`Session::finish_generation`].
    pub fn reset_for_regeneration(&mut self) {
        self.description.clear();
        self.draft = AdDraft::default();
        self.step = Step::Input;
        self.epoch += 1;
    }

    /// Mark a generation as started
    ///
    /// Returns the epoch the run belongs to and its attempt number, or `None`
    /// if a generation is already in flight. The previous run's draft is
    /// cleared so its fields never mix with the new run's.
    pub fn begin_generation(&mut self) -> Option<(u64, u64)> {
        if self.is_generating {
            return None;
        }
        self.draft = AdDraft::default();
        self.is_generating = true;
        self.attempts += 1;
        Some((self.epoch, self.attempts))
    }

    /// Mark the in-flight generation as settled
    pub fn finish_generation(&mut self) {
        self.is_generating = false;
    }

    /// Store a generated field if the run's epoch is still current
    ///
    /// Returns whether the value was stored.
    pub fn store(&mut self, epoch: u64, stage: PipelineStage, value: String) -> bool {
        if epoch != self.epoch {
            tracing::debug!(
                stage = %stage,
                run_epoch = epoch,
                current_epoch = self.epoch,
                "Discarding result from superseded generation"
            );
            return false;
        }
        self.draft.set_field(stage, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{ColorSlot, HexColor};

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert_eq!(session.step(), Step::Welcome);
        assert!(session.description().is_empty());
        assert!(session.draft().is_empty());
        assert!(!session.is_generating());
        assert_eq!(session.selected_template(), TemplateVariant::Instagram);
        assert_eq!(session.colors().colors(), [HexColor::WHITE; 3]);
    }

    #[test]
    fn test_step_transitions() {
        let mut session = Session::new();

        // Welcome has nothing before it
        assert_eq!(session.retreat(), Step::Welcome);

        assert_eq!(session.advance(), Step::Input);
        assert_eq!(session.retreat(), Step::Welcome);

        session.advance();
        assert_eq!(session.advance(), Step::Result);
        // Nothing past Result
        assert_eq!(session.advance(), Step::Result);
        assert_eq!(session.retreat(), Step::Input);
    }

    #[test]
    fn test_reset_routes_to_input_and_keeps_colors_and_template() {
        let mut session = Session::new();
        let orange = HexColor::parse("#FF8800").unwrap();
        session.colors_mut().set_color(ColorSlot::Second, orange);
        session.select_template(TemplateVariant::Story);
        session.set_description("artisan sourdough bakery");
        session.advance();
        session.advance();
        let epoch = session.epoch();
        for stage in PipelineStage::ALL {
            assert!(session.store(epoch, stage, format!("{stage} value")));
        }

        session.reset_for_regeneration();

        assert_eq!(session.step(), Step::Input);
        assert!(session.description().is_empty());
        assert!(session.draft().is_empty());
        assert_eq!(session.colors().colors()[1], orange);
        assert_eq!(session.selected_template(), TemplateVariant::Story);
    }

    #[test]
    fn test_begin_generation_rejects_reentry() {
        let mut session = Session::new();
        assert_eq!(session.begin_generation(), Some((0, 1)));
        assert!(session.is_generating());
        assert_eq!(session.begin_generation(), None);
        session.finish_generation();
        assert!(!session.is_generating());
        assert_eq!(session.begin_generation(), Some((0, 2)));
    }

    #[test]
    fn test_store_discards_superseded_epoch() {
        let mut session = Session::new();
        let (epoch, _) = session.begin_generation().unwrap();
        assert!(session.store(epoch, PipelineStage::Title, "Old".to_string()));

        session.reset_for_regeneration();
        assert!(!session.store(epoch, PipelineStage::Cta, "Stale".to_string()));
        assert!(session.draft().is_empty());
    }

    #[test]
    fn test_renderable_draft_hidden_while_generating() {
        let mut session = Session::new();
        assert!(session.renderable_draft().is_some());
        session.begin_generation();
        assert!(session.renderable_draft().is_none());
        session.finish_generation();
        assert!(session.renderable_draft().is_some());
    }

    #[test]
    fn test_can_advance_from_input_needs_image() {
        let mut session = Session::new();
        assert!(session.can_advance());
        session.advance();
        assert!(!session.can_advance());

        let (epoch, _) = session.begin_generation().unwrap();
        session.store(epoch, PipelineStage::Image, "https://img/1.png".to_string());
        assert!(!session.can_advance(), "still generating");
        session.finish_generation();
        assert!(session.can_advance());
    }

    #[test]
    fn test_begin_generation_clears_previous_draft() {
        let mut session = Session::new();
        session.advance();
        let (epoch, _) = session.begin_generation().unwrap();
        session.store(epoch, PipelineStage::Title, "First".to_string());
        session.store(epoch, PipelineStage::Image, "https://img/1.png".to_string());
        session.finish_generation();
        assert!(session.can_advance());

        session.begin_generation().unwrap();
        assert!(session.draft().is_empty());
        session.finish_generation();
        assert!(!session.can_advance());
    }

    #[test]
    fn test_draft_field_accessors() {
        let mut draft = AdDraft::default();
        assert_eq!(draft.field(PipelineStage::Image), "");
        draft.set_field(PipelineStage::Cta, "Buy".to_string());
        draft.set_field(PipelineStage::Image, "u".to_string());
        assert_eq!(draft.field(PipelineStage::Cta), "Buy");
        assert_eq!(draft.image_url.as_deref(), Some("u"));
        assert!(!draft.is_empty());
    }
}
