//! Display State
//!
//! What the TUI knows about the wizard, derived only from the
//! [`WizardMessage`]s the orchestrator sends. Rendering reads this; it never
//! decides anything on its own.

use std::time::Duration;

use adwizard_core::{
    AdDraft, HexColor, NotifyLevel, PipelineStage, Step, TemplateVariant, WizardMessage,
};

/// Spinner glyphs shown while generating
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// How often the spinner advances
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

/// How long a notification stays on the status line
const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

/// A status-line notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotification {
    /// Severity
    pub level: NotifyLevel,
    /// Text
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// Display state for rendering
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Current wizard step
    pub step: Step,
    /// Whether a generation is in flight
    pub generating: bool,
    /// Attempt number of the latest generation
    pub attempt: u64,
    /// Draft as far as it has been filled
    pub draft: AdDraft,
    /// Selected template
    pub template: TemplateVariant,
    /// Accent colors
    pub colors: [HexColor; 3],
    /// Latest notification, until it expires
    pub notification: Option<DisplayNotification>,
    /// Spinner frame index
    pub spinner_frame: usize,
    spinner_elapsed: Duration,
}

impl DisplayState {
    /// Initial display state
    pub fn new(template: TemplateVariant) -> Self {
        Self {
            step: Step::Welcome,
            generating: false,
            attempt: 0,
            draft: AdDraft::default(),
            template,
            colors: [HexColor::WHITE; 3],
            notification: None,
            spinner_frame: 0,
            spinner_elapsed: Duration::ZERO,
        }
    }

    /// Apply a message from the orchestrator
    pub fn apply_message(&mut self, msg: WizardMessage) {
        match msg {
            WizardMessage::StepChanged { step } => {
                self.step = step;
            }
            WizardMessage::GenerationStarted { attempt } => {
                self.generating = true;
                self.draft = AdDraft::default();
                self.attempt = attempt;
                self.spinner_frame = 0;
                self.spinner_elapsed = Duration::ZERO;
                self.notification = None;
            }
            WizardMessage::DraftUpdated { stage, value } => {
                self.draft.set_field(stage, value);
            }
            WizardMessage::GenerationSettled { attempt, completed } => {
                if attempt == self.attempt {
                    self.generating = false;
                }
                if completed && self.draft.has_image() {
                    self.notify(NotifyLevel::Info, "Your ad is ready");
                }
            }
            WizardMessage::DraftCleared => {
                self.draft = AdDraft::default();
            }
            WizardMessage::TemplateSelected { variant } => {
                self.template = variant;
            }
            WizardMessage::ColorChanged { slot, color } => {
                self.colors[slot.index()] = color;
            }
            WizardMessage::Notify { level, message } => {
                self.notify(level, message);
            }
        }
    }

    /// Advance timers
    pub fn update(&mut self, delta: Duration) {
        if self.generating {
            self.spinner_elapsed += delta;
            while self.spinner_elapsed >= SPINNER_INTERVAL {
                self.spinner_elapsed -= SPINNER_INTERVAL;
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            }
        }

        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Current spinner glyph
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Draft for the template preview; `None` while generating
    pub fn renderable_draft(&self) -> Option<&AdDraft> {
        if self.generating {
            None
        } else {
            Some(&self.draft)
        }
    }

    /// Which stages have a value so far
    pub fn filled_stages(&self) -> Vec<PipelineStage> {
        PipelineStage::ALL
            .into_iter()
            .filter(|stage| !self.draft.field(*stage).is_empty())
            .collect()
    }

    fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        self.notification = Some(DisplayNotification {
            level,
            message: message.into(),
            remaining: NOTIFICATION_TTL,
        });
    }
}
