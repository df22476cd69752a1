//! Wizard Client
//!
//! Thin wrapper around the orchestrator for TUI integration. The orchestrator
//! is embedded directly (no network between surface and core).
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All decisions happen in the orchestrator. The TUI's job is:
//! 1. Convert terminal events to orchestrator calls
//! 2. Receive `WizardMessage`s
//! 3. Render display state based on messages

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use adwizard_core::{
    AdWizardConfig, Bounds, ColorSlot, ContentClient, GenerationOrchestrator, GenerationReport,
    HexColor, OpenAiClient, OrchestratorError, Session, Step, TemplateVariant, WizardMessage,
};

/// Channel capacity for orchestrator messages
const MESSAGE_CAPACITY: usize = 100;

/// Client for the embedded orchestrator
pub struct WizardClient<C: ContentClient + 'static> {
    orchestrator: GenerationOrchestrator<C>,
    rx: mpsc::Receiver<WizardMessage>,
}

impl WizardClient<OpenAiClient> {
    /// Build an HTTP-backed client from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AdWizardConfig) -> anyhow::Result<Self> {
        let client = OpenAiClient::new(config.service.clone())?;
        Ok(Self::new(client, config.template))
    }
}

impl<C: ContentClient + 'static> WizardClient<C> {
    /// Wrap a content client in a fresh session
    pub fn new(client: C, template: TemplateVariant) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CAPACITY);
        let orchestrator =
            GenerationOrchestrator::with_session(client, Session::with_template(template), tx);
        Self { orchestrator, rx }
    }

    /// The embedded orchestrator
    pub fn orchestrator(&self) -> &GenerationOrchestrator<C> {
        &self.orchestrator
    }

    /// Start a generation in the background
    ///
    /// `is_generating` is already set when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::AlreadyGenerating`] if one is in flight.
    pub fn generate(&self) -> Result<JoinHandle<GenerationReport>, OrchestratorError> {
        let run = self.orchestrator.start_generation()?;
        Ok(tokio::spawn(run.execute()))
    }

    /// Receive all pending messages (non-blocking)
    pub fn recv_all(&mut self) -> Vec<WizardMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current step
    pub fn step(&self) -> Step {
        self.orchestrator.step()
    }

    /// Whether a generation is in flight
    pub fn is_generating(&self) -> bool {
        self.orchestrator.is_generating()
    }

    /// Whether "Next" is available
    pub fn can_advance(&self) -> bool {
        self.orchestrator.can_advance()
    }

    /// Whether a picker is open
    pub fn is_picker_open(&self, slot: ColorSlot) -> bool {
        self.orchestrator.snapshot().colors().is_open(slot)
    }

    /// Move forward one step
    pub fn advance(&self) -> Step {
        self.orchestrator.advance()
    }

    /// Move back one step
    pub fn retreat(&self) -> Step {
        self.orchestrator.retreat()
    }

    /// Replace the seed description
    pub fn set_description(&self, text: &str) {
        self.orchestrator.set_description(text);
    }

    /// "Generate Again": clear the draft and return to input
    pub fn regenerate(&self) {
        self.orchestrator.reset_for_regeneration();
    }

    /// Change the template
    pub fn select_template(&self, variant: TemplateVariant) {
        self.orchestrator.select_template(variant);
    }

    /// Flip a picker
    pub fn toggle_picker(&self, slot: ColorSlot) -> bool {
        self.orchestrator.toggle_picker(slot)
    }

    /// Set an accent color
    pub fn set_color(&self, slot: ColorSlot, color: HexColor) {
        self.orchestrator.set_color(slot, color);
    }

    /// Report where a picker is drawn
    pub fn set_picker_bounds(&self, slot: ColorSlot, bounds: Option<Bounds>) {
        self.orchestrator.set_picker_bounds(slot, bounds);
    }

    /// Forward a pointer interaction
    pub fn pointer_interaction(&self, x: u16, y: u16) -> Vec<ColorSlot> {
        self.orchestrator.pointer_interaction(x, y)
    }

    /// Close a picker from outside (keyboard dismissal)
    pub fn interaction_outside(&self, slot: ColorSlot) {
        self.orchestrator.interaction_outside(slot);
    }
}
