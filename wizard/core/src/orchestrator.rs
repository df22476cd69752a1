//! Generation Orchestrator
//!
//! Owns the wizard [`Session`] and runs the four-stage generation pipeline
//! against a [`ContentClient`].
//!
//! # Pipeline
//!
//! ```text
//! seed ──► title ──► description ──► cta ──► image(title, description, colors)
//!          (≤5 words) (≤20 words)    (verbatim)
//! ```
//!
//! Stages run strictly one after another. A non-fatal failure stores the
//! field's fallback literal and moves on; a fatal one (transport or decoding
//! fault) aborts the remaining stages. Either way `is_generating` is cleared
//! when the run settles, including when the run future is dropped.
//!
//! # Threading
//!
//! The orchestrator is a cheap handle: clones share the client, the session
//! and the outbound message channel. The session lock is only taken for short
//! synchronous sections and never held across an `.await`.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::client::{ContentClient, FailureReason, GenerationResult};
use crate::colors::{Bounds, ColorSlot, HexColor};
use crate::messages::{NotifyLevel, WizardMessage};
use crate::session::{AdDraft, PipelineStage, Session, Step};
use crate::template::TemplateVariant;
use crate::text::{
    limit_words, usable_text, DEFAULT_CTA, DEFAULT_DESCRIPTION, DEFAULT_TITLE,
    DESCRIPTION_WORD_LIMIT, TITLE_WORD_LIMIT,
};

/// Errors returned by orchestrator entry points
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// A generation is already in flight for this session
    #[error("a generation is already in progress")]
    AlreadyGenerating,
}

/// How a generation run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Every stage ran
    Completed {
        /// Whether an image URL was stored
        image_stored: bool,
    },
    /// A fatal failure stopped the run; later stages never ran
    Aborted {
        /// Stage that failed
        stage: PipelineStage,
        /// Why it failed
        reason: FailureReason,
    },
    /// The session was reset mid-run; remaining results were discarded
    Superseded,
}

/// Summary of one generation run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// 1-based attempt number within the session
    pub attempt: u64,
    /// How the run ended
    pub outcome: GenerationOutcome,
    /// Stages whose fallback literal was stored
    pub fallbacks: Vec<PipelineStage>,
}

impl GenerationReport {
    /// Whether every stage ran
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Completed { .. })
    }
}

/// Drives one wizard session
pub struct GenerationOrchestrator<C: ContentClient> {
    client: Arc<C>,
    session: Arc<Mutex<Session>>,
    tx: mpsc::Sender<WizardMessage>,
}

impl<C: ContentClient> Clone for GenerationOrchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            session: Arc::clone(&self.session),
            tx: self.tx.clone(),
        }
    }
}

impl<C: ContentClient + 'static> GenerationOrchestrator<C> {
    /// Create an orchestrator for a fresh session
    pub fn new(client: C, tx: mpsc::Sender<WizardMessage>) -> Self {
        Self::with_session(client, Session::new(), tx)
    }

    /// Create an orchestrator around an existing session
    pub fn with_session(client: C, session: Session, tx: mpsc::Sender<WizardMessage>) -> Self {
        tracing::debug!(session_id = %session.id, client = client.name(), "Wizard session created");
        Self {
            client: Arc::new(client),
            session: Arc::new(Mutex::new(session)),
            tx,
        }
    }

    /// The content client
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Copy of the whole session
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Current step
    #[must_use]
    pub fn step(&self) -> Step {
        self.session.lock().step()
    }

    /// Whether a generation is in flight
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.session.lock().is_generating()
    }

    /// Draft including fields filled so far
    #[must_use]
    pub fn draft(&self) -> AdDraft {
        self.session.lock().draft().clone()
    }

    /// Draft for template rendering; `None` while generating
    #[must_use]
    pub fn renderable_draft(&self) -> Option<AdDraft> {
        self.session.lock().renderable_draft().cloned()
    }

    /// Whether "Next" should be offered
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.session.lock().can_advance()
    }

    // ========================================================================
    // Step machine
    // ========================================================================

    /// Move forward one step
    pub fn advance(&self) -> Step {
        self.move_step(Session::advance)
    }

    /// Move back one step (no-op at `Welcome`)
    pub fn retreat(&self) -> Step {
        self.move_step(Session::retreat)
    }

    /// Apply a step transition; surfaces only hear about actual changes
    fn move_step(&self, transition: fn(&mut Session) -> Step) -> Step {
        let (before, step) = {
            let mut session = self.session.lock();
            let before = session.step();
            (before, transition(&mut *session))
        };
        if step != before {
            self.send(WizardMessage::StepChanged { step });
        }
        step
    }

    /// Replace the seed description
    pub fn set_description(&self, text: impl Into<String>) {
        self.session.lock().set_description(text);
    }

    /// Clear description and draft and go back to the input step
    pub fn reset_for_regeneration(&self) {
        let step = {
            let mut session = self.session.lock();
            session.reset_for_regeneration();
            session.step()
        };
        tracing::info!("Draft cleared for regeneration");
        self.send(WizardMessage::DraftCleared);
        self.send(WizardMessage::StepChanged { step });
    }

    /// Change the template
    pub fn select_template(&self, variant: TemplateVariant) {
        self.session.lock().select_template(variant);
        self.send(WizardMessage::TemplateSelected { variant });
    }

    // ========================================================================
    // Color pickers
    // ========================================================================

    /// Flip a picker open or closed; returns the new open state
    pub fn toggle_picker(&self, slot: ColorSlot) -> bool {
        self.session.lock().colors_mut().toggle(slot)
    }

    /// Set an accent color (the picker stays as it is)
    pub fn set_color(&self, slot: ColorSlot, color: HexColor) {
        self.session.lock().colors_mut().set_color(slot, color);
        self.send(WizardMessage::ColorChanged { slot, color });
    }

    /// Register where a picker is rendered
    pub fn set_picker_bounds(&self, slot: ColorSlot, bounds: Option<Bounds>) {
        self.session.lock().colors_mut().set_bounds(slot, bounds);
    }

    /// A pointer interaction at `(x, y)`; returns the pickers it closed
    pub fn pointer_interaction(&self, x: u16, y: u16) -> Vec<ColorSlot> {
        self.session.lock().colors_mut().pointer_interaction(x, y)
    }

    /// An interaction known to be outside one picker
    pub fn interaction_outside(&self, slot: ColorSlot) {
        self.session.lock().colors_mut().interaction_outside(slot);
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Run the whole pipeline
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::AlreadyGenerating`] if a run is in flight.
    pub async fn generate(&self) -> Result<GenerationReport, OrchestratorError> {
        Ok(self.start_generation()?.execute().await)
    }

    /// Mark a generation as started and return the run to execute
    ///
    /// `is_generating` is set before this returns, so a surface can show its
    /// loading state before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::AlreadyGenerating`] if a run is in flight.
    pub fn start_generation(&self) -> Result<GenerationRun<C>, OrchestratorError> {
        let (epoch, attempt, seed, colors) = {
            let mut session = self.session.lock();
            let Some((epoch, attempt)) = session.begin_generation() else {
                tracing::warn!("Generation requested while another is in flight");
                return Err(OrchestratorError::AlreadyGenerating);
            };
            (
                epoch,
                attempt,
                session.description().to_string(),
                session.colors().colors(),
            )
        };

        tracing::info!(attempt, seed_len = seed.len(), "Generation started");
        self.send(WizardMessage::GenerationStarted { attempt });

        Ok(GenerationRun {
            guard: GeneratingGuard {
                session: Arc::clone(&self.session),
                tx: self.tx.clone(),
                attempt,
                completed: None,
            },
            orchestrator: self.clone(),
            epoch,
            attempt,
            seed,
            colors,
        })
    }

    fn send(&self, msg: WizardMessage) {
        send_message(&self.tx, msg);
    }

    fn notify(&self, level: NotifyLevel, message: impl Into<String>) {
        self.send(WizardMessage::Notify {
            level,
            message: message.into(),
        });
    }

    /// Store a field for the run's epoch; `false` if the session moved on
    fn store(&self, epoch: u64, stage: PipelineStage, value: String) -> bool {
        let stored = self.session.lock().store(epoch, stage, value.clone());
        if stored {
            self.send(WizardMessage::DraftUpdated { stage, value });
        }
        stored
    }
}

/// A started generation, ready to execute
///
/// Dropping it (or the future returned by [`GenerationRun::execute`]) before
/// completion still clears `is_generating`.
pub struct GenerationRun<C: ContentClient> {
    orchestrator: GenerationOrchestrator<C>,
    guard: GeneratingGuard,
    epoch: u64,
    attempt: u64,
    seed: String,
    colors: [HexColor; 3],
}

impl<C: ContentClient + 'static> GenerationRun<C> {
    /// Attempt number of this run
    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Run every stage in order
    pub async fn execute(self) -> GenerationReport {
        let Self {
            orchestrator,
            guard,
            epoch,
            attempt,
            seed,
            colors,
        } = self;

        let mut fallbacks = Vec::new();
        let outcome = orchestrator
            .run_pipeline(epoch, &seed, &colors, &mut fallbacks)
            .await;

        match &outcome {
            GenerationOutcome::Completed { image_stored } => {
                tracing::info!(attempt, image_stored, ?fallbacks, "Generation completed");
                if !image_stored {
                    orchestrator.notify(NotifyLevel::Warning, "No image was generated");
                }
            }
            GenerationOutcome::Aborted { stage, reason } => {
                tracing::error!(attempt, %stage, %reason, "Generation aborted");
                orchestrator.notify(
                    NotifyLevel::Error,
                    format!("Generation failed at {stage}: {reason}"),
                );
            }
            GenerationOutcome::Superseded => {
                tracing::info!(attempt, "Generation superseded by reset");
            }
        }

        guard.settle(matches!(outcome, GenerationOutcome::Completed { .. }));

        GenerationReport {
            attempt,
            outcome,
            fallbacks,
        }
    }
}

impl<C: ContentClient + 'static> GenerationOrchestrator<C> {
    async fn run_pipeline(
        &self,
        epoch: u64,
        seed: &str,
        colors: &[HexColor; 3],
        fallbacks: &mut Vec<PipelineStage>,
    ) -> GenerationOutcome {
        let title_result = self.client.request_title(seed).await;
        let title = match resolve_text(
            PipelineStage::Title,
            title_result,
            Some(TITLE_WORD_LIMIT),
            DEFAULT_TITLE,
            fallbacks,
        ) {
            Ok(title) => title,
            Err(reason) => return aborted(PipelineStage::Title, reason),
        };
        if !self.store(epoch, PipelineStage::Title, title.clone()) {
            return GenerationOutcome::Superseded;
        }

        let description_result = self.client.request_description(seed).await;
        let description = match resolve_text(
            PipelineStage::Description,
            description_result,
            Some(DESCRIPTION_WORD_LIMIT),
            DEFAULT_DESCRIPTION,
            fallbacks,
        ) {
            Ok(description) => description,
            Err(reason) => return aborted(PipelineStage::Description, reason),
        };
        if !self.store(epoch, PipelineStage::Description, description.clone()) {
            return GenerationOutcome::Superseded;
        }

        let cta_result = self.client.request_cta(seed).await;
        let cta = match resolve_text(PipelineStage::Cta, cta_result, None, DEFAULT_CTA, fallbacks)
        {
            Ok(cta) => cta,
            Err(reason) => return aborted(PipelineStage::Cta, reason),
        };
        if !self.store(epoch, PipelineStage::Cta, cta) {
            return GenerationOutcome::Superseded;
        }

        match self
            .client
            .request_image(&title, &description, colors)
            .await
        {
            GenerationResult::Ok(url) => {
                if self.store(epoch, PipelineStage::Image, url) {
                    GenerationOutcome::Completed { image_stored: true }
                } else {
                    GenerationOutcome::Superseded
                }
            }
            GenerationResult::Failed(reason) if reason.is_fatal() => {
                aborted(PipelineStage::Image, reason)
            }
            GenerationResult::Failed(reason) => {
                tracing::warn!(%reason, "No image stored");
                GenerationOutcome::Completed {
                    image_stored: false,
                }
            }
        }
    }
}

fn aborted(stage: PipelineStage, reason: FailureReason) -> GenerationOutcome {
    GenerationOutcome::Aborted { stage, reason }
}

/// Turn a text result into the value to store
///
/// Usable text is word-limited; a non-fatal failure or blank text yields the
/// fallback literal. A fatal failure is passed back up.
fn resolve_text(
    stage: PipelineStage,
    result: GenerationResult<String>,
    word_limit: Option<usize>,
    fallback: &str,
    fallbacks: &mut Vec<PipelineStage>,
) -> Result<String, FailureReason> {
    match result {
        GenerationResult::Ok(text) => match usable_text(&text) {
            Some(text) => Ok(match word_limit {
                Some(limit) => limit_words(text, limit),
                None => text.to_string(),
            }),
            None => {
                tracing::warn!(%stage, "Service returned blank text, using fallback");
                fallbacks.push(stage);
                Ok(fallback.to_string())
            }
        },
        GenerationResult::Failed(reason) if reason.is_fatal() => Err(reason),
        GenerationResult::Failed(reason) => {
            tracing::warn!(%stage, %reason, "Using fallback");
            fallbacks.push(stage);
            Ok(fallback.to_string())
        }
    }
}

/// Clears `is_generating` and reports the settle when dropped
struct GeneratingGuard {
    session: Arc<Mutex<Session>>,
    tx: mpsc::Sender<WizardMessage>,
    attempt: u64,
    completed: Option<bool>,
}

impl GeneratingGuard {
    fn settle(mut self, completed: bool) {
        self.completed = Some(completed);
    }
}

impl Drop for GeneratingGuard {
    fn drop(&mut self) {
        self.session.lock().finish_generation();
        let completed = match self.completed {
            Some(completed) => completed,
            None => {
                tracing::warn!(attempt = self.attempt, "Generation dropped before it settled");
                false
            }
        };
        send_message(
            &self.tx,
            WizardMessage::GenerationSettled {
                attempt: self.attempt,
                completed,
            },
        );
    }
}

fn send_message(tx: &mpsc::Sender<WizardMessage>, msg: WizardMessage) {
    if let Err(e) = tx.try_send(msg) {
        tracing::warn!("Failed to send message to surface: {}", e);
    }
}
