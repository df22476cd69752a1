//! Test Utilities
//!
//! A scripted [`ContentClient`] for exercising the orchestrator without a
//! network. Used by this crate's tests and by surfaces that want to drive the
//! wizard headlessly.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::client::{ContentClient, GenerationResult};
use crate::colors::HexColor;
use crate::session::PipelineStage;

/// One call received by a [`ScriptedClient`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    /// `request_title(seed)`
    Title(String),
    /// `request_description(seed)`
    Description(String),
    /// `request_cta(seed)`
    Cta(String),
    /// `request_image(title, description, colors)`
    Image {
        /// Title argument
        title: String,
        /// Description argument
        description: String,
        /// Colors argument
        colors: [HexColor; 3],
    },
}

impl RecordedCall {
    /// Stage this call belongs to
    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Title(_) => PipelineStage::Title,
            Self::Description(_) => PipelineStage::Description,
            Self::Cta(_) => PipelineStage::Cta,
            Self::Image { .. } => PipelineStage::Image,
        }
    }
}

/// Parks one stage until the test releases it
#[derive(Debug, Default)]
pub struct StageGate {
    entered: Notify,
    release: Notify,
}

impl StageGate {
    /// Wait until the gated stage has been called
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated stage return its scripted result
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Content client with scripted per-stage results
///
/// Each stage returns its queued one-shot results first, then its default.
/// Defaults are successful placeholder values.
pub struct ScriptedClient {
    defaults: Mutex<HashMap<PipelineStage, GenerationResult<String>>>,
    queued: Mutex<HashMap<PipelineStage, VecDeque<GenerationResult<String>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Mutex<Option<(PipelineStage, Arc<StageGate>)>>,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedClient {
    /// Client that succeeds at every stage
    #[must_use]
    pub fn new() -> Self {
        let defaults = HashMap::from([
            (
                PipelineStage::Title,
                GenerationResult::Ok("Scripted Title".to_string()),
            ),
            (
                PipelineStage::Description,
                GenerationResult::Ok("Scripted description copy".to_string()),
            ),
            (
                PipelineStage::Cta,
                GenerationResult::Ok("Buy Now".to_string()),
            ),
            (
                PipelineStage::Image,
                GenerationResult::Ok("https://images.test/scripted.png".to_string()),
            ),
        ]);
        Self {
            defaults: Mutex::new(defaults),
            queued: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    /// Set the default result for a stage
    #[must_use]
    pub fn with_result(self, stage: PipelineStage, result: GenerationResult<String>) -> Self {
        self.defaults.lock().insert(stage, result);
        self
    }

    /// Default title text
    #[must_use]
    pub fn with_title(self, text: &str) -> Self {
        self.with_result(PipelineStage::Title, GenerationResult::Ok(text.to_string()))
    }

    /// Default description text
    #[must_use]
    pub fn with_description(self, text: &str) -> Self {
        self.with_result(
            PipelineStage::Description,
            GenerationResult::Ok(text.to_string()),
        )
    }

    /// Default description result
    #[must_use]
    pub fn with_description_result(self, result: GenerationResult<String>) -> Self {
        self.with_result(PipelineStage::Description, result)
    }

    /// Default CTA text
    #[must_use]
    pub fn with_cta(self, text: &str) -> Self {
        self.with_result(PipelineStage::Cta, GenerationResult::Ok(text.to_string()))
    }

    /// Default image URL
    #[must_use]
    pub fn with_image(self, url: &str) -> Self {
        self.with_result(PipelineStage::Image, GenerationResult::Ok(url.to_string()))
    }

    /// Queue a one-shot result returned before the stage's default
    pub fn queue(&self, stage: PipelineStage, result: GenerationResult<String>) {
        self.queued.lock().entry(stage).or_default().push_back(result);
    }

    /// Park the next call to `stage` until the returned gate is released
    pub fn gate(&self, stage: PipelineStage) -> Arc<StageGate> {
        let gate = Arc::new(StageGate::default());
        *self.gate.lock() = Some((stage, Arc::clone(&gate)));
        gate
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Stages called so far, in order
    #[must_use]
    pub fn stages_called(&self) -> Vec<PipelineStage> {
        self.calls.lock().iter().map(RecordedCall::stage).collect()
    }

    async fn respond(&self, call: RecordedCall) -> GenerationResult<String> {
        let stage = call.stage();
        self.calls.lock().push(call);

        let gate = {
            let mut slot = self.gate.lock();
            match slot.as_ref() {
                Some((gated, _)) if *gated == stage => slot.take().map(|(_, gate)| gate),
                _ => None,
            }
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let queued = self
            .queued
            .lock()
            .get_mut(&stage)
            .and_then(VecDeque::pop_front);
        match queued {
            Some(result) => result,
            None => self
                .defaults
                .lock()
                .get(&stage)
                .cloned()
                .unwrap_or(GenerationResult::Failed(
                    crate::client::FailureReason::NoResults,
                )),
        }
    }
}

#[async_trait]
impl ContentClient for ScriptedClient {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn request_title(&self, seed: &str) -> GenerationResult<String> {
        self.respond(RecordedCall::Title(seed.to_string())).await
    }

    async fn request_description(&self, seed: &str) -> GenerationResult<String> {
        self.respond(RecordedCall::Description(seed.to_string()))
            .await
    }

    async fn request_cta(&self, seed: &str) -> GenerationResult<String> {
        self.respond(RecordedCall::Cta(seed.to_string())).await
    }

    async fn request_image(
        &self,
        title: &str,
        description: &str,
        colors: &[HexColor; 3],
    ) -> GenerationResult<String> {
        self.respond(RecordedCall::Image {
            title: title.to_string(),
            description: description.to_string(),
            colors: *colors,
        })
        .await
    }
}
