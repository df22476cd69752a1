//! Wizard Messages
//!
//! Messages sent from the orchestrator to the surface driving it. Surfaces
//! are renderers: they apply these messages to their display state and read
//! the session snapshot, but make no decisions of their own.

use serde::{Deserialize, Serialize};

use crate::colors::{ColorSlot, HexColor};
use crate::session::{PipelineStage, Step};
use crate::template::TemplateVariant;

/// Messages from the orchestrator to a surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardMessage {
    /// The wizard moved to a different step
    StepChanged {
        /// New step
        step: Step,
    },

    /// A generation run started; the loading indicator should show
    GenerationStarted {
        /// 1-based attempt number within the session
        attempt: u64,
    },

    /// One draft field was filled
    DraftUpdated {
        /// Which field
        stage: PipelineStage,
        /// Stored value
        value: String,
    },

    /// The in-flight generation settled; the loading indicator should clear
    GenerationSettled {
        /// Attempt number from `GenerationStarted`
        attempt: u64,
        /// Whether the run finished every stage
        completed: bool,
    },

    /// Description and draft were cleared for another round
    DraftCleared,

    /// A different template was selected
    TemplateSelected {
        /// New template
        variant: TemplateVariant,
    },

    /// An accent color changed
    ColorChanged {
        /// Slot that changed
        slot: ColorSlot,
        /// New color
        color: HexColor,
    },

    /// Something the user should know about
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Human-readable text
        message: String,
    },
}

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Something degraded but the flow continues
    Warning,
    /// Something failed
    Error,
}
