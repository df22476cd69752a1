//! adwizard Core - Headless Ad Generation Workflow
//!
//! This crate drives the three-step ad creation wizard: the user describes a
//! product, picks three accent colors, and the wizard asks a generative
//! service for a title, body copy, a call to action and an image, then shows
//! the result in one of several templates. It is independent of any UI
//! framework; surfaces render what it tells them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                           │
//! │   ┌─────────────┐   ┌──────────────────┐   ┌──────────────┐   │
//! │   │     TUI     │   │ TemplateRenderer │   │   Headless   │   │
//! │   │  (ratatui)  │   │  implementations │   │   / tests    │   │
//! │   └──────┬──────┘   └────────┬─────────┘   └──────┬───────┘   │
//! │          └───────────────────┴────────────────────┘           │
//! │              method calls (up)   WizardMessage (down)         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                        ADWIZARD CORE                          │
//! │  ┌───────────────────────────┴─────────────────────────────┐  │
//! │  │                 GenerationOrchestrator                   │  │
//! │  │  ┌──────────┐  ┌──────────────┐  ┌────────────────────┐ │  │
//! │  │  │ Session  │  │ Color        │  │ ContentClient      │ │  │
//! │  │  │ + Draft  │  │ Selection    │  │ (OpenAI over HTTP) │ │  │
//! │  │  └──────────┘  └──────────────┘  └────────────────────┘ │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use adwizard_core::{load_config, GenerationOrchestrator, OpenAiClient};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let client = OpenAiClient::new(config.service)?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let wizard = GenerationOrchestrator::new(client, tx);
//!
//!     wizard.advance();
//!     wizard.set_description("small-batch cold brew coffee");
//!     let report = wizard.generate().await?;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Apply to display state
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`orchestrator`]: Step machine and the generation pipeline
//! - [`session`]: Session state, steps, the ad draft
//! - [`client`]: Content client trait, prompts, HTTP implementation
//! - [`colors`]: Hex colors and the three accent pickers
//! - [`template`]: Template variants and the renderer seam
//! - [`text`]: Word limits and fallback literals
//! - [`messages`]: Messages from the orchestrator to surfaces
//! - [`config`]: TOML and environment configuration
//! - [`test_utils`]: Scripted content client for tests
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod colors;
pub mod config;
pub mod messages;
pub mod orchestrator;
pub mod session;
pub mod template;
pub mod test_utils;
pub mod text;

// Re-exports for convenience
pub use client::{ContentClient, FailureReason, GenerationResult, OpenAiClient};
pub use colors::{Bounds, ColorError, ColorPickerState, ColorSelectionController, ColorSlot, HexColor};
pub use messages::{NotifyLevel, WizardMessage};
pub use orchestrator::{
    GenerationOrchestrator, GenerationOutcome, GenerationReport, GenerationRun, OrchestratorError,
};
pub use session::{AdDraft, PipelineStage, Session, SessionId, Step};
pub use template::{TemplateRenderer, TemplateVariant};
pub use text::{limit_words, DEFAULT_CTA, DEFAULT_DESCRIPTION, DEFAULT_TITLE};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, AdWizardConfig,
    ConfigError, ConfigSource, ServiceConfig,
};
