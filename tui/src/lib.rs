//! adwizard TUI - Terminal interface for the ad wizard
//!
//! A full-screen terminal surface for `adwizard-core`. It renders what the
//! orchestrator tells it and forwards keyboard and mouse input; the wizard's
//! rules live in the core.
//!
//! # Architecture
//!
//! - **App**: Event loop and the three step screens
//! - **WizardClient**: Embedded orchestrator plus its message channel
//! - **Display**: State derived from `WizardMessage`s
//! - **Templates**: `TemplateRenderer` producing ratatui buffers
//! - **Picker**: Accent color triggers and palette popups
//! - **Widgets**: Wrapped text blocks

pub mod app;
pub mod display;
pub mod picker;
pub mod templates;
pub mod theme;
pub mod widgets;
pub mod wizard_client;

pub use app::{Action, App};
pub use templates::TerminalTemplates;
pub use wizard_client::WizardClient;
