//! # Pianoroom Page
//!
//! Client-side controller of the piano room reservation page.
//!
//! ## Architecture
//!
//! - **Dom**: a shared-handle view-model of the page elements the widgets use
//! - **Api**: the backend seam (`ReservationApi`) and its `reqwest` implementation
//! - **Widgets**: countdown, time input sync, confirmation guard, availability,
//!   alerts and the admin server time probe, each bound to injected elements
//! - **Controller**: resolves elements once and wires the widgets
//! - **Config**: environment-driven client settings

/// Backend client and its trait seam
pub mod api;
/// Source of the current time
pub mod clock;
/// Environment configuration
pub mod config;
/// Widget wiring for a whole page
pub mod controller;
/// Page view-model
pub mod dom;
/// The individual page widgets
pub mod widgets;

pub use controller::{PageBindings, ReservationPageController};
