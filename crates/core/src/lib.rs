//! # Pianoroom Core
//!
//! Wire models, errors and pure formatting helpers shared by the reservation
//! page client and its command-line host.

pub mod errors;
pub mod models;
pub mod time_format;
