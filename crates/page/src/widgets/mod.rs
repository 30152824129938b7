//! The independent widgets bound by the page controller.
//!
//! Every widget is handed the elements it works on; none of them looks
//! anything up in the document on its own.

pub mod alert;
pub mod availability;
pub mod confirm;
pub mod countdown;
pub mod server_time;
pub mod time_input;
