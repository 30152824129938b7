pub mod availability;
pub mod server_time;
pub mod time_slot;
