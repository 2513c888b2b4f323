//! HTTP-backed implementations of the `services` traits.

pub mod openweather;
pub mod supabase;
pub mod transit;
