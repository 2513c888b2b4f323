mod client;

pub use client::PostgrestStore;
