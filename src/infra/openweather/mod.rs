mod client;

pub use client::OpenWeatherSource;
