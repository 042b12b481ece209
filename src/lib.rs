//! Vidither - retro palette dithering for video
//!
//! Upload a video, pick a palette and a dither intensity, download the same
//! video recolored to that palette with Floyd-Steinberg error diffusion.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
