//! Implementations of the [`ImageGenerator`](crate::ports::ImageGenerator) port.
//!
//! `live` calls Gemini, `recording` wraps it and writes a cassette, and
//! `replaying` serves a cassette back without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
