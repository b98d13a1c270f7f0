//! # priority-mixer-pulse
//!
//! PulseAudio backend for priority-mixer.
//!
//! Provides:
//! - `PulseBackend`: opens streams through the PulseAudio simple API
//! - `PulseCapture`: blocking recording stream
//! - `PulsePlayback`: blocking playback stream
//!
//! ## Platform Requirements
//! - Linux with a running PulseAudio (or pipewire-pulse) server
//! - `libpulse` and `libpulse-simple` development files for linking
//!
//! ## Usage
//! ```ignore
//! use priority_mixer_core::{MixSession, MixerConfiguration};
//! use priority_mixer_pulse::PulseBackend;
//!
//! let backend = PulseBackend::new(None);
//! let mut session = MixSession::open(&backend, MixerConfiguration::default())?;
//! session.run()?;
//! ```

#[cfg(target_os = "linux")]
pub mod pulse_backend;

#[cfg(target_os = "linux")]
pub use pulse_backend::{PulseBackend, PulseCapture, PulsePlayback};
