//! # TDM
//!
//! Temporal dynamic macros: record a sequence of key presses and releases,
//! insert millisecond delays between them, and play the sequence back once or
//! in a loop without ever blocking the host's event loop.
//!
//! Macros live in fixed buffers shared pairwise: the even macro of a pair grows
//! from the front of the buffer, the odd one from the back. The engine itself
//! is synchronous; key events are fed through [`MacroEngine::process_key_event`]
//! and delayed work comes back through [`MacroEngine::on_deferred`].
//! [`runner::MacroProcessor`] wires both to embassy channels and timers.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod buffer;
pub mod config;
pub mod defer;
mod delay;
pub mod engine;
pub mod error;
pub mod event;
pub mod host;
mod player;
mod recorder;
pub mod runner;
mod selector;
pub mod state;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
pub use engine::MacroEngine;
pub use error::TdmError;
pub use state::Mode;
pub use tdm_types::keycode::{ControlKey, KeyCode};
pub use tdm_types::record::KeypressRecord;

pub type RawMutex = CriticalSectionRawMutex;
