//! Interfaces to everything outside the macro engine.
//!
//! The engine never touches the keyboard, timers or LEDs directly. A host
//! integration hands it one implementation of each trait here.

use tdm_types::keycode::{ControlKey, KeyCode};

use crate::error::TdmError;

/// Decides what a keycode means to the engine.
pub trait KeyClassifier {
    /// The engine control key encoded by `keycode`, if any
    fn control_key(&self, keycode: KeyCode) -> Option<ControlKey>;

    fn is_control_key(&self, keycode: KeyCode) -> bool {
        self.control_key(keycode).is_some()
    }

    /// Layer keys are never recorded, only the keys they resolve to
    fn is_layer_key(&self, keycode: KeyCode) -> bool;

    /// Digit of a numeric key, used by delay entry and macro selection
    fn numeric_value(&self, keycode: KeyCode) -> Option<u8>;

    /// Narrows which keys may be recorded. A key rejected here ends the recording.
    fn is_recordable(&self, _keycode: KeyCode) -> bool {
        true
    }
}

/// Classifier for the QMK-style keycodes defined in `tdm-types`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;

impl KeyClassifier for DefaultClassifier {
    fn control_key(&self, keycode: KeyCode) -> Option<ControlKey> {
        ControlKey::from_keycode(keycode)
    }

    fn is_layer_key(&self, keycode: KeyCode) -> bool {
        keycode.is_layer()
    }

    fn numeric_value(&self, keycode: KeyCode) -> Option<u8> {
        keycode.digit()
    }
}

/// Where played back keys go.
pub trait KeyOutput {
    fn press(&mut self, keycode: KeyCode);
    fn release(&mut self, keycode: KeyCode);
    /// Release every held key and clear the active layers
    fn release_all(&mut self);
}

/// Work the engine asks to be called back for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deferred {
    /// Continue a single playback after a delay
    Resume,
    /// Continue or restart a looping playback
    Loop,
}

/// Handle of a scheduled [`Deferred`] callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeferredToken(pub u16);

/// Deferred execution.
///
/// When a callback is due, the host calls [`crate::MacroEngine::on_deferred`]
/// with its token. A non-zero return value asks for the same token to fire
/// again after that many milliseconds; zero retires it.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, task: Deferred) -> Result<DeferredToken, TdmError>;

    /// Cancel a pending callback. Unknown or already fired tokens are ignored.
    fn cancel(&mut self, token: DeferredToken);
}

/// Hooks for indicating engine activity, e.g. blinking a LED.
#[allow(unused_variables)]
pub trait Feedback {
    fn on_init(&mut self) {}
    fn on_record_start(&mut self, macro_id: u8) {}
    fn on_record_key(&mut self, macro_id: u8, keycode: KeyCode) {}
    fn on_record_end(&mut self, macro_id: u8) {}
    fn on_play(&mut self, macro_id: u8) {}
    fn on_play_stop(&mut self, macro_id: u8) {}
}

/// Feedback that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}
