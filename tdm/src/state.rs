//! The engine's mode and its transition table.

use tdm_types::keycode::ControlKey;

use crate::engine::MacroEngine;
use crate::error::TdmError;
use crate::host::{Feedback, KeyClassifier, KeyOutput, Scheduler};

/// What the engine is doing right now. There is exactly one mode for all macros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Idle,
    Recording,
    RecordingDelay,
    Playing,
    Looping,
    Selecting,
}

impl Mode {
    /// The mode a control key asks for when it is released
    pub fn requested_by(key: ControlKey) -> Self {
        match key {
            ControlKey::Record => Mode::Recording,
            ControlKey::Delay => Mode::RecordingDelay,
            ControlKey::End => Mode::Idle,
            ControlKey::Play => Mode::Playing,
            ControlKey::Loop => Mode::Looping,
            ControlKey::Select => Mode::Selecting,
        }
    }
}

/// Entry action of a legal transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Transition {
    RecordStart,
    RecordEnd,
    DelayStart,
    DelayEnd,
    PlayStart,
    LoopStart,
    PlayStop,
    SelectStart,
    SelectEnd,
}

impl Transition {
    /// Look up the edge `from -> to`. A missing edge means the transition is rejected.
    pub(crate) fn lookup(from: Mode, to: Mode) -> Option<Self> {
        use Mode::*;
        let transition = match (from, to) {
            (Idle, Recording) => Transition::RecordStart,
            (Recording, RecordingDelay) => Transition::DelayStart,
            (RecordingDelay, Recording) => Transition::DelayEnd,
            (Recording, Idle) => Transition::RecordEnd,
            (Idle, Playing) => Transition::PlayStart,
            (Playing, Idle) => Transition::PlayStop,
            (Idle, Looping) => Transition::LoopStart,
            (Looping, Looping) => Transition::LoopStart,
            (Looping, Idle) => Transition::PlayStop,
            (Idle, Selecting) => Transition::SelectStart,
            (Selecting, Idle) => Transition::SelectEnd,
            _ => return None,
        };
        Some(transition)
    }
}

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    /// Move to `next` and run the entry action of that edge.
    ///
    /// The mode is switched before the action runs, so an action may request
    /// a further transition itself (a playback that finishes immediately goes
    /// straight back to idle). Rejected requests leave the mode unchanged.
    pub fn transition(&mut self, next: Mode) -> Result<(), TdmError> {
        let Some(transition) = Transition::lookup(self.mode, next) else {
            warn!("Invalid transition: {:?} -> {:?}", self.mode, next);
            return Err(TdmError::InvalidTransition {
                from: self.mode,
                to: next,
            });
        };
        debug!("Transition {:?} -> {:?}: {:?}", self.mode, next, transition);
        self.mode = next;
        match transition {
            Transition::RecordStart => self.record_start(),
            Transition::RecordEnd => self.record_end(),
            Transition::DelayStart => self.delay_start(),
            Transition::DelayEnd => self.delay_end(),
            Transition::PlayStart => self.play_start(),
            Transition::LoopStart => self.loop_start(),
            Transition::PlayStop => self.play_stop(),
            Transition::SelectStart => self.select_start(),
            Transition::SelectEnd => self.select_end(),
        }
        Ok(())
    }
}
