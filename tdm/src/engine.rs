use tdm_types::keycode::KeyCode;
use tdm_types::record::KeypressRecord;

use crate::buffer::{Cursor, MacroBuffers};
use crate::config::{DEFAULT_BUFFER_SIZE, DEFAULT_NUM_PAIRS, TdmConfig};
use crate::error::TdmError;
use crate::event::KeyEvent;
use crate::host::{Deferred, DeferredToken, Feedback, KeyClassifier, KeyOutput, NoFeedback, Scheduler};
use crate::state::Mode;

/// The macro recording and playback engine.
///
/// All state lives here: the macro buffers, the mode, the cursor of the
/// session in progress and the handles of pending callbacks. The host owns the
/// engine and drives it from a single execution context with key events
/// ([`Self::process_key_event`]) and fired callbacks ([`Self::on_deferred`]).
pub struct MacroEngine<
    K,
    O,
    S,
    F = NoFeedback,
    const BUFFER_SIZE: usize = DEFAULT_BUFFER_SIZE,
    const NUM_PAIRS: usize = DEFAULT_NUM_PAIRS,
> {
    pub(crate) classifier: K,
    pub(crate) output: O,
    pub(crate) scheduler: S,
    pub(crate) feedback: F,
    pub(crate) config: TdmConfig,

    pub(crate) buffers: MacroBuffers<BUFFER_SIZE, NUM_PAIRS>,
    pub(crate) mode: Mode,
    /// Macro that recording, playback and selection act on
    pub(crate) macro_id: u8,
    /// Position inside the active macro, valid while a session runs
    pub(crate) cursor: Cursor,

    /// A press was recorded in the current session, so releases are meaningful
    pub(crate) got_first_keydown: bool,
    /// Decimal number being typed, shared by delay entry and selection
    pub(crate) accumulator: u32,
    /// Delay entry dropped a digit, later digits are ignored too
    pub(crate) delay_capped: bool,
    /// The last playback pass reached the macro end
    pub(crate) play_finished: bool,

    /// Pending loop (re)start
    pub(crate) loop_token: Option<DeferredToken>,
    /// Pending resume after a delay inside the macro
    pub(crate) delay_token: Option<DeferredToken>,
}

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    pub const NUM_MACROS: usize = MacroBuffers::<BUFFER_SIZE, NUM_PAIRS>::NUM_MACROS;

    pub fn new(classifier: K, output: O, scheduler: S, feedback: F, config: TdmConfig) -> Self {
        let buffers = MacroBuffers::new();
        let cursor = buffers.cursor(0);
        let mut engine = Self {
            classifier,
            output,
            scheduler,
            feedback,
            config,
            buffers,
            mode: Mode::Idle,
            macro_id: 0,
            cursor,
            got_first_keydown: false,
            accumulator: 0,
            delay_capped: false,
            play_finished: false,
            loop_token: None,
            delay_token: None,
        };
        engine.feedback.on_init();
        info!(
            "Macro engine ready: {} macros, {} slots per pair",
            Self::NUM_MACROS,
            BUFFER_SIZE
        );
        engine
    }

    /// Cancel pending callbacks, empty every macro and go back to idle.
    pub fn reset(&mut self) {
        self.clear_tokens();
        self.buffers.reset();
        self.mode = Mode::Idle;
        self.macro_id = 0;
        self.cursor = self.buffers.cursor(0);
        self.got_first_keydown = false;
        self.accumulator = 0;
        self.delay_capped = false;
        self.play_finished = false;
    }

    /// Handle one key event.
    ///
    /// Returns `true` if the event should continue to the rest of the input
    /// pipeline. Control keys act on release and are always consumed, layer
    /// keys always pass through so that only the keys they resolve to get
    /// recorded.
    pub fn process_key_event(&mut self, keycode: KeyCode, pressed: bool) -> bool {
        if let Some(control) = self.classifier.control_key(keycode) {
            if !pressed {
                // Rejections are logged by `transition`
                let _ = self.transition(Mode::requested_by(control));
            }
            return false;
        }
        if self.classifier.is_layer_key(keycode) {
            return true;
        }

        let pass_recorded = !self.config.silent_recorded_keys;
        let pass_invalid = !self.config.silent_invalid_keys;
        match self.mode {
            Mode::Idle => true,
            Mode::Recording => {
                if self.classifier.is_recordable(keycode) {
                    self.record_key(keycode, pressed);
                    pass_recorded
                } else if pressed {
                    warn!("Key {:?} can't be recorded, ending the recording", keycode);
                    let _ = self.transition(Mode::Idle);
                    pass_invalid
                } else {
                    pass_recorded
                }
            }
            Mode::RecordingDelay => {
                let digit = self.classifier.numeric_value(keycode);
                match (digit, pressed) {
                    (Some(digit), true) => self.delay_accumulate(digit),
                    (None, false) => {
                        // Any other key finishes delay entry, on release so its
                        // press never leaks into the recording
                        let _ = self.transition(Mode::Recording);
                    }
                    _ => (),
                }
                pass_recorded
            }
            Mode::Selecting => {
                if !pressed {
                    return pass_recorded;
                }
                match self.classifier.numeric_value(keycode) {
                    Some(digit) => {
                        self.select_accumulate(digit);
                        pass_recorded
                    }
                    None => {
                        warn!("Only numeric keys select a macro, got {:?}", keycode);
                        let _ = self.transition(Mode::Idle);
                        pass_invalid
                    }
                }
            }
            Mode::Playing | Mode::Looping => {
                if self.config.exit_on_any_key && !pressed {
                    let _ = self.transition(Mode::Idle);
                    pass_invalid
                } else {
                    true
                }
            }
        }
    }

    /// Handle a [`KeyEvent`], see [`Self::process_key_event`]
    pub fn process(&mut self, event: KeyEvent) -> bool {
        self.process_key_event(event.keycode, event.pressed)
    }

    /// Run a fired callback. Returns the delay after which the same token
    /// should fire again, 0 to retire it.
    pub fn on_deferred(&mut self, token: DeferredToken, task: Deferred) -> u32 {
        let is_loop = self.loop_token == Some(token);
        let is_delay = self.delay_token == Some(token);
        if !is_loop && !is_delay {
            warn!("Ignoring stale callback {:?} ({:?})", token, task);
            return 0;
        }
        // The token is spent unless it gets re-armed below
        if is_loop {
            self.loop_token = None;
        }
        if is_delay {
            self.delay_token = None;
        }

        match task {
            Deferred::Resume => {
                self.resume_playback();
                0
            }
            Deferred::Loop => {
                let rearm = self.continue_loop();
                if rearm > 0 {
                    self.loop_token = Some(token);
                }
                rearm
            }
        }
    }

    /// Choose the active macro directly, e.g. from a tap gesture.
    ///
    /// Only allowed while idle. Ids past the last macro select the last one.
    pub fn select_macro(&mut self, macro_id: u8) -> Result<u8, TdmError> {
        if self.mode != Mode::Idle {
            warn!("Can't select a macro while {:?}", self.mode);
            return Err(TdmError::InvalidTransition {
                from: self.mode,
                to: Mode::Selecting,
            });
        }
        self.macro_id = Self::clamp_macro_id(macro_id as u32);
        info!("Selected macro {}", self.macro_id);
        Ok(self.macro_id)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The macro that recording and playback act on
    pub fn active_macro(&self) -> u8 {
        self.macro_id
    }

    pub fn config(&self) -> &TdmConfig {
        &self.config
    }

    /// Number of records persisted in a macro
    pub fn macro_len(&self, macro_id: u8) -> usize {
        self.buffers.len(macro_id)
    }

    /// Slots a macro could use if it was recorded now
    pub fn macro_capacity(&self, macro_id: u8) -> usize {
        self.buffers.capacity(macro_id)
    }

    /// Persisted records of a macro in playback order
    pub fn records(&self, macro_id: u8) -> impl Iterator<Item = &KeypressRecord> {
        self.buffers.records(macro_id)
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Log every macro's content
    pub fn dump(&self) {
        debug!("Macro dump, mode {:?}, active macro {}", self.mode, self.macro_id);
        for macro_id in 0..Self::NUM_MACROS as u8 {
            debug!(
                "Macro #{}: {}/{} slots",
                macro_id,
                self.buffers.len(macro_id),
                self.buffers.capacity(macro_id)
            );
            for record in self.buffers.records(macro_id) {
                debug!(
                    "  {:?} pressed: {} delay: {}ms",
                    record.keycode,
                    record.pressed(),
                    record.delay_ms
                );
            }
        }
    }

    pub(crate) fn clamp_macro_id(value: u32) -> u8 {
        value.min(Self::NUM_MACROS as u32 - 1) as u8
    }

    /// Cancel both pending callbacks
    pub(crate) fn clear_tokens(&mut self) {
        if let Some(token) = self.loop_token.take() {
            self.scheduler.cancel(token);
        }
        if let Some(token) = self.delay_token.take() {
            self.scheduler.cancel(token);
        }
    }

    /// Point the session cursor at the start of the active macro
    pub(crate) fn reset_cursor(&mut self) {
        self.cursor = self.buffers.cursor(self.macro_id);
        self.play_finished = false;
    }
}
