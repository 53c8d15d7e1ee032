use tdm_types::record::KeypressRecord;

use crate::engine::MacroEngine;
use crate::host::{Deferred, Feedback, KeyClassifier, KeyOutput, Scheduler};
use crate::state::Mode;

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    /// Play the active macro once.
    pub(crate) fn play_start(&mut self) {
        self.output.release_all();
        self.feedback.on_play(self.macro_id);
        self.reset_cursor();
        debug!(
            "Playing macro #{}: {} records",
            self.macro_id,
            self.buffers.len(self.macro_id)
        );
        self.play_pass();
        // Otherwise a delay is pending and the resume callback finishes the job
        if self.play_finished {
            self.clear_tokens();
            let _ = self.transition(Mode::Idle);
        }
    }

    /// Play the active macro repeatedly, starting after the debounce interval.
    ///
    /// Starting while a loop is already running restarts it from the top.
    pub(crate) fn loop_start(&mut self) {
        self.feedback.on_play(self.macro_id);
        if self.loop_token.is_some() || self.delay_token.is_some() {
            debug!("Restarting loop");
            self.clear_tokens();
            self.output.release_all();
        }
        self.reset_cursor();
        match self.scheduler.schedule(self.config.debounce_ms(), Deferred::Loop) {
            Ok(token) => {
                debug!("Looping macro #{} with token {:?}", self.macro_id, token);
                self.loop_token = Some(token);
            }
            Err(e) => {
                error!("Failed to start loop: {:?}", e);
                let _ = self.transition(Mode::Idle);
            }
        }
    }

    /// Stop playing or looping.
    pub(crate) fn play_stop(&mut self) {
        self.output.release_all();
        self.clear_tokens();
        info!("Stopped playing macro #{}", self.macro_id);
        self.feedback.on_play_stop(self.macro_id);
    }

    /// Play records until the macro ends or a delay is due.
    ///
    /// A delay schedules the continuation and returns right away, this is the
    /// only place where playback suspends.
    pub(crate) fn play_pass(&mut self) {
        while let Some(record) = self.buffers.next(&mut self.cursor) {
            self.play_record(&record);
            if record.delay_ms == 0 {
                continue;
            }
            let task = if self.mode == Mode::Looping {
                Deferred::Loop
            } else {
                Deferred::Resume
            };
            match self.scheduler.schedule(record.delay_ms, task) {
                Ok(token) => {
                    trace!("Delaying {}ms with token {:?}", record.delay_ms, token);
                    self.delay_token = Some(token);
                    return;
                }
                Err(e) => {
                    error!("Failed to schedule a {}ms delay: {:?}", record.delay_ms, e);
                    break;
                }
            }
        }
        trace!("Playback pass of macro #{} finished", self.macro_id);
        self.play_finished = true;
    }

    /// Continue a single playback after its delay elapsed.
    pub(crate) fn resume_playback(&mut self) {
        if self.mode != Mode::Playing {
            warn!("Resume callback fired while {:?}", self.mode);
            return;
        }
        self.play_pass();
        if self.play_finished {
            let _ = self.transition(Mode::Idle);
            self.clear_tokens();
        }
    }

    /// Continue a loop. Returns the re-arm delay: the debounce interval when a
    /// repetition finished, 0 while a delay inside the macro is pending.
    pub(crate) fn continue_loop(&mut self) -> u32 {
        if self.mode != Mode::Looping {
            warn!("Loop callback fired while {:?}", self.mode);
            return 0;
        }
        self.play_pass();
        if self.play_finished {
            self.reset_cursor();
            self.config.debounce_ms().max(1)
        } else {
            0
        }
    }

    fn play_record(&mut self, record: &KeypressRecord) {
        trace!("Play {:?} pressed: {}", record.keycode, record.pressed());
        if record.pressed() {
            self.output.press(record.keycode);
        } else {
            self.output.release(record.keycode);
        }
    }
}
