use tdm_types::keycode::KeyCode;
use tdm_types::record::KeypressRecord;

use crate::engine::MacroEngine;
use crate::host::{Feedback, KeyClassifier, KeyOutput, Scheduler};
use crate::state::Mode;

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    /// Start recording into the active macro, overwriting it.
    pub(crate) fn record_start(&mut self) {
        info!(
            "Recording into macro #{}, {} slots available",
            self.macro_id,
            self.buffers.capacity(self.macro_id)
        );
        self.feedback.on_record_start(self.macro_id);
        self.output.release_all();
        self.reset_cursor();
        self.got_first_keydown = false;
    }

    /// Append one key event to the recording.
    pub(crate) fn record_key(&mut self, keycode: KeyCode, pressed: bool) {
        // Releases before the first press belong to the keys used to start the recording
        if !pressed && !self.got_first_keydown {
            debug!("Ignoring a leading key-up event: {:?}", keycode);
            return;
        }
        self.got_first_keydown = true;

        if self.buffers.is_full(&self.cursor) {
            warn!("Macro #{} is full, ending the recording", self.macro_id);
            let _ = self.transition(Mode::Idle);
            return;
        }
        if let Err(e) = self
            .buffers
            .append(&mut self.cursor, KeypressRecord::new(keycode, pressed))
        {
            error!("Failed to record {:?}: {:?}", keycode, e);
            return;
        }
        trace!(
            "Recorded {:?} pressed: {}, macro #{} length {}",
            keycode,
            pressed,
            self.macro_id,
            self.cursor.offset()
        );
        self.feedback.on_record_key(self.macro_id, keycode);
    }

    /// Finish the recording and persist the new macro end.
    ///
    /// Trailing presses that were never released, control keys and layer keys
    /// are trimmed off: playback sends raw key downs and ups, so a macro must
    /// not end on a key that is still held.
    pub(crate) fn record_end(&mut self) {
        let classifier = &self.classifier;
        let trimmed = self.buffers.trim_back(&mut self.cursor, |record| {
            record.pressed() || classifier.is_control_key(record.keycode) || classifier.is_layer_key(record.keycode)
        });
        if trimmed > 0 {
            debug!("Trimmed {} trailing records", trimmed);
        }
        self.buffers.commit(&self.cursor);
        info!(
            "Macro #{} saved, length: {}",
            self.macro_id,
            self.buffers.len(self.macro_id)
        );
        self.feedback.on_record_end(self.macro_id);
    }
}
