use crate::engine::MacroEngine;
use crate::host::{Feedback, KeyClassifier, KeyOutput, Scheduler};

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    pub(crate) fn select_start(&mut self) {
        debug!("Selecting a macro");
        self.accumulator = 0;
    }

    pub(crate) fn select_accumulate(&mut self, digit: u8) {
        // Once the number is out of range more digits can't bring it back
        if self.accumulator >= Self::NUM_MACROS as u32 {
            return;
        }
        self.accumulator = self.accumulator * 10 + digit as u32;
    }

    pub(crate) fn select_end(&mut self) {
        self.output.release_all();
        self.macro_id = Self::clamp_macro_id(self.accumulator);
        info!("Selected macro {} (typed {})", self.macro_id, self.accumulator);
        self.accumulator = 0;
    }
}
