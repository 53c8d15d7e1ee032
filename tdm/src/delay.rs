use crate::engine::MacroEngine;
use crate::host::{Feedback, KeyClassifier, KeyOutput, Scheduler};

impl<K, O, S, F, const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroEngine<K, O, S, F, BUFFER_SIZE, NUM_PAIRS>
where
    K: KeyClassifier,
    O: KeyOutput,
    S: Scheduler,
    F: Feedback,
{
    /// Start typing a delay for the last recorded key.
    ///
    /// Only layer keys are trimmed here, they were used to reach the delay key.
    pub(crate) fn delay_start(&mut self) {
        self.accumulator = 0;
        self.delay_capped = false;
        let classifier = &self.classifier;
        let trimmed = self
            .buffers
            .trim_back(&mut self.cursor, |record| classifier.is_layer_key(record.keycode));
        debug!("Entering delay, trimmed {} layer keys", trimmed);
    }

    /// Add one typed digit to the delay.
    ///
    /// The first digit that would push the delay past the configured maximum
    /// caps it: that digit and every later one are dropped.
    pub(crate) fn delay_accumulate(&mut self, digit: u8) {
        if self.delay_capped {
            trace!("Delay capped, dropping digit {}", digit);
            return;
        }
        let next = self
            .accumulator
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as u32));
        match next {
            Some(value) if value <= self.config.max_delay_ms() => {
                self.accumulator = value;
                trace!("Delay: {}ms", self.accumulator);
            }
            _ => {
                debug!("Delay capped at {}ms, dropping digit {}", self.accumulator, digit);
                self.delay_capped = true;
            }
        }
    }

    /// Attach the typed delay to the most recently recorded key.
    pub(crate) fn delay_end(&mut self) {
        let delay_ms = self.accumulator;
        self.accumulator = 0;
        self.delay_capped = false;
        match self.buffers.last_mut(&self.cursor) {
            Some(record) => {
                record.delay_ms = delay_ms;
                info!("Delay of {}ms after {:?}", delay_ms, record.keycode);
            }
            None => warn!("No recorded key to attach a {}ms delay to", delay_ms),
        }
    }
}
