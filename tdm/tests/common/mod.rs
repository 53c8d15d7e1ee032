#![allow(dead_code)]

use embassy_time::Instant;
use heapless::Vec;
use tdm::config::TdmConfig;
use tdm::defer::DeferredQueue;
use tdm::host::{DefaultClassifier, Feedback, KeyOutput};
use tdm::{ControlKey, KeyCode, MacroEngine};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// What the engine asked the output to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Press(KeyCode),
    Release(KeyCode),
    ReleaseAll,
}

#[derive(Debug, Default)]
pub struct TestOutput {
    pub log: Vec<Output, 256>,
}

impl TestOutput {
    /// Press and release calls only, `release_all` left out
    pub fn keys(&self) -> Vec<Output, 256> {
        self.log.iter().copied().filter(|o| *o != Output::ReleaseAll).collect()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl KeyOutput for TestOutput {
    fn press(&mut self, keycode: KeyCode) {
        self.log.push(Output::Press(keycode)).expect("output log full");
    }

    fn release(&mut self, keycode: KeyCode) {
        self.log.push(Output::Release(keycode)).expect("output log full");
    }

    fn release_all(&mut self) {
        self.log.push(Output::ReleaseAll).expect("output log full");
    }
}

#[derive(Debug, Default)]
pub struct TestFeedback {
    pub inits: usize,
    pub record_starts: usize,
    pub recorded_keys: usize,
    pub record_ends: usize,
    pub plays: usize,
    pub play_stops: usize,
}

impl Feedback for TestFeedback {
    fn on_init(&mut self) {
        self.inits += 1;
    }

    fn on_record_start(&mut self, _macro_id: u8) {
        self.record_starts += 1;
    }

    fn on_record_key(&mut self, _macro_id: u8, _keycode: KeyCode) {
        self.recorded_keys += 1;
    }

    fn on_record_end(&mut self, _macro_id: u8) {
        self.record_ends += 1;
    }

    fn on_play(&mut self, _macro_id: u8) {
        self.plays += 1;
    }

    fn on_play_stop(&mut self, _macro_id: u8) {
        self.play_stops += 1;
    }
}

pub type TestEngine<const BUFFER_SIZE: usize, const NUM_PAIRS: usize> =
    MacroEngine<DefaultClassifier, TestOutput, DeferredQueue<8>, TestFeedback, BUFFER_SIZE, NUM_PAIRS>;

/// An engine plus a manual clock
pub struct Harness<const BUFFER_SIZE: usize = 32, const NUM_PAIRS: usize = 1> {
    pub engine: TestEngine<BUFFER_SIZE, NUM_PAIRS>,
    pub now_ms: u64,
}

impl<const BUFFER_SIZE: usize, const NUM_PAIRS: usize> Harness<BUFFER_SIZE, NUM_PAIRS> {
    pub fn new() -> Self {
        Self::with_config(TdmConfig::default())
    }

    pub fn with_config(config: TdmConfig) -> Self {
        Self {
            engine: MacroEngine::new(
                DefaultClassifier,
                TestOutput::default(),
                DeferredQueue::new(),
                TestFeedback::default(),
                config,
            ),
            now_ms: 0,
        }
    }

    pub fn press(&mut self, keycode: KeyCode) -> bool {
        self.engine.process_key_event(keycode, true)
    }

    pub fn release(&mut self, keycode: KeyCode) -> bool {
        self.engine.process_key_event(keycode, false)
    }

    pub fn tap(&mut self, keycode: KeyCode) {
        self.press(keycode);
        self.release(keycode);
    }

    /// Tap a control key, the engine acts on its release
    pub fn control(&mut self, key: ControlKey) {
        self.tap(key.into());
    }

    /// Tap every digit of `number` on the number row
    pub fn type_number(&mut self, number: &str) {
        for c in number.chars() {
            let digit = c.to_digit(10).expect("not a digit") as u16;
            let keycode = if digit == 0 { KeyCode::Kc0 } else { KeyCode(0x1D + digit) };
            self.tap(keycode);
        }
    }

    /// Record `keys` as taps into the active macro
    pub fn record_taps(&mut self, keys: &[KeyCode]) {
        self.control(ControlKey::Record);
        for &k in keys {
            self.tap(k);
        }
        self.control(ControlKey::End);
    }

    /// Let `ms` milliseconds pass, firing every callback that becomes due on the way
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        while let Some(deadline) = self.engine.scheduler().next_deadline() {
            let deadline = deadline.as_millis();
            if deadline > target {
                break;
            }
            self.now_ms = self.now_ms.max(deadline);
            self.engine.tick(Instant::from_millis(self.now_ms));
        }
        self.now_ms = target;
        self.engine.scheduler_mut().sync(Instant::from_millis(self.now_ms));
    }

    pub fn output(&self) -> &TestOutput {
        self.engine.output()
    }

    pub fn clear_output(&mut self) {
        self.engine.output_mut().clear();
    }

    pub fn keys(&self) -> Vec<Output, 256> {
        self.engine.output().keys()
    }

    pub fn recorded(&self, macro_id: u8) -> Vec<(KeyCode, bool, u32), 64> {
        self.engine
            .records(macro_id)
            .map(|r| (r.keycode, r.pressed(), r.delay_ms))
            .collect()
    }
}

/// Press then release output of every key
pub fn taps(keys: &[KeyCode]) -> Vec<Output, 256> {
    let mut out = Vec::new();
    for &k in keys {
        out.push(Output::Press(k)).unwrap();
        out.push(Output::Release(k)).unwrap();
    }
    out
}
