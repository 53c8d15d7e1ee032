//! Async host loop for embassy based firmware.

use embassy_futures::select::{Either, select};
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::{Instant, Timer};

use crate::RawMutex;
use crate::defer::DeferredQueue;
use crate::engine::MacroEngine;
use crate::event::KeyEvent;
use crate::host::{Feedback, KeyClassifier, KeyOutput};

/// A long running task
pub trait Runnable {
    async fn run(&mut self);
}

/// Feeds a [`MacroEngine`] from a key event channel and fires its delays.
///
/// Waiting for the next key event and for the next playback deadline happen
/// in the same `select`, so a long delay inside a macro never holds up key
/// handling. Events the engine lets through are forwarded to `passthrough`;
/// events that don't fit into it are dropped and logged.
pub struct MacroProcessor<
    'a,
    K,
    O,
    F,
    const BUFFER_SIZE: usize,
    const NUM_PAIRS: usize,
    const QUEUE_SIZE: usize,
    const CHANNEL_SIZE: usize,
> {
    engine: MacroEngine<K, O, DeferredQueue<QUEUE_SIZE>, F, BUFFER_SIZE, NUM_PAIRS>,
    events: Receiver<'a, RawMutex, KeyEvent, CHANNEL_SIZE>,
    passthrough: Sender<'a, RawMutex, KeyEvent, CHANNEL_SIZE>,
}

impl<
    'a,
    K: KeyClassifier,
    O: KeyOutput,
    F: Feedback,
    const BUFFER_SIZE: usize,
    const NUM_PAIRS: usize,
    const QUEUE_SIZE: usize,
    const CHANNEL_SIZE: usize,
> MacroProcessor<'a, K, O, F, BUFFER_SIZE, NUM_PAIRS, QUEUE_SIZE, CHANNEL_SIZE>
{
    pub fn new(
        engine: MacroEngine<K, O, DeferredQueue<QUEUE_SIZE>, F, BUFFER_SIZE, NUM_PAIRS>,
        events: Receiver<'a, RawMutex, KeyEvent, CHANNEL_SIZE>,
        passthrough: Sender<'a, RawMutex, KeyEvent, CHANNEL_SIZE>,
    ) -> Self {
        Self {
            engine,
            events,
            passthrough,
        }
    }

    pub fn engine(&self) -> &MacroEngine<K, O, DeferredQueue<QUEUE_SIZE>, F, BUFFER_SIZE, NUM_PAIRS> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MacroEngine<K, O, DeferredQueue<QUEUE_SIZE>, F, BUFFER_SIZE, NUM_PAIRS> {
        &mut self.engine
    }

    fn process_event(&mut self, event: KeyEvent) {
        self.engine.scheduler_mut().sync(Instant::now());
        if self.engine.process(event) && self.passthrough.try_send(event).is_err() {
            error!("Failed to forward {:?}: passthrough channel full", event);
        }
    }
}

impl<
    K: KeyClassifier,
    O: KeyOutput,
    F: Feedback,
    const BUFFER_SIZE: usize,
    const NUM_PAIRS: usize,
    const QUEUE_SIZE: usize,
    const CHANNEL_SIZE: usize,
> Runnable for MacroProcessor<'_, K, O, F, BUFFER_SIZE, NUM_PAIRS, QUEUE_SIZE, CHANNEL_SIZE>
{
    async fn run(&mut self) {
        loop {
            let deadline = self.engine.scheduler().next_deadline();
            let timeout = async {
                match deadline {
                    Some(deadline) => Timer::at(deadline).await,
                    None => core::future::pending::<()>().await,
                }
            };
            let next = select(self.events.receive(), timeout).await;
            match next {
                Either::First(event) => self.process_event(event),
                Either::Second(_) => self.engine.tick(Instant::now()),
            }
        }
    }
}
