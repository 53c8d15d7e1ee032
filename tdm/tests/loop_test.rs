pub mod common;

use tdm::config::TdmConfig;
use tdm::{ControlKey, KeyCode, Mode};

use crate::common::{Harness, Output, taps};

#[test]
fn test_loop_repeats_after_debounce() {
    let mut h: Harness = Harness::new();
    h.record_taps(&[KeyCode::A, KeyCode::B]);
    h.clear_output();

    h.control(ControlKey::Loop);
    assert_eq!(h.engine.mode(), Mode::Looping);
    // The first repetition waits for the debounce interval too
    assert!(h.keys().is_empty());

    h.advance(100);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B]));
    h.advance(99);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B]));
    h.advance(1);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B, KeyCode::A, KeyCode::B]));
    h.advance(100);
    assert_eq!(h.keys().len(), 12);

    h.control(ControlKey::End);
    assert_eq!(h.engine.mode(), Mode::Idle);
    assert!(h.engine.scheduler().is_empty());
    h.advance(1000);
    assert_eq!(h.keys().len(), 12);
    assert_eq!(h.engine.feedback().play_stops, 1);
}

#[test]
fn test_loop_with_delay() {
    let mut h: Harness = Harness::with_config(TdmConfig {
        debounce: embassy_time::Duration::from_millis(10),
        ..Default::default()
    });
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.type_number("50");
    h.control(ControlKey::Record);
    h.tap(KeyCode::B);
    h.control(ControlKey::End);
    h.clear_output();

    h.control(ControlKey::Loop);
    // t = 10: A, then wait 50ms for B
    h.advance(10);
    assert_eq!(h.keys(), taps(&[KeyCode::A]));
    // t = 60: B, next repetition at 70
    h.advance(50);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B]));
    h.advance(9);
    assert_eq!(h.keys().len(), 4);
    h.advance(1);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B, KeyCode::A]));
    // At most one callback is pending
    assert_eq!(h.engine.scheduler().len(), 1);

    h.control(ControlKey::End);
    assert!(h.engine.scheduler().is_empty());
}

#[test]
fn test_loop_key_restarts_loop() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.type_number("500");
    h.control(ControlKey::Record);
    h.tap(KeyCode::B);
    h.control(ControlKey::End);
    h.clear_output();

    h.control(ControlKey::Loop);
    h.advance(200);
    assert_eq!(h.keys(), taps(&[KeyCode::A]));

    // Restart at t = 200, the pending B is dropped
    h.control(ControlKey::Loop);
    assert_eq!(h.engine.mode(), Mode::Looping);
    assert_eq!(h.engine.scheduler().len(), 1);
    assert_eq!(h.output().log.last(), Some(&Output::ReleaseAll));

    h.advance(450);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::A]));
    h.advance(150);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::A, KeyCode::B]));
}

#[test]
fn test_loop_of_empty_macro_stays_quiet() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Loop);
    h.advance(1000);
    assert!(h.keys().is_empty());
    assert_eq!(h.engine.mode(), Mode::Looping);
    h.control(ControlKey::End);
    assert_eq!(h.engine.mode(), Mode::Idle);
}

#[test]
fn test_play_is_rejected_while_looping() {
    let mut h: Harness = Harness::new();
    h.record_taps(&[KeyCode::A]);
    h.control(ControlKey::Loop);
    h.control(ControlKey::Play);
    assert_eq!(h.engine.mode(), Mode::Looping);
    h.control(ControlKey::Record);
    assert_eq!(h.engine.mode(), Mode::Looping);
}

#[test]
fn test_any_key_stops_loop_when_enabled() {
    let mut h: Harness = Harness::with_config(TdmConfig {
        exit_on_any_key: true,
        ..Default::default()
    });
    h.record_taps(&[KeyCode::A]);
    h.control(ControlKey::Loop);
    h.advance(250);

    assert!(h.press(KeyCode::Z));
    assert_eq!(h.engine.mode(), Mode::Looping);
    assert!(!h.release(KeyCode::Z));
    assert_eq!(h.engine.mode(), Mode::Idle);
    assert!(h.engine.scheduler().is_empty());
}

#[test]
fn test_keys_pass_through_while_looping() {
    let mut h: Harness = Harness::new();
    h.record_taps(&[KeyCode::A]);
    h.control(ControlKey::Loop);
    assert!(h.press(KeyCode::Z));
    assert!(h.release(KeyCode::Z));
    assert_eq!(h.engine.mode(), Mode::Looping);
}
