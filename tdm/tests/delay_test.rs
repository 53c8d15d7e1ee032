pub mod common;

use tdm::{ControlKey, KeyCode, Mode};

use crate::common::{Harness, Output, taps};

/// Record `A`, a delay of `delay` ms, then `B`
fn record_with_delay(h: &mut Harness, delay: &str) {
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    assert_eq!(h.engine.mode(), Mode::RecordingDelay);
    h.type_number(delay);
    h.control(ControlKey::Record);
    assert_eq!(h.engine.mode(), Mode::Recording);
    h.tap(KeyCode::B);
    h.control(ControlKey::End);
}

#[test]
fn test_delay_attaches_to_last_recorded_key() {
    let mut h: Harness = Harness::new();
    record_with_delay(&mut h, "250");
    assert_eq!(
        h.recorded(0).as_slice(),
        &[
            (KeyCode::A, true, 0),
            (KeyCode::A, false, 250),
            (KeyCode::B, true, 0),
            (KeyCode::B, false, 0),
        ]
    );
}

#[test]
fn test_digits_are_not_recorded_as_keys() {
    let mut h: Harness = Harness::new();
    record_with_delay(&mut h, "1234");
    assert_eq!(h.engine.macro_len(0), 4);
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(1234));
}

#[test]
fn test_playback_waits_for_delay() {
    let mut h: Harness = Harness::new();
    record_with_delay(&mut h, "250");
    h.clear_output();

    h.control(ControlKey::Play);
    assert_eq!(h.keys(), taps(&[KeyCode::A]));
    assert_eq!(h.engine.mode(), Mode::Playing);

    h.advance(249);
    assert_eq!(h.keys(), taps(&[KeyCode::A]));

    h.advance(1);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B]));
    assert_eq!(h.engine.mode(), Mode::Idle);
    assert!(h.engine.scheduler().is_empty());
}

#[test]
fn test_keys_are_handled_during_playback_delay() {
    let mut h: Harness = Harness::new();
    record_with_delay(&mut h, "500");
    h.clear_output();

    h.control(ControlKey::Play);
    h.advance(100);
    // Regular typing goes on while the macro waits
    assert!(h.press(KeyCode::X));
    assert!(h.release(KeyCode::X));
    assert_eq!(h.engine.mode(), Mode::Playing);

    h.advance(400);
    assert_eq!(h.keys(), taps(&[KeyCode::A, KeyCode::B]));
}

#[test]
fn test_stop_during_delay_cancels_playback() {
    let mut h: Harness = Harness::new();
    record_with_delay(&mut h, "300");
    h.clear_output();

    h.control(ControlKey::Play);
    h.advance(100);
    h.control(ControlKey::End);
    assert_eq!(h.engine.mode(), Mode::Idle);
    assert!(h.engine.scheduler().is_empty());
    assert_eq!(h.output().log.last(), Some(&Output::ReleaseAll));

    h.advance(1000);
    assert_eq!(h.keys(), taps(&[KeyCode::A]));
}

#[test]
fn test_trailing_delay_is_kept() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.type_number("40");
    h.control(ControlKey::Record);
    h.control(ControlKey::End);
    assert_eq!(
        h.recorded(0).as_slice(),
        &[(KeyCode::A, true, 0), (KeyCode::A, false, 40)]
    );

    // A single playback still waits before it's done
    h.control(ControlKey::Play);
    assert_eq!(h.engine.mode(), Mode::Playing);
    h.advance(40);
    assert_eq!(h.engine.mode(), Mode::Idle);
}

#[test]
fn test_delay_is_capped() {
    let mut h: Harness = Harness::new();
    // 2 hours is the longest delay
    record_with_delay(&mut h, "72000001");
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(7_200_000));

    record_with_delay(&mut h, "99999999");
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(999_999));
}

#[test]
fn test_digits_after_cap_are_dropped() {
    let mut h: Harness = Harness::new();
    // The trailing 0 would fit again once the 1 is dropped
    record_with_delay(&mut h, "72000010");
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(7_200_000));

    record_with_delay(&mut h, "8000005");
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(800_000));

    record_with_delay(&mut h, "90000001");
    assert_eq!(h.engine.records(0).nth(1).map(|r| r.delay_ms), Some(900_000));
}

#[test]
fn test_cap_is_cleared_by_next_delay_entry() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.type_number("80000005");
    h.control(ControlKey::Record);
    h.tap(KeyCode::B);
    h.control(ControlKey::Delay);
    h.type_number("25");
    h.control(ControlKey::Record);
    h.control(ControlKey::End);

    assert_eq!(
        h.recorded(0).as_slice(),
        &[
            (KeyCode::A, true, 0),
            (KeyCode::A, false, 800_000),
            (KeyCode::B, true, 0),
            (KeyCode::B, false, 25),
        ]
    );
}

#[test]
fn test_non_numeric_key_finishes_delay_entry() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.type_number("5");
    h.press(KeyCode::Escape);
    assert_eq!(h.engine.mode(), Mode::RecordingDelay);
    h.release(KeyCode::Escape);
    assert_eq!(h.engine.mode(), Mode::Recording);
    h.tap(KeyCode::B);
    h.control(ControlKey::End);

    assert_eq!(
        h.recorded(0).as_slice(),
        &[
            (KeyCode::A, true, 0),
            (KeyCode::A, false, 5),
            (KeyCode::B, true, 0),
            (KeyCode::B, false, 0),
        ]
    );
}

#[test]
fn test_delay_before_any_key_is_dropped() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.control(ControlKey::Delay);
    h.type_number("100");
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::End);

    assert_eq!(
        h.recorded(0).as_slice(),
        &[(KeyCode::A, true, 0), (KeyCode::A, false, 0)]
    );
}

#[test]
fn test_end_is_rejected_during_delay_entry() {
    let mut h: Harness = Harness::new();
    h.control(ControlKey::Record);
    h.tap(KeyCode::A);
    h.control(ControlKey::Delay);
    h.control(ControlKey::End);
    assert_eq!(h.engine.mode(), Mode::RecordingDelay);
}
