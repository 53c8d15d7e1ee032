//! 16-bit keycodes.
//!
//! Keycodes follow the QMK numbering: the low byte range holds the HID usage
//! ids, the `0x52xx` block holds the layer keys and the user range starting at
//! `0x7E40` holds the engine's control keys.

use core::ops::RangeInclusive;

use strum::FromRepr;

/// Go to a layer, `TO(n)`
const TO: RangeInclusive<u16> = 0x5200..=0x521F;
/// Momentarily activate a layer, `MO(n)`
const MOMENTARY: RangeInclusive<u16> = 0x5220..=0x523F;
/// Toggle a layer, `TG(n)`
const TOGGLE_LAYER: RangeInclusive<u16> = 0x5260..=0x527F;
/// One shot layer, `OSL(n)`
const ONE_SHOT_LAYER: RangeInclusive<u16> = 0x5280..=0x529F;
/// One shot modifier, `OSM(mods)`
const ONE_SHOT_MOD: RangeInclusive<u16> = 0x52A0..=0x52BF;
/// Layer tap toggle, `TT(n)`
const LAYER_TAP_TOGGLE: RangeInclusive<u16> = 0x52C0..=0x52DF;
/// First keycode available for user defined keys
const USER: u16 = 0x7E40;

/// A raw 16-bit keycode.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u16);

#[allow(non_upper_case_globals)]
impl KeyCode {
    /// Reserved, no-key.
    pub const No: KeyCode = KeyCode(0x0000);
    pub const A: KeyCode = KeyCode(0x0004);
    pub const B: KeyCode = KeyCode(0x0005);
    pub const C: KeyCode = KeyCode(0x0006);
    pub const D: KeyCode = KeyCode(0x0007);
    pub const E: KeyCode = KeyCode(0x0008);
    pub const F: KeyCode = KeyCode(0x0009);
    pub const G: KeyCode = KeyCode(0x000A);
    pub const H: KeyCode = KeyCode(0x000B);
    pub const I: KeyCode = KeyCode(0x000C);
    pub const J: KeyCode = KeyCode(0x000D);
    pub const K: KeyCode = KeyCode(0x000E);
    pub const L: KeyCode = KeyCode(0x000F);
    pub const M: KeyCode = KeyCode(0x0010);
    pub const N: KeyCode = KeyCode(0x0011);
    pub const O: KeyCode = KeyCode(0x0012);
    pub const P: KeyCode = KeyCode(0x0013);
    pub const Q: KeyCode = KeyCode(0x0014);
    pub const R: KeyCode = KeyCode(0x0015);
    pub const S: KeyCode = KeyCode(0x0016);
    pub const T: KeyCode = KeyCode(0x0017);
    pub const U: KeyCode = KeyCode(0x0018);
    pub const V: KeyCode = KeyCode(0x0019);
    pub const W: KeyCode = KeyCode(0x001A);
    pub const X: KeyCode = KeyCode(0x001B);
    pub const Y: KeyCode = KeyCode(0x001C);
    pub const Z: KeyCode = KeyCode(0x001D);
    /// `1` and `!`
    pub const Kc1: KeyCode = KeyCode(0x001E);
    pub const Kc2: KeyCode = KeyCode(0x001F);
    pub const Kc3: KeyCode = KeyCode(0x0020);
    pub const Kc4: KeyCode = KeyCode(0x0021);
    pub const Kc5: KeyCode = KeyCode(0x0022);
    pub const Kc6: KeyCode = KeyCode(0x0023);
    pub const Kc7: KeyCode = KeyCode(0x0024);
    pub const Kc8: KeyCode = KeyCode(0x0025);
    pub const Kc9: KeyCode = KeyCode(0x0026);
    /// `0` and `)`
    pub const Kc0: KeyCode = KeyCode(0x0027);
    pub const Enter: KeyCode = KeyCode(0x0028);
    pub const Escape: KeyCode = KeyCode(0x0029);
    pub const Backspace: KeyCode = KeyCode(0x002A);
    pub const Tab: KeyCode = KeyCode(0x002B);
    pub const Space: KeyCode = KeyCode(0x002C);
    /// Keypad `1` and End
    pub const Kp1: KeyCode = KeyCode(0x0059);
    pub const Kp2: KeyCode = KeyCode(0x005A);
    pub const Kp3: KeyCode = KeyCode(0x005B);
    pub const Kp4: KeyCode = KeyCode(0x005C);
    pub const Kp5: KeyCode = KeyCode(0x005D);
    pub const Kp6: KeyCode = KeyCode(0x005E);
    pub const Kp7: KeyCode = KeyCode(0x005F);
    pub const Kp8: KeyCode = KeyCode(0x0060);
    pub const Kp9: KeyCode = KeyCode(0x0061);
    /// Keypad `0` and Insert
    pub const Kp0: KeyCode = KeyCode(0x0062);
    pub const LCtrl: KeyCode = KeyCode(0x00E0);
    pub const LShift: KeyCode = KeyCode(0x00E1);
    pub const LAlt: KeyCode = KeyCode(0x00E2);
    pub const LGui: KeyCode = KeyCode(0x00E3);
    pub const RCtrl: KeyCode = KeyCode(0x00E4);
    pub const RShift: KeyCode = KeyCode(0x00E5);
    pub const RAlt: KeyCode = KeyCode(0x00E6);
    pub const RGui: KeyCode = KeyCode(0x00E7);
    /// Activates the upper layer when the lower layer is active
    pub const TriLayerLower: KeyCode = KeyCode(0x7C77);
    /// Activates the lower layer when the upper layer is active
    pub const TriLayerUpper: KeyCode = KeyCode(0x7C78);

    /// Momentarily activate `layer` while held
    pub const fn mo(layer: u8) -> Self {
        Self(*MOMENTARY.start() | (layer as u16 & 0x1F))
    }

    /// Switch to `layer`
    pub const fn to(layer: u8) -> Self {
        Self(*TO.start() | (layer as u16 & 0x1F))
    }

    /// Toggle `layer`
    pub const fn tg(layer: u8) -> Self {
        Self(*TOGGLE_LAYER.start() | (layer as u16 & 0x1F))
    }

    /// Hold to activate `layer`, tap repeatedly to toggle it
    pub const fn tt(layer: u8) -> Self {
        Self(*LAYER_TAP_TOGGLE.start() | (layer as u16 & 0x1F))
    }

    /// One shot `layer`
    pub const fn osl(layer: u8) -> Self {
        Self(*ONE_SHOT_LAYER.start() | (layer as u16 & 0x1F))
    }

    /// One shot modifiers, `mods` is the 5-bit QMK modifier mask
    pub const fn osm(mods: u8) -> Self {
        Self(*ONE_SHOT_MOD.start() | (mods as u16 & 0x1F))
    }

    /// Returns the digit of a number row or keypad number key.
    pub fn digit(self) -> Option<u8> {
        match self.0 {
            0x1E..=0x26 => Some((self.0 - 0x1D) as u8),
            0x27 => Some(0),
            0x59..=0x61 => Some((self.0 - 0x58) as u8),
            0x62 => Some(0),
            _ => None,
        }
    }

    /// Returns `true` if the keycode is a layer key (or a one shot modifier,
    /// which resolves like one).
    pub fn is_layer(self) -> bool {
        let kc = self.0;
        MOMENTARY.contains(&kc)
            || TO.contains(&kc)
            || TOGGLE_LAYER.contains(&kc)
            || LAYER_TAP_TOGGLE.contains(&kc)
            || ONE_SHOT_LAYER.contains(&kc)
            || ONE_SHOT_MOD.contains(&kc)
            || self == Self::TriLayerLower
            || self == Self::TriLayerUpper
    }

    /// Returns `true` if the keycode is a modifier
    pub fn is_modifier(self) -> bool {
        Self::LCtrl <= self && self <= Self::RGui
    }
}

impl From<u16> for KeyCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<KeyCode> for u16 {
    fn from(value: KeyCode) -> Self {
        value.0
    }
}

/// Keys that drive the macro engine instead of being recorded.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlKey {
    /// Start recording into the active macro
    Record = USER,
    /// Enter a delay after the last recorded key
    Delay = USER + 1,
    /// Finish recording or stop playback
    End = USER + 2,
    /// Play the active macro once
    Play = USER + 3,
    /// Play the active macro repeatedly
    Loop = USER + 4,
    /// Choose the active macro by number
    Select = USER + 5,
}

impl ControlKey {
    /// Returns the control key that `keycode` encodes, if any.
    pub fn from_keycode(keycode: KeyCode) -> Option<Self> {
        Self::from_repr(keycode.0)
    }
}

impl From<ControlKey> for KeyCode {
    fn from(value: ControlKey) -> Self {
        KeyCode(value as u16)
    }
}
