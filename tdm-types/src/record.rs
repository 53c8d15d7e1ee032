use bitfield_struct::bitfield;

use crate::keycode::KeyCode;

/// Per-record metadata, packed into one byte.
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct KeyFlags {
    /// The key went down (`false` means it was released)
    #[bits(1)]
    pub pressed: bool,
    #[bits(7)]
    _reserved: u8,
}

/// One recorded key event, the unit stored in a macro buffer slot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypressRecord {
    pub keycode: KeyCode,
    pub flags: KeyFlags,
    /// Pause inserted after this event is played, in milliseconds. 0 means no pause.
    pub delay_ms: u32,
}

impl KeypressRecord {
    pub const fn new(keycode: KeyCode, pressed: bool) -> Self {
        Self {
            keycode,
            flags: KeyFlags::new().with_pressed(pressed),
            delay_ms: 0,
        }
    }

    pub const fn press(keycode: KeyCode) -> Self {
        Self::new(keycode, true)
    }

    pub const fn release(keycode: KeyCode) -> Self {
        Self::new(keycode, false)
    }

    pub const fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub const fn pressed(&self) -> bool {
        self.flags.pressed()
    }
}
