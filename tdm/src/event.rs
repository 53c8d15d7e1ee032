use tdm_types::keycode::KeyCode;

/// A key press or release delivered to the macro engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub keycode: KeyCode,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn press(keycode: KeyCode) -> Self {
        Self { keycode, pressed: true }
    }

    pub const fn release(keycode: KeyCode) -> Self {
        Self {
            keycode,
            pressed: false,
        }
    }
}
