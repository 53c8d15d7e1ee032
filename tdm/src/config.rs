use embassy_time::Duration;

/// Default number of slots shared by a pair of macros
pub const DEFAULT_BUFFER_SIZE: usize = 50;

/// Default number of macro pairs, each pair holds two macros
pub const DEFAULT_NUM_PAIRS: usize = 1;

/// Longest delay that can be entered, two hours
pub const MAX_DELAY: Duration = Duration::from_secs(2 * 60 * 60);

/// Config for the macro engine's key routing and timing.
///
/// Buffer sizes are const generics of [`crate::MacroEngine`], everything tunable
/// without changing the memory layout lives here.
#[derive(Clone, Copy, Debug)]
pub struct TdmConfig {
    /// Keys consumed by recording, delay entry or selection are not passed on
    pub silent_recorded_keys: bool,
    /// Keys that abort recording or selection are not passed on
    pub silent_invalid_keys: bool,
    /// Releasing any ordinary key while playing or looping stops playback
    pub exit_on_any_key: bool,
    /// Pause before a loop starts and between two loop iterations
    pub debounce: Duration,
    /// Delay entry stops accepting digits once the value would exceed this
    pub max_delay: Duration,
}

impl Default for TdmConfig {
    fn default() -> Self {
        Self {
            silent_recorded_keys: false,
            silent_invalid_keys: true,
            exit_on_any_key: false,
            debounce: Duration::from_millis(100),
            max_delay: MAX_DELAY,
        }
    }
}

impl TdmConfig {
    pub(crate) fn debounce_ms(&self) -> u32 {
        self.debounce.as_millis().min(u32::MAX as u64) as u32
    }

    pub(crate) fn max_delay_ms(&self) -> u32 {
        self.max_delay.as_millis().min(u32::MAX as u64) as u32
    }
}
