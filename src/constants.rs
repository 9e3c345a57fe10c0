//! Shared crate-wide constants.

/// Linux input event codes for the pointer buttons bindings can name.
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;
pub const BTN_SIDE: u32 = 0x113;
pub const BTN_EXTRA: u32 = 0x114;
pub const BTN_FORWARD: u32 = 0x115;
pub const BTN_BACK: u32 = 0x116;
pub const BTN_TASK: u32 = 0x117;

/// Magnitude of one physical wheel click in high-resolution discrete units.
pub const DISCRETE_STEP: f64 = 120.0;

/// Accumulated continuous (touchpad) scroll needed to trigger one bound
/// scroll action.
pub const CONTINUOUS_STEP: f64 = 10.0;

/// Resize motion is throttled to this rate (in mHz) when the output refresh
/// rate is unknown.
pub const FALLBACK_REFRESH_MHZ: i32 = 250_000;

/// Delay before a committed resize preview is hidden.
///
/// Units: milliseconds. The delay gives the client time to draw at its new
/// size before the outline disappears.
pub const PREVIEW_HIDE_DELAY_MS: u32 = 100;

/// Scroll step and factor applied when relative motion is turned into
/// scroll events.
pub const SCROLL_WHEEL_EMULATION_STEP: f64 = 15.0;
pub const SCROLL_WHEEL_EMULATION_FACTOR: f64 = 0.04;
