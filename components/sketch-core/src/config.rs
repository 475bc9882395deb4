//! Edit-time constants shared by the sketches.

use embassy_time::Duration;

/// Largest positive sample of a 16 bit single-ended conversion.
pub const ADC_MAX_RAW: i16 = 32767;

/// Measured gain error of the voltage divider in front of the ADC.
pub const CORRECTION_FACTOR: f32 = 1.188679245283019;

pub const THICKNESS_MIN_MM: u8 = 1;
pub const THICKNESS_MAX_MM: u8 = 14;

/// Voltage the torch height should read at [`THICKNESS_MAX_MM`].
pub const SCALE_MAX: f32 = 1.22;
pub const SCALE_MIN: f32 = 0.0;

/// Accepted distance between scaled thickness and measured voltage.
pub const LEVEL_TOLERANCE: f32 = 0.05;

/// Vertical gap between stacked display lines (px).
pub const LINE_GAP: i32 = 4;
/// Vertical gap between the two greeting lines (px).
pub const GREETING_GAP: i32 = 5;

/// Display refresh period (10 Hz).
pub const REFRESH_PERIOD: Duration = Duration::from_millis(100);

/// Half period of the LED blink (on time == off time).
pub const BLINK_HALF_PERIOD: Duration = Duration::from_millis(500);

/// Button poll interval, doubles as debounce time.
pub const BUTTON_POLL_BLINK: Duration = Duration::from_millis(200);
pub const BUTTON_POLL_MOTOR: Duration = Duration::from_millis(100);

pub const MOTOR_RUN_TIME: Duration = Duration::from_secs(5);
pub const MOTOR_STOP_TIME: Duration = Duration::from_secs(2);

/// Speed of the speed controlled motor cycle, in percent.
pub const MOTOR_SPEED_PERCENT: u8 = 25;
/// Frequency of the H-bridge enable signal.
pub const MOTOR_PWM_FREQUENCY_HZ: u32 = 1000;
