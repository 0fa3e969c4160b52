//! GPIO / peripheral pin assignments for the feeder main board.
//!
//! Every driver references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Compartment door servos (SG90-class, 50 Hz positional)
// ---------------------------------------------------------------------------

/// Signal line for the door 1 servo.
pub const SERVO1_GPIO: i32 = 4;
/// Signal line for the door 2 servo.
pub const SERVO2_GPIO: i32 = 5;

/// Standard hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC resolution for the servo timer.  14 bits gives ~1.2 µs steps at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u32 = 2500;

// ---------------------------------------------------------------------------
// Thermo-electric cooler (logic-level MOSFET, low side)
// ---------------------------------------------------------------------------

pub const COOLER_GPIO: i32 = 6;
/// Cooler PWM frequency (490 Hz, matches the classic `analogWrite` rate).
pub const COOLER_PWM_FREQ_HZ: u32 = 490;
/// 8-bit gives the 0 – 255 duty range the regulator works in.
pub const COOLER_PWM_RESOLUTION_BITS: u32 = 8;

// ---------------------------------------------------------------------------
// Sensors (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor, 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// LEDC channel map
// ---------------------------------------------------------------------------

pub const SERVO1_LEDC_CHANNEL: u32 = 0;
pub const SERVO2_LEDC_CHANNEL: u32 = 1;
pub const COOLER_LEDC_CHANNEL: u32 = 2;
